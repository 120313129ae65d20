use std::{collections::HashMap, time::Duration};

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;
use uuid::Uuid;

/// The relying party identity attached to every request.
///
/// The server validates the UUID/name pair; the client never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelyingParty {
    pub uuid: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub connector: ConnectorConfig,
}

/// Immutable connector settings, built once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorConfig {
    /// Base REST endpoint, e.g. `https://tsp.demo.sk.ee/mid-api`.
    pub base_url: String,
    pub relying_party_uuid: Uuid,
    pub relying_party_name: String,
    /// Sleep between two status polls of the same session.
    pub poll_interval_ms: u64,
    /// Wall-clock budget for one poll sequence before it fails with a
    /// timeout. Bounds the loop; there is no separate attempt counter.
    pub poll_timeout_ms: u64,
    /// Upper bound for one HTTP request; a slower response errors out
    /// and, during polling, counts as a transient failure.
    pub request_timeout_ms: u64,
}

impl ConnectorConfig {
    pub fn relying_party(&self) -> RelyingParty {
        RelyingParty {
            uuid: self.relying_party_uuid,
            name: self.relying_party_name.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("connector.base_url", "https://tsp.demo.sk.ee/mid-api")?
            .set_default(
                "connector.relying_party_uuid",
                "00000000-0000-0000-0000-000000000000",
            )?
            .set_default("connector.relying_party_name", "DEMO")?
            .set_default("connector.poll_interval_ms", 1000)?
            .set_default("connector.poll_timeout_ms", 60_000)?
            .set_default("connector.request_timeout_ms", 30_000)?
            .add_source(File::with_name("config/settings").required(false));

        // If env_vars is provided, we use it instead of system environment
        // This is to avoid systems variables pollution across tests
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // Use system environment variables
            // Should be in the format APP_CONNECTOR__BASE_URL
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        builder.build()?.try_deserialize()
    }
}
