//! Thin HTTP layer shared by the initiators and the status poller.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{MidError, classify};

/// Stateless JSON transport over one shared [`reqwest::Client`].
///
/// Safe to clone and share across concurrent operation sequences; the
/// underlying connection pool is released when the last clone drops.
/// No retries happen at this layer.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Client,
    base_url: Url,
}

impl RestTransport {
    /// `request_timeout` bounds every single request; a server that
    /// accepts the connection but never answers errors out instead of
    /// blocking the caller.
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, MidError> {
        // Url::join drops the last path segment without this.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Ok(Self {
            client: Client::builder().timeout(request_timeout).build()?,
            base_url: Url::parse(&normalized)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, MidError> {
        Ok(self.base_url.join(path)?)
    }

    /// `POST` a JSON body and deserialize the 2xx response body.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, MidError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, %body, "request rejected");
            return Err(classify(status, &body, None));
        }
        Ok(response.json().await?)
    }

    /// `GET` a session-scoped resource. A 404 on this path means the
    /// session identifier itself is unknown, so it is threaded through
    /// for classification.
    pub async fn get_session<R>(&self, path: &str, session_id: &str) -> Result<R, MidError>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, session_id, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, %body, session_id, "status request rejected");
            return Err(classify(status, &body, Some(session_id)));
        }
        Ok(response.json().await?)
    }
}
