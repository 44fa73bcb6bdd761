//! reqwest-backed client for the upstream riddle service

use super::{BackendError, RiddleBackend};
use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Response, Url};
use serde_json::Value;

/// Talks to `{base_url}/riddles/{id}`
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// No request timeout is configured; the transport defaults apply.
    pub fn new(base_url: Url) -> Result<Self, BackendError> {
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    fn riddle_url(&self, id: &str) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BackendError::network(format!("{} cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .push("riddles")
            .push(id);
        Ok(url)
    }
}

/// Decode the upstream body regardless of its status code
async fn read_json(response: Response) -> Result<Value, BackendError> {
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(%status, url = %response.url(), "Upstream returned non-success status");
    }
    Ok(response.json::<Value>().await?)
}

#[async_trait]
impl RiddleBackend for HttpBackend {
    async fn get_riddle(&self, id: &str) -> Result<Value, BackendError> {
        let url = self.riddle_url(id)?;
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        read_json(response).await
    }

    async fn post_answer(&self, id: &str, body: &Value) -> Result<Value, BackendError> {
        let url = self.riddle_url(id)?;
        // .json() sets Content-Type: application/json
        let response = self.client.post(url).json(body).send().await?;
        read_json(response).await
    }
}
