//! HTTP seam shared by the licensing client and the artifact pipeline.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;

use crate::common::TransportError;

/// Form fields of one protocol request, in send order
pub type Form = Vec<(&'static str, String)>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a url-encoded form and return the raw response body.
    /// The body is returned whatever the status code, the licensing
    /// backend reports failures inside its JSON.
    async fn post_form(&self, url: &str, form: &Form) -> Result<Bytes, TransportError>;

    /// GET a file; non-2xx statuses are errors
    async fn get_bytes(&self, url: &str) -> Result<Bytes, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `timeout` of None keeps reqwest's default of no timeout
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, form: &Form) -> Result<Bytes, TransportError> {
        let response = self.client.post(url).form(form).send().await?;
        tracing::debug!(status = %response.status(), "licensing response");
        Ok(response.bytes().await?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Bytes, TransportError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}
