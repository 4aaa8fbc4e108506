// Plain HTTP probes, outside the browser session

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Reads a single response header from the application.
#[async_trait]
pub trait HeaderProbe: Send + Sync {
    /// Issues a GET to `url` and returns the value of header `name`, if sent.
    async fn header(&self, url: &Url, name: &str) -> Result<Option<String>>;
}

/// [`HeaderProbe`] over a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpHeaderProbe {
    client: reqwest::Client,
}

impl HttpHeaderProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HeaderProbe for HttpHeaderProbe {
    async fn header(&self, url: &Url, name: &str) -> Result<Option<String>> {
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("GET {} -> {}", url, response.status());

        Ok(response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string))
    }
}
