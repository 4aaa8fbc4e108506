// Controller - Boundary to whatever runs the application under test
//
// Launching and stopping the application is someone else's job; the harness
// only needs to ask for it to be up and learn where it listens.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Default budget for the application to start or come back from a restart
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(360);

/// Starts the application under test and reports its address.
#[async_trait]
pub trait SutController: Send + Sync {
    /// Brings the application up. Must be idempotent.
    async fn start(&mut self) -> std::io::Result<()>;

    /// Externally reachable root URL. Only meaningful after [`start`](Self::start).
    fn url(&self) -> Url;
}

/// Controller for an application someone else already started.
///
/// `start()` only checks that the address accepts TCP connections.
#[derive(Debug, Clone)]
pub struct ExternalSut {
    url: Url,
}

impl ExternalSut {
    pub fn new(url: Url) -> Self {
        Self { url }
    }
}

#[async_trait]
impl SutController for ExternalSut {
    async fn start(&mut self) -> std::io::Result<()> {
        let host = self.url.host_str().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no host", self.url),
            )
        })?;
        let port = self.url.port_or_known_default().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} has no port", self.url),
            )
        })?;

        tokio::net::TcpStream::connect((host, port)).await?;
        tracing::debug!("Application under test is reachable at {}", self.url);
        Ok(())
    }

    fn url(&self) -> Url {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_external_sut_reports_unreachable_address() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/")).expect("url");
        let mut sut = ExternalSut::new(url);
        assert!(sut.start().await.is_err());
    }

    #[tokio::test]
    async fn test_external_sut_accepts_listening_address() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let url = Url::parse(&format!("http://{addr}/jenkins/")).expect("url");
        let mut sut = ExternalSut::new(url.clone());
        sut.start().await.expect("listening address should be reachable");
        assert_eq!(sut.url(), url);
    }
}
