//! Ticket source fetching (local file or HTTP)

use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

use super::{IngestError, Result};

/// Where the ticket CSV comes from
#[derive(Debug, Clone)]
pub enum TicketSource {
    /// Local filesystem path
    File(PathBuf),
    /// Remote HTTP(S) URL serving CSV content
    Url(Url),
}

impl TicketSource {
    /// Classify a source descriptor. Anything starting with `http://` or
    /// `https://` is a URL; everything else is a local path.
    pub fn parse(descriptor: &str) -> Result<Self> {
        if descriptor.starts_with("http://") || descriptor.starts_with("https://") {
            let url = Url::parse(descriptor).map_err(|e| {
                IngestError::SourceUnavailable(format!("invalid source URL '{descriptor}': {e}"))
            })?;
            Ok(TicketSource::Url(url))
        } else {
            Ok(TicketSource::File(PathBuf::from(descriptor)))
        }
    }

    /// Fetch the full source content before parsing. No streaming, no retry;
    /// a missing file, transport error, or non-2xx response is fatal.
    pub async fn fetch(&self, timeout_secs: u64) -> Result<String> {
        match self {
            TicketSource::File(path) => {
                info!(path = %path.display(), "Reading ticket CSV from file");
                tokio::fs::read_to_string(path).await.map_err(|e| {
                    IngestError::SourceUnavailable(format!(
                        "failed to read '{}': {}",
                        path.display(),
                        e
                    ))
                })
            },
            TicketSource::Url(url) => {
                info!(%url, "Downloading ticket CSV");
                let client = Client::builder()
                    .timeout(Duration::from_secs(timeout_secs))
                    .user_agent(concat!("sdp-ingest/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .map_err(|e| IngestError::SourceUnavailable(e.to_string()))?;

                let response = client.get(url.clone()).send().await.map_err(|e| {
                    IngestError::SourceUnavailable(format!("request to {url} failed: {e}"))
                })?;

                if !response.status().is_success() {
                    return Err(IngestError::SourceUnavailable(format!(
                        "{} returned HTTP {}",
                        url,
                        response.status()
                    )));
                }

                response.text().await.map_err(|e| {
                    IngestError::SourceUnavailable(format!("failed to read body from {url}: {e}"))
                })
            },
        }
    }
}

impl std::fmt::Display for TicketSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketSource::File(path) => write!(f, "{}", path.display()),
            TicketSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_classifies_descriptors() {
        assert!(matches!(
            TicketSource::parse("./data/tickets.csv").unwrap(),
            TicketSource::File(_)
        ));
        assert!(matches!(
            TicketSource::parse("/app/files/customer_support_tickets.csv").unwrap(),
            TicketSource::File(_)
        ));
        assert!(matches!(
            TicketSource::parse("https://example.com/tickets.csv").unwrap(),
            TicketSource::Url(_)
        ));
        assert!(matches!(
            TicketSource::parse("http://example.com/tickets.csv").unwrap(),
            TicketSource::Url(_)
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_url() {
        let err = TicketSource::parse("http://").unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_source_unavailable() {
        let source = TicketSource::parse("/definitely/not/here.csv").unwrap();
        let err = source.fetch(5).await.unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_fetch_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("tickets.csv");
        std::fs::write(&file, "Ticket ID\n1\n").unwrap();

        let source = TicketSource::parse(file.to_str().unwrap()).unwrap();
        let content = source.fetch(5).await.unwrap();
        assert_eq!(content, "Ticket ID\n1\n");
    }

    #[tokio::test]
    async fn test_fetch_downloads_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Ticket ID\n7\n"))
            .mount(&server)
            .await;

        let source = TicketSource::parse(&format!("{}/tickets.csv", server.uri())).unwrap();
        let content = source.fetch(5).await.unwrap();
        assert_eq!(content, "Ticket ID\n7\n");
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_source_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets.csv"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = TicketSource::parse(&format!("{}/tickets.csv", server.uri())).unwrap();
        let err = source.fetch(5).await.unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable(_)));
        assert!(err.to_string().contains("404"));
    }
}
