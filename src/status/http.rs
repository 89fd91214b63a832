use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use super::{decode_body, StatusError, StatusResponse};

/// Anything that can produce one status body per call
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusResponse, StatusError>;
}

/// Plain GET against the status aggregator
pub struct HttpStatusSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStatusSource {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(1)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusResponse, StatusError> {
        // Status codes are not checked: the aggregator reports problems in the body
        let response = self.client.get(&self.endpoint).send().await?;
        let code = response.status();
        let body = response.bytes().await?;
        tracing::debug!("Status endpoint answered {} ({} bytes)", code, body.len());
        decode_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ConnectivityState;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn source_for(server: &MockServer, timeout: Duration) -> HttpStatusSource {
        HttpStatusSource::new(&format!("{}/minecraft-stats", server.uri()), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_full_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/minecraft-stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "online": 12,
                "max": 50,
                "version": "Paper 1.20.4",
                "latency": 34.2,
                "timestamp": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server, Duration::from_secs(5));
        let response = source.fetch().await.unwrap();

        assert!(!response.reports_error());
        let snapshot = response.to_snapshot("1.20");
        assert_eq!(snapshot.online, 12);
        assert_eq!(snapshot.max, 50);
        assert_eq!(snapshot.version, "Paper 1.20.4");
        assert_eq!(snapshot.latency_ms, 34);
    }

    #[tokio::test]
    async fn test_fetch_decodes_error_body_on_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/minecraft-stats"))
            .respond_with(
                ResponseTemplate::new(405).set_body_json(json!({"error": "Method not allowed"})),
            )
            .mount(&server)
            .await;

        let source = source_for(&server, Duration::from_secs(5));
        let response = source.fetch().await.unwrap();

        assert!(response.reports_error());
    }

    #[tokio::test]
    async fn test_fetch_non_json_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let source = source_for(&server, Duration::from_secs(5));
        let result = source.fetch().await;

        assert!(matches!(result, Err(StatusError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"online": 1}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let source = source_for(&server, Duration::from_millis(50));
        let result = source.fetch().await;

        assert!(matches!(result, Err(StatusError::Timeout)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_endpoint_is_request_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let source = HttpStatusSource::new("http://127.0.0.1:9/minecraft-stats", Duration::from_secs(2)).unwrap();
        let result = source.fetch().await;

        assert!(matches!(result, Err(StatusError::Request(_)) | Err(StatusError::Timeout)));
    }

    #[tokio::test]
    async fn test_poller_against_http_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/minecraft-stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"online": 5})))
            .mount(&server)
            .await;

        let source = source_for(&server, Duration::from_secs(5));
        let mut poller = crate::status::poller::StatusPoller::spawn(
            source,
            crate::status::poller::PollSettings {
                interval: Duration::from_secs(30),
                request_timeout: Duration::from_secs(5),
                fallback_version: "1.20".to_string(),
            },
        );

        let mut rx = poller.subscribe();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|v| !v.loading))
            .await
            .unwrap()
            .unwrap();

        let view = poller.current();
        assert_eq!(view.state, ConnectivityState::Online);
        assert_eq!(view.snapshot.online, 5);
        assert_eq!(view.snapshot.version, "1.20");

        poller.stop();
    }
}
