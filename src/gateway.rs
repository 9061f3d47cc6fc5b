use anyhow::Result;
use async_trait::async_trait;

use crate::config::DashboardConfig;
use crate::document::SharedDocument;
use crate::error::{FetchError, UNKNOWN_BACKEND_ERROR};
use crate::models::{Endpoint, Envelope};
use crate::render;
use crate::source::DataSource;

/// Talks to the backend API. Only the runs list gets a loading and error
/// placeholder; failures on the other endpoints are logged and nothing more.
pub struct FetchGateway {
    client: reqwest::Client,
    base_url: String,
    document: SharedDocument,
}

impl FetchGateway {
    pub fn new(config: &DashboardConfig, document: SharedDocument) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
            document,
        })
    }

    async fn request(&self, endpoint: &Endpoint) -> Result<Envelope, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let req = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .build()?;
        let res = self.client.execute(req).await?;
        let envelope: Envelope = res.json().await?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| UNKNOWN_BACKEND_ERROR.to_string());
            return Err(FetchError::Backend(message));
        }

        Ok(envelope)
    }

    pub async fn fetch_data(&self, endpoint: &Endpoint) -> Option<Envelope> {
        let placeholder = *endpoint == Endpoint::Runs;

        if placeholder {
            let mut doc = self.document.lock().await;
            if let Err(e) = render::render_loading(&mut doc) {
                tracing::warn!("Could not render loading row: {}", e);
            }
        }

        match self.request(endpoint).await {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                tracing::error!("Fetching {} failed: {}", endpoint.path(), e);
                if placeholder {
                    let mut doc = self.document.lock().await;
                    if let Err(e) = render::render_error(&mut doc, e.user_message()) {
                        tracing::warn!("Could not render error row: {}", e);
                    }
                }
                None
            }
        }
    }
}

#[async_trait]
impl DataSource for FetchGateway {
    fn name(&self) -> &'static str {
        "backend"
    }

    async fn fetch(&self, endpoint: &Endpoint) -> Option<Envelope> {
        self.fetch_data(endpoint).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::CONNECTIVITY_MESSAGE;
    use crate::registry::PageRegistry;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers every request on a fresh loopback port with `body`, and
    /// returns the base url to reach it.
    pub async fn serve(content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    content_type,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    pub async fn serve_json(body: &'static str) -> String {
        serve("application/json", body).await
    }

    pub fn gateway_for(backend_url: &str) -> (FetchGateway, SharedDocument) {
        let document = Document::dashboard(&PageRegistry::dashboard()).shared();
        let config = DashboardConfig {
            use_backend: true,
            backend_url: backend_url.into(),
            request_timeout: Duration::from_secs(2),
            ..DashboardConfig::default()
        };
        let gateway = FetchGateway::new(&config, document.clone()).unwrap();
        (gateway, document)
    }

    // Port 1 is never listening on the loopback interface, so the connection
    // is refused right away.
    fn unreachable_gateway() -> (FetchGateway, SharedDocument) {
        gateway_for("http://127.0.0.1:1")
    }

    #[tokio::test]
    async fn refused_connection_on_runs_shows_connectivity_error() {
        let (gateway, document) = unreachable_gateway();
        let before_stats = document.lock().await.inner(render::STAT_TOTAL_RUNS).to_string();

        assert!(gateway.fetch_data(&Endpoint::Runs).await.is_none());

        let doc = document.lock().await;
        assert!(doc.inner(render::RUNS_TABLE).contains(CONNECTIVITY_MESSAGE));
        assert_eq!(doc.inner(render::STAT_TOTAL_RUNS), before_stats);
        assert_eq!(doc.inner(render::COMMITS_TABLE), "");
    }

    #[tokio::test]
    async fn refused_connection_elsewhere_is_silent() {
        let (gateway, document) = unreachable_gateway();

        assert!(gateway.fetch_data(&Endpoint::Stats).await.is_none());
        assert!(gateway.fetch_data(&Endpoint::RunDetail(9001)).await.is_none());

        assert_eq!(document.lock().await.inner(render::RUNS_TABLE), "");
    }

    #[tokio::test]
    async fn successful_response_is_returned() {
        let url = serve_json(
            r#"{"success":true,"runs":[{"id":9001,"runNumber":142,"branch":"main","sha":"a3f9c12","author":"rahul-s","status":"run","duration":"1m 48s","started":"2 min ago"}]}"#,
        )
        .await;
        let (gateway, document) = gateway_for(&url);

        let envelope = gateway.fetch_data(&Endpoint::Runs).await.unwrap();

        let runs: Vec<crate::models::RunSummary> = envelope.resource("runs").unwrap();
        assert_eq!(runs[0].id, 9001);
        // rendering is the loader's job; the gateway only leaves its loading row
        assert!(document
            .lock()
            .await
            .inner(render::RUNS_TABLE)
            .contains(render::LOADING_MESSAGE));
    }

    #[tokio::test]
    async fn backend_failure_shows_its_message() {
        let url = serve_json(r#"{"success":false,"error":"rate limited"}"#).await;
        let (gateway, document) = gateway_for(&url);

        assert!(gateway.fetch_data(&Endpoint::Runs).await.is_none());

        let doc = document.lock().await;
        assert!(doc.inner(render::RUNS_TABLE).contains("\u{26a0} rate limited"));
        assert!(!doc.inner(render::RUNS_TABLE).contains(render::LOADING_MESSAGE));
    }

    #[tokio::test]
    async fn backend_failure_without_message() {
        let url = serve_json(r#"{"success":false}"#).await;
        let (gateway, document) = gateway_for(&url);

        assert!(gateway.fetch_data(&Endpoint::Runs).await.is_none());

        assert!(document
            .lock()
            .await
            .inner(render::RUNS_TABLE)
            .contains(UNKNOWN_BACKEND_ERROR));
    }

    #[tokio::test]
    async fn backend_failure_on_other_endpoints_is_silent() {
        let url = serve_json(r#"{"success":false,"error":"rate limited"}"#).await;
        let (gateway, document) = gateway_for(&url);

        assert!(gateway.fetch_data(&Endpoint::Commits).await.is_none());

        assert_eq!(document.lock().await.inner(render::RUNS_TABLE), "");
    }

    #[tokio::test]
    async fn non_json_body_counts_as_connectivity_failure() {
        let url = serve("text/html", "<html>502 Bad Gateway</html>").await;
        let (gateway, document) = gateway_for(&url);

        assert!(gateway.fetch_data(&Endpoint::Runs).await.is_none());

        assert!(document
            .lock()
            .await
            .inner(render::RUNS_TABLE)
            .contains(CONNECTIVITY_MESSAGE));
    }
}
