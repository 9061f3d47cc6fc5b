use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DashboardConfig;
use crate::document::SharedDocument;
use crate::fixture::FixtureSource;
use crate::gateway::FetchGateway;
use crate::models::{Endpoint, Envelope};

/// Where page data comes from. `None` means there is nothing to render; the
/// caller leaves the page as it is.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, endpoint: &Endpoint) -> Option<Envelope>;
}

/// Picks the backend gateway or the fixture depending on `use_backend`.
pub fn select(
    config: &DashboardConfig,
    document: SharedDocument,
) -> anyhow::Result<Arc<dyn DataSource>> {
    if config.use_backend {
        Ok(Arc::new(FetchGateway::new(config, document)?))
    } else {
        Ok(Arc::new(FixtureSource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn flag_selects_provider() {
        let document = Document::new().shared();
        let mut config = DashboardConfig::default();
        assert_eq!(select(&config, document.clone()).unwrap().name(), "fixture");

        config.use_backend = true;
        assert_eq!(select(&config, document).unwrap().name(), "backend");
    }
}
