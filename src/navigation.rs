use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::document::{Document, SharedDocument};
use crate::loader::PageLoader;
use crate::registry::PageRegistry;
use crate::source;

pub const FIXTURE_NOTICE: &str =
    "Fixture mode is active. Set USE_BACKEND=true and start the API server to load live data.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Reloaded(String),
    NothingActive,
    FixtureMode,
}

impl RefreshOutcome {
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            RefreshOutcome::FixtureMode => Some(FIXTURE_NOTICE),
            _ => None,
        }
    }
}

/// Owns the dashboard: which page is showing, and the loader that fills it.
pub struct Navigator {
    registry: Arc<PageRegistry>,
    document: SharedDocument,
    loader: PageLoader,
    use_backend: bool,
}

impl Navigator {
    pub fn new(config: &DashboardConfig) -> anyhow::Result<Self> {
        let registry = Arc::new(PageRegistry::dashboard());
        let document = Document::dashboard(&registry).shared();
        let source = source::select(config, document.clone())?;
        let loader = PageLoader::new(source, registry.clone(), document.clone());
        Ok(Self::with_loader(
            registry,
            document,
            loader,
            config.use_backend,
        ))
    }

    pub fn with_loader(
        registry: Arc<PageRegistry>,
        document: SharedDocument,
        loader: PageLoader,
        use_backend: bool,
    ) -> Self {
        Self {
            registry,
            document,
            loader,
            use_backend,
        }
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }

    /// Makes `page_id` the visible section, marks `activated` (if any) as the
    /// active nav item and loads the page's data.
    pub async fn show_page(&self, page_id: &str, activated: Option<&str>) {
        let targets = match self.registry.get(page_id) {
            Some(targets) => targets,
            None => {
                tracing::warn!("Ignoring navigation to unknown page `{}`", page_id);
                return;
            }
        };

        {
            let mut doc = self.document.lock().await;
            doc.remove_class_where("page", "active");
            doc.add_class(&targets.section, "active");
            doc.remove_class_where("nav-item", "active");
            if let Some(nav) = activated {
                doc.add_class(nav, "active");
            }
        }

        self.loader.load_page_data(page_id).await;
    }

    pub async fn active_page(&self) -> Option<String> {
        let doc = self.document.lock().await;
        let section = doc
            .with_class("page")
            .find(|el| el.has_class("active"))?
            .id
            .clone();
        self.registry.page_for_section(&section).map(Into::into)
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.use_backend {
            return RefreshOutcome::FixtureMode;
        }
        match self.active_page().await {
            Some(page_id) => {
                self.loader.load_page_data(&page_id).await;
                RefreshOutcome::Reloaded(page_id)
            }
            None => RefreshOutcome::NothingActive,
        }
    }
}
