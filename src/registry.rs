use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTargets {
    /// Matched case-insensitively against job names in a run's detail.
    pub keyword: String,
    pub badge: String,
    pub header_pill: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Overview,
    Source,
    Stage(StageTargets),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTargets {
    pub section: String,
    pub nav: String,
    pub kind: PageKind,
}

/// Which element ids belong to which page. Navigation and loading only ever
/// touch pages registered here.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    order: Vec<String>,
    pages: BTreeMap<String, PageTargets>,
}

impl PageRegistry {
    pub fn dashboard() -> Self {
        let mut registry = PageRegistry::default();
        registry.register("overview", PageKind::Overview);
        registry.register("source", PageKind::Source);
        for stage in ["build", "test", "deploy"] {
            registry.register(
                stage,
                PageKind::Stage(StageTargets {
                    keyword: stage.to_string(),
                    badge: format!("badge-{}", stage),
                    header_pill: format!("pill-{}", stage),
                }),
            );
        }
        registry
    }

    pub fn register(&mut self, page_id: &str, kind: PageKind) {
        let targets = PageTargets {
            section: format!("page-{}", page_id),
            nav: format!("nav-{}", page_id),
            kind,
        };
        if self.pages.insert(page_id.to_string(), targets).is_none() {
            self.order.push(page_id.to_string());
        }
    }

    pub fn get(&self, page_id: &str) -> Option<&PageTargets> {
        self.pages.get(page_id)
    }

    /// Page whose section element is the one named `section`.
    pub fn page_for_section(&self, section: &str) -> Option<&str> {
        self.pages()
            .find(|(_, targets)| targets.section == section)
            .map(|(page_id, _)| page_id)
    }

    /// Registered pages in registration order.
    pub fn pages(&self) -> impl Iterator<Item = (&str, &PageTargets)> {
        self.order
            .iter()
            .filter_map(move |id| self.pages.get(id).map(|targets| (id.as_str(), targets)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_pages_in_nav_order() {
        let registry = PageRegistry::dashboard();
        let ids = registry.pages().map(|(id, _)| id).collect::<Vec<_>>();
        assert_eq!(ids, ["overview", "source", "build", "test", "deploy"]);
    }

    #[test]
    fn stage_targets() {
        let registry = PageRegistry::dashboard();
        let deploy = registry.get("deploy").unwrap();
        assert_eq!(deploy.section, "page-deploy");
        match &deploy.kind {
            PageKind::Stage(stage) => {
                assert_eq!(stage.keyword, "deploy");
                assert_eq!(stage.badge, "badge-deploy");
            }
            other => panic!("unexpected kind {:?}", other),
        }
        assert!(registry.get("settings").is_none());
    }

    #[test]
    fn section_lookup() {
        let registry = PageRegistry::dashboard();
        assert_eq!(registry.page_for_section("page-source"), Some("source"));
        assert_eq!(registry.page_for_section("page-nope"), None);
    }

    #[test]
    fn reregistering_keeps_position() {
        let mut registry = PageRegistry::dashboard();
        registry.register("overview", PageKind::Source);
        assert_eq!(registry.pages().count(), 5);
        assert_eq!(registry.get("overview").unwrap().kind, PageKind::Source);
    }
}
