use anyhow::Result;
use askama::Template;
use poem::web::Html;

use crate::document::Document;
use crate::navigation::Navigator;
use crate::registry::PageKind;

struct NavEntry<'a> {
    page_id: &'a str,
    nav: &'a str,
    label: String,
}

struct StageSection<'a> {
    label: String,
    section: &'a str,
    badge: &'a str,
    header_pill: &'a str,
}

#[derive(Template)]
#[template(path = "index.html")]
struct DashboardPage<'a> {
    doc: &'a Document,
    nav: Vec<NavEntry<'a>>,
    stages: Vec<StageSection<'a>>,
    notice: Option<&'a str>,
    source: &'a str,
}

fn label_for(page_id: &str) -> String {
    let mut chars = page_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the whole dashboard from the current state of the document.
pub async fn render_dashboard(nav: &Navigator, notice: Option<&str>) -> Result<Html<String>> {
    let registry = nav.registry();

    let entries = registry
        .pages()
        .map(|(page_id, targets)| NavEntry {
            page_id,
            nav: &targets.nav,
            label: label_for(page_id),
        })
        .collect();

    let stages = registry
        .pages()
        .filter_map(|(page_id, targets)| match &targets.kind {
            PageKind::Stage(stage) => Some(StageSection {
                label: label_for(page_id),
                section: &targets.section,
                badge: &stage.badge,
                header_pill: &stage.header_pill,
            }),
            _ => None,
        })
        .collect();

    let doc = nav.document().lock().await;
    let tpl = DashboardPage {
        doc: &doc,
        nav: entries,
        stages,
        notice,
        source: nav.loader().source_name(),
    };

    Ok(Html(tpl.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(label_for("overview"), "Overview");
        assert_eq!(label_for(""), "");
    }
}
