use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::registry::{PageKind, PageRegistry};
use crate::render;

pub type SharedDocument = Arc<Mutex<Document>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub class_name: String,
    pub inner_html: String,
    pub style: BTreeMap<String, String>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }

    fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            if !self.class_name.is_empty() {
                self.class_name.push(' ');
            }
            self.class_name.push_str(class);
        }
    }

    fn remove_class(&mut self, class: &str) {
        self.class_name = self
            .class_name
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
    }

    pub fn style_attr(&self) -> String {
        self.style
            .iter()
            .map(|(prop, value)| format!("{}:{}", prop, value))
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// The page as a flat set of addressable elements. Every write names its
/// target by id; writing to an id that was never inserted does nothing and
/// reports `false`.
#[derive(Debug, Default)]
pub struct Document {
    elements: Vec<Element>,
    index: HashMap<String, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the dashboard page: a section, nav item and (for stages) badge
    /// and header pill per registered page, plus the fixed overview/source
    /// anchors. The overview starts out active.
    pub fn dashboard(registry: &PageRegistry) -> Self {
        let mut doc = Document::new();

        for (page_id, targets) in registry.pages() {
            let active = page_id == "overview";
            let class = if active { "page active" } else { "page" };
            doc.insert(&targets.section, class, "");
            let class = if active { "nav-item active" } else { "nav-item" };
            doc.insert(&targets.nav, class, "");

            if let PageKind::Stage(stage) = &targets.kind {
                doc.insert(&stage.badge, "stage-badge badge-warn", "...");
                doc.insert(&stage.header_pill, "pill pending", "");
            }
        }

        for id in render::STAT_ANCHORS {
            doc.insert(id, "stat-value", "&mdash;");
        }
        doc.insert(render::RUNS_TABLE, "", "");
        doc.insert(render::COMMITS_TABLE, "", "");
        doc.insert(render::PULLS_TABLE, "", "");
        doc.insert(crate::progress::BAR, "progress-bar", "");
        doc.insert(crate::progress::PCT, "progress-pct", "");

        doc
    }

    pub fn shared(self) -> SharedDocument {
        Arc::new(Mutex::new(self))
    }

    /// Inserts an element, replacing any previous element with the same id.
    pub fn insert(&mut self, id: &str, class_name: &str, inner_html: &str) {
        let element = Element {
            id: id.to_string(),
            class_name: class_name.to_string(),
            inner_html: inner_html.to_string(),
            style: BTreeMap::new(),
        };
        match self.index.get(id) {
            Some(&pos) => self.elements[pos] = element,
            None => {
                self.index.insert(id.to_string(), self.elements.len());
                self.elements.push(element);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&pos| &self.elements[pos])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        match self.index.get(id) {
            Some(&pos) => self.elements.get_mut(pos),
            None => {
                tracing::debug!("No element with id `{}`, skipping write", id);
                None
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        self.set_html(id, &askama_escape::escape(text, askama_escape::Html).to_string())
    }

    pub fn set_html(&mut self, id: &str, html: &str) -> bool {
        self.get_mut(id)
            .map(|el| el.inner_html = html.to_string())
            .is_some()
    }

    pub fn set_class(&mut self, id: &str, class_name: &str) -> bool {
        self.get_mut(id)
            .map(|el| el.class_name = class_name.to_string())
            .is_some()
    }

    pub fn add_class(&mut self, id: &str, class: &str) -> bool {
        self.get_mut(id).map(|el| el.add_class(class)).is_some()
    }

    pub fn set_style(&mut self, id: &str, prop: &str, value: &str) -> bool {
        self.get_mut(id)
            .map(|el| {
                el.style.insert(prop.to_string(), value.to_string());
            })
            .is_some()
    }

    /// Removes `class` from every element carrying `selector`.
    pub fn remove_class_where(&mut self, selector: &str, class: &str) {
        self.elements
            .iter_mut()
            .filter(|el| el.has_class(selector))
            .for_each(|el| el.remove_class(class));
    }

    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |el| el.has_class(class))
    }

    // Accessors below are what the page templates call. Missing ids render
    // as empty.

    pub fn inner(&self, id: &str) -> &str {
        self.get(id).map(|el| el.inner_html.as_str()).unwrap_or("")
    }

    pub fn class_of(&self, id: &str) -> &str {
        self.get(id).map(|el| el.class_name.as_str()).unwrap_or("")
    }

    pub fn style_of(&self, id: &str) -> String {
        self.get(id).map(Element::style_attr).unwrap_or_default()
    }
}
