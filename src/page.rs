//! Host page document model.
//!
//! The live page the navigator mutates: title, head markup, ordered body
//! children, and the mounted overlay elements. Overlay elements are kept
//! decomposed (tag, classes, attributes, inner markup) so replacing their
//! content in place preserves the outer element, mirroring how a DOM swap
//! of `innerHTML` keeps the element and its listeners alive.

use std::collections::HashMap;

use crate::classify::{OverlayContent, ScriptTag, collect_scripts, fragment_children};
use crate::types::OverlayKind;

/// Identifier of a mounted overlay element. Never reused within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyChild {
    Markup(String),
    Overlay(OverlayId),
}

/// A mounted overlay element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayElement {
    id: OverlayId,
    kind: OverlayKind,
    tag: String,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    inner_html: String,
}

impl OverlayElement {
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Serialize the element back to markup.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape_attr(&self.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        out.push_str(&self.inner_html);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
        out
    }
}

/// Point-in-time view of the page, for embedders and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub title: String,
    pub head_html: String,
    /// Serialized body children in order; mounted overlays appear as their
    /// outer markup.
    pub body_children: Vec<String>,
    pub modal: Option<OverlaySnapshot>,
    pub panel: Option<OverlaySnapshot>,
    pub executed_scripts: Vec<ScriptTag>,
}

/// Snapshot of one mounted overlay element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySnapshot {
    pub id: OverlayId,
    pub tag: String,
    pub classes: Vec<String>,
    pub inner_html: String,
}

impl OverlaySnapshot {
    fn of(element: &OverlayElement) -> Self {
        Self {
            id: element.id,
            tag: element.tag.clone(),
            classes: element.classes.clone(),
            inner_html: element.inner_html.clone(),
        }
    }
}

/// The current document.
#[derive(Debug)]
pub struct HostPage {
    title: String,
    head_html: String,
    body: Vec<BodyChild>,
    overlays: HashMap<OverlayId, OverlayElement>,
    executed_scripts: Vec<ScriptTag>,
    next_overlay_id: u64,
}

impl HostPage {
    /// Build a page from its current title, head markup, and body markup.
    #[must_use]
    pub fn new(title: impl Into<String>, head_html: impl Into<String>, body_html: &str) -> Self {
        Self {
            title: title.into(),
            head_html: head_html.into(),
            body: fragment_children(body_html)
                .into_iter()
                .map(BodyChild::Markup)
                .collect(),
            overlays: HashMap::new(),
            executed_scripts: Vec::new(),
            next_overlay_id: 0,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    #[must_use]
    pub fn head_html(&self) -> &str {
        &self.head_html
    }

    pub(crate) fn set_head_html(&mut self, head_html: String) {
        self.head_html = head_html;
    }

    /// Append an overlay element to the body.
    pub(crate) fn mount_overlay(&mut self, kind: OverlayKind, content: OverlayContent) -> OverlayId {
        self.next_overlay_id += 1;
        let id = OverlayId(self.next_overlay_id);
        self.overlays.insert(
            id,
            OverlayElement {
                id,
                kind,
                tag: content.tag,
                classes: content.classes,
                attrs: content.attrs,
                inner_html: content.inner_html,
            },
        );
        self.body.push(BodyChild::Overlay(id));
        id
    }

    /// Swap an overlay's inner markup, preserving the outer element.
    pub(crate) fn replace_overlay_content(&mut self, id: OverlayId, inner_html: String) {
        if let Some(element) = self.overlays.get_mut(&id) {
            element.inner_html = inner_html;
        }
    }

    /// Remove an overlay element from the body.
    pub(crate) fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
        self.body
            .retain(|child| !matches!(child, BodyChild::Overlay(other) if *other == id));
    }

    pub(crate) fn overlay(&self, id: OverlayId) -> Option<&OverlayElement> {
        self.overlays.get(&id)
    }

    /// Replace the body: every current child is removed except the overlays
    /// in `keep`, then `children` are appended in order.
    pub(crate) fn replace_body(&mut self, children: Vec<String>, keep: &[OverlayId]) {
        self.body
            .retain(|child| matches!(child, BodyChild::Overlay(id) if keep.contains(id)));
        self.overlays.retain(|id, _| keep.contains(id));
        self.body
            .extend(children.into_iter().map(BodyChild::Markup));
    }

    /// Serialized body children in order.
    #[must_use]
    pub fn body_children(&self) -> Vec<String> {
        self.body
            .iter()
            .map(|child| match child {
                BodyChild::Markup(html) => html.clone(),
                BodyChild::Overlay(id) => self
                    .overlays
                    .get(id)
                    .map(OverlayElement::outer_html)
                    .unwrap_or_default(),
            })
            .collect()
    }

    #[must_use]
    pub fn body_html(&self) -> String {
        self.body_children().concat()
    }

    /// Every script element currently in the document, head first, then
    /// body children in order (overlay content included).
    pub(crate) fn document_scripts(&self) -> Vec<ScriptTag> {
        let mut scripts = collect_scripts(&self.head_html);
        for child in &self.body {
            match child {
                BodyChild::Markup(html) => scripts.extend(collect_scripts(html)),
                BodyChild::Overlay(id) => {
                    if let Some(element) = self.overlays.get(id) {
                        scripts.extend(collect_scripts(&element.inner_html));
                    }
                }
            }
        }
        scripts
    }

    pub(crate) fn record_executed_scripts(&mut self, scripts: Vec<ScriptTag>) {
        self.executed_scripts.extend(scripts);
    }

    /// Scripts the page has (re-)executed, oldest first.
    #[must_use]
    pub fn executed_scripts(&self) -> &[ScriptTag] {
        &self.executed_scripts
    }

    pub(crate) fn overlay_snapshot(&self, id: OverlayId) -> Option<OverlaySnapshot> {
        self.overlays.get(&id).map(OverlaySnapshot::of)
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use crate::classify::OverlayContent;
    use crate::types::OverlayKind;

    use super::HostPage;

    fn content(tag: &str, classes: &[&str], inner: &str) -> OverlayContent {
        OverlayContent {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            attrs: Vec::new(),
            inner_html: inner.to_string(),
        }
    }

    #[test]
    fn mount_appends_to_body() {
        let mut page = HostPage::new("Home", "", "<main>app</main>");
        let id = page.mount_overlay(OverlayKind::Modal, content("div", &["modal"], "<p>hi</p>"));
        let children = page.body_children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], r#"<div class="modal"><p>hi</p></div>"#);
        assert!(page.overlay(id).is_some());
    }

    #[test]
    fn replace_content_preserves_outer_element() {
        let mut page = HostPage::new("Home", "", "");
        let id = page.mount_overlay(OverlayKind::Modal, content("div", &["modal"], "<p>a</p>"));
        page.replace_overlay_content(id, "<p>b</p>".to_string());
        let element = page.overlay(id).expect("overlay");
        assert_eq!(element.classes(), ["modal"]);
        assert_eq!(element.inner_html(), "<p>b</p>");
    }

    #[test]
    fn remove_overlay_clears_body_entry() {
        let mut page = HostPage::new("Home", "", "<main>app</main>");
        let id = page.mount_overlay(OverlayKind::Panel, content("div", &["offcanvas"], ""));
        page.remove_overlay(id);
        assert!(page.overlay(id).is_none());
        assert_eq!(page.body_children(), vec!["<main>app</main>"]);
    }

    #[test]
    fn replace_body_keeps_listed_overlays() {
        let mut page = HostPage::new("Home", "", "<main>old</main><footer>f</footer>");
        let id = page.mount_overlay(OverlayKind::Modal, content("div", &["modal"], "<p>m</p>"));
        page.replace_body(vec!["<main>new</main>".to_string()], &[id]);

        let children = page.body_children();
        assert_eq!(
            children,
            vec![
                r#"<div class="modal"><p>m</p></div>"#.to_string(),
                "<main>new</main>".to_string(),
            ]
        );
        assert!(page.overlay(id).is_some());
    }

    #[test]
    fn replace_body_drops_everything_when_nothing_kept() {
        let mut page = HostPage::new("Home", "", "<main>old</main>");
        let id = page.mount_overlay(OverlayKind::Modal, content("div", &["modal"], ""));
        page.replace_body(vec!["<p>new</p>".to_string()], &[]);
        assert!(page.overlay(id).is_none());
        assert_eq!(page.body_children(), vec!["<p>new</p>"]);
    }

    #[test]
    fn document_scripts_walk_head_and_body_in_order() {
        let mut page = HostPage::new(
            "Home",
            r#"<script src="head.js"></script>"#,
            "<div><script>one();</script></div>",
        );
        page.mount_overlay(
            OverlayKind::Modal,
            content("div", &["modal"], "<script>two();</script>"),
        );
        let scripts = page.document_scripts();
        assert_eq!(scripts.len(), 3);
        assert_eq!(
            scripts[0].attrs,
            vec![("src".to_string(), "head.js".to_string())]
        );
        assert_eq!(scripts[1].text, "one();");
        assert_eq!(scripts[2].text, "two();");
    }

    #[test]
    fn outer_html_escapes_attribute_values() {
        let mut page = HostPage::new("Home", "", "");
        let id = page.mount_overlay(
            OverlayKind::Modal,
            OverlayContent {
                tag: "div".to_string(),
                classes: vec!["modal".to_string()],
                attrs: vec![("data-note".to_string(), "a \"b\" & c".to_string())],
                inner_html: String::new(),
            },
        );
        let outer = page.overlay(id).expect("overlay").outer_html();
        assert_eq!(
            outer,
            r#"<div class="modal" data-note="a &quot;b&quot; &amp; c"></div>"#
        );
    }
}
