//! Response classification.
//!
//! Parses a fetched HTML body and locates whichever shape it carries:
//! dialog content for the modal slot, slide-in content for the panel slot,
//! or a complete page. The navigator tries these in a fixed order; this
//! module only answers "what does this document contain".

use scraper::{ElementRef, Html, Node, Selector};

/// Class marking an element as ready-made modal content.
pub(crate) const MODAL_CLASS: &str = "modal";
/// Class marking bare dialog content that needs a synthesized wrapper.
pub(crate) const DIALOG_CLASS: &str = "modal-dialog";
/// Class marking slide-in panel content.
pub(crate) const PANEL_CLASS: &str = "offcanvas";
/// Toolkit visibility class; must not leak from fetched markup into the
/// host page before the show call runs.
pub(crate) const VISIBLE_CLASS: &str = "show";

const FADE_CLASS: &str = "fade";

/// An ephemeral parsed response document. Not retained after rendering.
pub(crate) struct FetchedDocument {
    html: Html,
}

impl FetchedDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Parse as a bare fragment: no implied `<body>` element.
    #[cfg(test)]
    pub fn parse_fragment(text: &str) -> Self {
        Self {
            html: Html::parse_fragment(text),
        }
    }

    /// Dialog-shaped content, if any: the first `modal`-classed element
    /// as-is, else the first `modal-dialog`-classed element wrapped in a
    /// synthesized `modal fade` container.
    pub fn modal_content(&self) -> Option<OverlayContent> {
        if let Some(element) = self.first_with_class(MODAL_CLASS) {
            return Some(OverlayContent::from_element(element));
        }
        self.first_with_class(DIALOG_CLASS)
            .map(OverlayContent::synthesized_wrapper)
    }

    /// Slide-in content, if any: the first `offcanvas`-classed element.
    pub fn panel_content(&self) -> Option<OverlayContent> {
        self.first_with_class(PANEL_CLASS)
            .map(OverlayContent::from_element)
    }

    /// Complete-page content. `None` when the document has no body element,
    /// which signals the caller to decline without touching the page.
    pub fn page_content(&self) -> Option<PageContent> {
        let body_selector = Selector::parse("body").ok()?;
        let body = self.html.select(&body_selector).next()?;

        let title = Selector::parse("title")
            .ok()
            .and_then(|selector| self.html.select(&selector).next())
            .map(|element| element.text().collect::<String>().trim().to_string());

        let head_html = Selector::parse("head")
            .ok()
            .and_then(|selector| self.html.select(&selector).next())
            .map(|element| element.inner_html());

        Some(PageContent {
            title,
            head_html,
            body_children: serialize_children(body),
        })
    }

    fn first_with_class(&self, class: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(&format!(".{class}")).ok()?;
        self.html.select(&selector).next()
    }
}

/// Extracted overlay markup, decomposed so the outer element can be
/// preserved across in-place content swaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OverlayContent {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub inner_html: String,
}

impl OverlayContent {
    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let mut classes = Vec::new();
        let mut attrs = Vec::new();
        for (name, attr_value) in value.attrs() {
            if name == "class" {
                classes = attr_value.split_whitespace().map(str::to_owned).collect();
            } else {
                attrs.push((name.to_owned(), attr_value.to_owned()));
            }
        }
        Self {
            tag: value.name().to_owned(),
            classes,
            attrs,
            inner_html: element.inner_html(),
        }
    }

    /// Wrap a bare dialog element in the container the toolkit expects.
    fn synthesized_wrapper(dialog: ElementRef<'_>) -> Self {
        Self {
            tag: "div".to_owned(),
            classes: vec![MODAL_CLASS.to_owned(), FADE_CLASS.to_owned()],
            attrs: Vec::new(),
            inner_html: dialog.html(),
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    pub fn into_inner_html(self) -> String {
        self.inner_html
    }
}

/// Complete-page content for the full-page replacement strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageContent {
    pub title: Option<String>,
    pub head_html: Option<String>,
    pub body_children: Vec<String>,
}

/// A script element recorded for re-execution: markup inserted through a
/// document model does not auto-run embedded scripts the way a native page
/// load does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    /// Attributes of the original element, in document order.
    pub attrs: Vec<(String, String)>,
    /// Text content of the original element.
    pub text: String,
}

/// Collect every script element in a markup fragment, in document order.
pub(crate) fn collect_scripts(html: &str) -> Vec<ScriptTag> {
    let fragment = Html::parse_fragment(html);
    let Ok(selector) = Selector::parse("script") else {
        return Vec::new();
    };
    fragment
        .select(&selector)
        .map(|element| ScriptTag {
            attrs: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .collect(),
            text: element.text().collect(),
        })
        .collect()
}

/// Split a markup fragment into serialized top-level children.
pub(crate) fn fragment_children(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    serialize_children(fragment.root_element())
}

fn serialize_children(parent: ElementRef<'_>) -> Vec<String> {
    let mut children = Vec::new();
    for child in parent.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    children.push(element.html());
                }
            }
            Node::Text(text) => {
                if !text.trim().is_empty() {
                    children.push(text.to_string());
                }
            }
            _ => {}
        }
    }
    children
}
