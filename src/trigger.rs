//! Trigger surface.
//!
//! A page opts an element into remote overlay navigation with
//! `data-toggle="remote-modal"`; the target comes from its `href` attribute,
//! falling back to `data-href` for non-anchor elements. The embedder's click
//! delegation calls [`resolve_target`] and, on a hit, cancels the default
//! navigation and hands the target to the navigator.

use scraper::{ElementRef, Html, Selector};

/// Attribute marking an element as an overlay trigger.
pub const TRIGGER_ATTR: &str = "data-toggle";
/// Marker value that opts an element in.
pub const TRIGGER_VALUE: &str = "remote-modal";
/// Fallback target attribute for elements without an `href`.
pub const TARGET_ATTR: &str = "data-href";

/// Resolve the navigation target of a trigger element, if it is one.
#[must_use]
pub fn resolve_target(element: ElementRef<'_>) -> Option<String> {
    let value = element.value();
    if value.attr(TRIGGER_ATTR) != Some(TRIGGER_VALUE) {
        return None;
    }
    value
        .attr("href")
        .or_else(|| value.attr(TARGET_ATTR))
        .filter(|target| !target.is_empty())
        .map(str::to_owned)
}

/// Scan markup for trigger elements and return their targets in document
/// order. Convenience for embedders wiring delegation over server-rendered
/// pages.
#[must_use]
pub fn scan_targets(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(&format!("[{TRIGGER_ATTR}={TRIGGER_VALUE}]")) else {
        return Vec::new();
    };
    document.select(&selector).filter_map(resolve_target).collect()
}

#[cfg(test)]
mod tests {
    use super::{scan_targets, TARGET_ATTR};

    #[test]
    fn anchor_href_wins() {
        let targets = scan_targets(
            r#"<a data-toggle="remote-modal" href="/detail/3" data-href="/ignored">open</a>"#,
        );
        assert_eq!(targets, vec!["/detail/3"]);
    }

    #[test]
    fn data_href_fallback_for_non_anchors() {
        let targets = scan_targets(
            r#"<button data-toggle="remote-modal" data-href="/detail/9">open</button>"#,
        );
        assert_eq!(targets, vec!["/detail/9"]);
    }

    #[test]
    fn unmarked_elements_are_ignored() {
        let targets = scan_targets(r#"<a href="/plain">plain</a><a data-toggle="remote-modal">no target</a>"#);
        assert!(targets.is_empty());
    }

    #[test]
    fn attr_names_are_stable() {
        // Servers render these attribute names; they are part of the protocol.
        assert_eq!(TARGET_ATTR, "data-href");
    }
}
