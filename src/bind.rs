//! Interception harvest for overlay content.
//!
//! Every time overlay content is mounted or swapped, the forms and anchors
//! inside it are harvested into bindings that route back through the
//! navigator, so interactions inside the overlay never trigger a real
//! navigation. Also locates the field that receives focus when an overlay
//! finishes showing.

use reqwest::Method;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An intercepted form: action, method, and a snapshot of field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding {
    /// Submission target, resolved against the page URL.
    pub action: Url,
    pub method: Method,
    /// Current field values, form-encoded on submit.
    pub fields: Vec<(String, String)>,
}

/// An intercepted anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBinding {
    /// Destination, resolved against the page URL.
    pub href: Url,
}

/// The interception table of one overlay's current content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    pub forms: Vec<FormBinding>,
    pub links: Vec<LinkBinding>,
}

/// The field focused when an overlay finishes showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTarget {
    pub tag: String,
    pub name: Option<String>,
    pub id: Option<String>,
}

/// Harvest the interception table from overlay content.
pub(crate) fn harvest(inner_html: &str, base: &Url) -> Bindings {
    let fragment = Html::parse_fragment(inner_html);
    let mut bindings = Bindings::default();

    if let Ok(selector) = Selector::parse("form") {
        for form in fragment.select(&selector) {
            let action = match form.value().attr("action") {
                Some(action) if !action.trim().is_empty() => match base.join(action) {
                    Ok(url) => url,
                    Err(_) => continue,
                },
                // A form without an action submits to the current location.
                _ => base.clone(),
            };
            bindings.forms.push(FormBinding {
                action,
                method: form_method(form.value().attr("method")),
                fields: field_snapshot(form),
            });
        }
    }

    if let Ok(selector) = Selector::parse("a[href]") {
        for anchor in fragment.select(&selector) {
            if let Some(href) = anchor.value().attr("href")
                && let Ok(href) = base.join(href)
            {
                bindings.links.push(LinkBinding { href });
            }
        }
    }

    bindings
}

/// First focusable field in document order: an input that is not
/// `type=hidden`, a select, or a textarea.
pub(crate) fn first_focusable(inner_html: &str) -> Option<FocusTarget> {
    let fragment = Html::parse_fragment(inner_html);
    let selector = Selector::parse("input:not([type=hidden]), select, textarea").ok()?;
    fragment.select(&selector).next().map(|element| FocusTarget {
        tag: element.value().name().to_owned(),
        name: element.value().attr("name").map(str::to_owned),
        id: element.value().attr("id").map(str::to_owned),
    })
}

fn form_method(attr: Option<&str>) -> Method {
    match attr {
        Some(method) if method.eq_ignore_ascii_case("post") => Method::POST,
        _ => Method::GET,
    }
}

/// Snapshot current field values the way a form-data capture would:
/// named, enabled fields only; checked checkboxes/radios; the selected
/// option of each select; textarea text.
fn field_snapshot(form: ElementRef<'_>) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let Ok(selector) = Selector::parse("input, select, textarea") else {
        return fields;
    };

    for field in form.select(&selector) {
        if field.value().attr("disabled").is_some() {
            continue;
        }
        let Some(name) = field.value().attr("name").filter(|name| !name.is_empty()) else {
            continue;
        };

        match field.value().name() {
            "input" => {
                let kind = field
                    .value()
                    .attr("type")
                    .unwrap_or("text")
                    .to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "button" | "reset" | "image" | "file" => {}
                    "checkbox" | "radio" => {
                        if field.value().attr("checked").is_some() {
                            let value = field.value().attr("value").unwrap_or("on");
                            fields.push((name.to_owned(), value.to_owned()));
                        }
                    }
                    _ => {
                        let value = field.value().attr("value").unwrap_or("");
                        fields.push((name.to_owned(), value.to_owned()));
                    }
                }
            }
            "select" => {
                if let Some(value) = select_value(field) {
                    fields.push((name.to_owned(), value));
                }
            }
            "textarea" => {
                fields.push((name.to_owned(), field.text().collect()));
            }
            _ => {}
        }
    }

    fields
}

fn select_value(select: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("option").ok()?;
    let mut first = None;
    for option in select.select(&selector) {
        let value = option.value().attr("value").map_or_else(
            || option.text().collect::<String>().trim().to_owned(),
            str::to_owned,
        );
        if option.value().attr("selected").is_some() {
            return Some(value);
        }
        if first.is_none() {
            first = Some(value);
        }
    }
    first
}
