//! The overlay navigation controller.
//!
//! One navigator per host page. Every navigation it handles runs the same
//! pipeline, whether it came from the page's trigger delegation or from a
//! form or link inside an already-open overlay: request the target, classify
//! the response, then render through the first strategy that accepts it, in
//! fixed order (modal, panel, full-page replacement, alert fallback).
//!
//! Overlapping navigations resolve deterministically: each takes a sequence
//! number at issue time and a response that is no longer the latest is
//! discarded before any page mutation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Method;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

use crate::bind::{self, Bindings, FormBinding, LinkBinding};
use crate::classify::{FetchedDocument, OverlayContent, VISIBLE_CLASS};
use crate::http::{FetchedResponse, Transport};
use crate::page::{HostPage, OverlayId, PageSnapshot};
use crate::presenter::OverlayPresenter;
use crate::types::{NavError, NavigationOutcome, NavigatorConfig, OverlayKind, PageEvent};

/// The two single-occupancy ownership slots for live overlay elements.
///
/// A slot is freed exactly when the hidden lifecycle event for its element
/// is delivered; until then, same-kind content replaces the live element's
/// inner markup instead of mounting a second one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct OverlaySlots {
    modal: Option<OverlayId>,
    panel: Option<OverlayId>,
}

impl OverlaySlots {
    fn get(self, kind: OverlayKind) -> Option<OverlayId> {
        match kind {
            OverlayKind::Modal => self.modal,
            OverlayKind::Panel => self.panel,
        }
    }

    fn set(&mut self, kind: OverlayKind, id: OverlayId) {
        match kind {
            OverlayKind::Modal => self.modal = Some(id),
            OverlayKind::Panel => self.panel = Some(id),
        }
    }

    fn take(&mut self, kind: OverlayKind) -> Option<OverlayId> {
        match kind {
            OverlayKind::Modal => self.modal.take(),
            OverlayKind::Panel => self.panel.take(),
        }
    }

    /// Ids of the currently open overlays, modal first.
    fn open(self) -> Vec<OverlayId> {
        self.modal.into_iter().chain(self.panel).collect()
    }
}

struct Shared {
    page: HostPage,
    slots: OverlaySlots,
    presenter: Box<dyn OverlayPresenter>,
    modal_bindings: Bindings,
    panel_bindings: Bindings,
    events: UnboundedSender<PageEvent>,
    latest_seq: u64,
}

/// The navigation controller.
///
/// Cheap to clone; clones share page state, the ownership slots, and the
/// sequence counter, so an embedder can spawn overlapping navigations and
/// still get latest-wins resolution.
#[derive(Clone)]
pub struct Navigator {
    shared: Arc<Mutex<Shared>>,
    transport: Transport,
    page_url: Url,
    seq: Arc<AtomicU64>,
}

impl Navigator {
    /// Create a navigator for the page at `page_url`.
    ///
    /// Returns the navigator and the receiver for its loaded /
    /// content-loaded notifications.
    pub fn new(
        page_url: Url,
        page: HostPage,
        presenter: Box<dyn OverlayPresenter>,
        config: &NavigatorConfig,
    ) -> Result<(Self, UnboundedReceiver<PageEvent>), NavError> {
        let transport = Transport::new(page_url.clone(), config)?;
        let (events, receiver) = mpsc::unbounded_channel();
        let shared = Shared {
            page,
            slots: OverlaySlots::default(),
            presenter,
            modal_bindings: Bindings::default(),
            panel_bindings: Bindings::default(),
            events,
            latest_seq: 0,
        };
        Ok((
            Self {
                shared: Arc::new(Mutex::new(shared)),
                transport,
                page_url,
                seq: Arc::new(AtomicU64::new(0)),
            },
            receiver,
        ))
    }

    /// Navigate to `target`, resolved against the page URL.
    pub async fn navigate(&self, target: &str) -> Result<NavigationOutcome, NavError> {
        let location = self.page_url.join(target)?;
        self.request(location, Method::GET, None).await
    }

    /// Submit an intercepted form: no real navigation happens, exactly one
    /// follow-up request with the form's method, action, and field snapshot.
    pub async fn submit(&self, form: &FormBinding) -> Result<NavigationOutcome, NavError> {
        self.request(form.action.clone(), form.method.clone(), Some(form.fields.clone()))
            .await
    }

    /// Follow an intercepted link.
    pub async fn follow(&self, link: &LinkBinding) -> Result<NavigationOutcome, NavError> {
        self.request(link.href.clone(), Method::GET, None).await
    }

    async fn request(
        &self,
        location: Url,
        method: Method,
        body: Option<Vec<(String, String)>>,
    ) -> Result<NavigationOutcome, NavError> {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.lock().await.latest_seq = ticket;
        tracing::debug!(location = %location, method = %method, ticket, "overlay navigation issued");

        let response = self.transport.send(&location, method, body.as_deref()).await?;

        let mut shared = self.shared.lock().await;
        if shared.latest_seq != ticket {
            tracing::warn!(
                location = %location,
                ticket,
                latest = shared.latest_seq,
                "discarding stale overlay response"
            );
            return Ok(NavigationOutcome::Superseded);
        }
        Ok(self.render(&mut shared, &response))
    }

    /// Classify a settled response and run the first accepting strategy.
    fn render(&self, shared: &mut Shared, response: &FetchedResponse) -> NavigationOutcome {
        if !response.is_html() {
            return Self::alert_fallback(shared, response);
        }
        let doc = FetchedDocument::parse(&response.body);
        if self.show_modal(shared, &doc) {
            return NavigationOutcome::Modal;
        }
        if self.show_panel(shared, &doc) {
            return NavigationOutcome::Panel;
        }
        if self.replace_page(shared, &doc) {
            return NavigationOutcome::PageReplaced;
        }
        Self::alert_fallback(shared, response)
    }

    fn alert_fallback(shared: &mut Shared, response: &FetchedResponse) -> NavigationOutcome {
        let status_text = response.status_text();
        tracing::warn!(status = %response.status, "response matched no render strategy");
        shared.presenter.alert(&status_text);
        NavigationOutcome::Alerted { status_text }
    }

    fn show_modal(&self, shared: &mut Shared, doc: &FetchedDocument) -> bool {
        let Some(content) = doc.modal_content() else {
            return false;
        };
        self.show_overlay(shared, OverlayKind::Modal, content);
        true
    }

    fn show_panel(&self, shared: &mut Shared, doc: &FetchedDocument) -> bool {
        let Some(mut content) = doc.panel_content() else {
            return false;
        };
        // Freshly parsed markup may already be marked visible in its own
        // context; that state must not reach the page before the show call.
        if shared.slots.get(OverlayKind::Panel).is_none() {
            content.remove_class(VISIBLE_CLASS);
        }
        self.show_overlay(shared, OverlayKind::Panel, content);
        true
    }

    fn show_overlay(&self, shared: &mut Shared, kind: OverlayKind, content: OverlayContent) {
        let id = if let Some(id) = shared.slots.get(kind) {
            shared
                .page
                .replace_overlay_content(id, content.into_inner_html());
            id
        } else {
            let id = shared.page.mount_overlay(kind, content);
            shared.slots.set(kind, id);
            id
        };
        tracing::debug!(kind = kind.as_str(), "overlay content rendered");

        let bindings = {
            let Shared { page, presenter, .. } = &mut *shared;
            match page.overlay(id) {
                Some(element) => {
                    presenter.show(element);
                    bind::harvest(element.inner_html(), &self.page_url)
                }
                None => Bindings::default(),
            }
        };
        match kind {
            OverlayKind::Modal => shared.modal_bindings = bindings,
            OverlayKind::Panel => shared.panel_bindings = bindings,
        }

        let _ = shared.events.send(PageEvent::OverlayLoaded(kind));
    }

    /// Full-page replacement. Declines (without any mutation) when the
    /// fetched document has no body element; otherwise body replacement,
    /// overlay hiding, head update, script re-execution, and the
    /// content-loaded notification run as one unit.
    fn replace_page(&self, shared: &mut Shared, doc: &FetchedDocument) -> bool {
        let Some(content) = doc.page_content() else {
            return false;
        };

        let keep = shared.slots.open();
        shared.page.replace_body(content.body_children, &keep);

        {
            let Shared { page, presenter, .. } = &mut *shared;
            for id in &keep {
                if let Some(element) = page.overlay(*id) {
                    presenter.hide(element);
                }
            }
        }

        if let Some(title) = content.title
            && title != shared.page.title()
        {
            shared.page.set_title(title);
        }
        if let Some(head_html) = content.head_html
            && head_html != shared.page.head_html()
        {
            shared.page.set_head_html(head_html);
        }

        let scripts = shared.page.document_scripts();
        shared.page.record_executed_scripts(scripts);

        let _ = shared.events.send(PageEvent::ContentLoaded);
        tracing::debug!(kept_overlays = keep.len(), "page content replaced");
        true
    }

    /// Toolkit "shown" lifecycle event for an overlay kind: focus the first
    /// focusable field inside the overlay, if any.
    pub async fn overlay_shown(&self, kind: OverlayKind) {
        let mut shared = self.shared.lock().await;
        let Some(id) = shared.slots.get(kind) else {
            return;
        };
        let Shared { page, presenter, .. } = &mut *shared;
        let Some(element) = page.overlay(id) else {
            return;
        };
        if let Some(target) = bind::first_focusable(element.inner_html()) {
            presenter.focus(element, &target);
        }
    }

    /// Toolkit "hidden" lifecycle event: unmount the element and free its
    /// slot, so the next same-kind response mounts a fresh element.
    pub async fn overlay_hidden(&self, kind: OverlayKind) {
        let mut shared = self.shared.lock().await;
        let Some(id) = shared.slots.take(kind) else {
            return;
        };
        shared.page.remove_overlay(id);
        match kind {
            OverlayKind::Modal => shared.modal_bindings = Bindings::default(),
            OverlayKind::Panel => shared.panel_bindings = Bindings::default(),
        }
        tracing::debug!(kind = kind.as_str(), "overlay unmounted");
    }

    /// Current interception table for an overlay kind.
    pub async fn bindings(&self, kind: OverlayKind) -> Bindings {
        let shared = self.shared.lock().await;
        match kind {
            OverlayKind::Modal => shared.modal_bindings.clone(),
            OverlayKind::Panel => shared.panel_bindings.clone(),
        }
    }

    /// Point-in-time view of the page.
    pub async fn snapshot(&self) -> PageSnapshot {
        let shared = self.shared.lock().await;
        PageSnapshot {
            title: shared.page.title().to_owned(),
            head_html: shared.page.head_html().to_owned(),
            body_children: shared.page.body_children(),
            modal: shared
                .slots
                .get(OverlayKind::Modal)
                .and_then(|id| shared.page.overlay_snapshot(id)),
            panel: shared
                .slots
                .get(OverlayKind::Panel)
                .and_then(|id| shared.page.overlay_snapshot(id)),
            executed_scripts: shared.page.executed_scripts().to_vec(),
        }
    }
}
