//! Presentation capability seam.
//!
//! The navigator owns classification and document surgery; everything a
//! presentation toolkit owns (show/hide animation, focus movement, the
//! blocking alert) crosses this trait. Any overlay-presentation library
//! can sit behind it; lifecycle events travel the other way through
//! `Navigator::overlay_shown` / `Navigator::overlay_hidden`.

use std::sync::{Arc, Mutex};

use crate::bind::FocusTarget;
use crate::page::{OverlayElement, OverlayId};
use crate::types::OverlayKind;

/// Toolkit operations the navigator invokes.
pub trait OverlayPresenter: Send {
    /// Run the toolkit's show behavior for a mounted overlay element.
    fn show(&mut self, overlay: &OverlayElement);

    /// Run the toolkit's hide behavior; the hidden lifecycle event later
    /// unmounts the element.
    fn hide(&mut self, overlay: &OverlayElement);

    /// Move keyboard focus to a field inside a shown overlay.
    fn focus(&mut self, overlay: &OverlayElement, target: &FocusTarget);

    /// Blocking user alert; the render fallback for unclassifiable
    /// responses.
    fn alert(&mut self, message: &str);
}

/// One recorded presenter operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterOp {
    Show {
        kind: OverlayKind,
        id: OverlayId,
        /// Element classes at the moment of the call; shows what state the
        /// toolkit observed (visibility-class ordering is load-bearing).
        classes: Vec<String>,
    },
    Hide {
        kind: OverlayKind,
        id: OverlayId,
    },
    Focus {
        kind: OverlayKind,
        id: OverlayId,
        target: FocusTarget,
    },
    Alert {
        message: String,
    },
}

/// Order-preserving presenter for tests and headless embedders.
///
/// Clones share the same log, so a clone kept outside the navigator can
/// inspect operations recorded after the original moved in.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    ops: Arc<Mutex<Vec<PresenterOp>>>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the operations recorded so far, oldest first.
    #[must_use]
    pub fn ops(&self) -> Vec<PresenterOp> {
        self.ops.lock().expect("presenter op log").clone()
    }

    fn record(&self, op: PresenterOp) {
        self.ops.lock().expect("presenter op log").push(op);
    }
}

impl OverlayPresenter for RecordingPresenter {
    fn show(&mut self, overlay: &OverlayElement) {
        self.record(PresenterOp::Show {
            kind: overlay.kind(),
            id: overlay.id(),
            classes: overlay.classes().to_vec(),
        });
    }

    fn hide(&mut self, overlay: &OverlayElement) {
        self.record(PresenterOp::Hide {
            kind: overlay.kind(),
            id: overlay.id(),
        });
    }

    fn focus(&mut self, overlay: &OverlayElement, target: &FocusTarget) {
        self.record(PresenterOp::Focus {
            kind: overlay.kind(),
            id: overlay.id(),
            target: target.clone(),
        });
    }

    fn alert(&mut self, message: &str) {
        self.record(PresenterOp::Alert {
            message: message.to_owned(),
        });
    }
}
