//! Remote URL content as in-place overlays.
//!
//! This crate lets a host page open the content of another URL as a modal
//! dialog or slide-in panel without a full navigation, falling back to a
//! full in-place page replacement when the response is not overlay-shaped.
//! One controller, the [`Navigator`], owns the whole flow.
//!
//! # Pipeline
//!
//! Every intercepted navigation runs the same stages:
//!
//! 1. **Request** - fetch the target with the page URL attached as the
//!    `X-Referer` header; form submissions ride the same path, form-encoded
//! 2. **Classify** - parse the body and look for dialog-shaped, panel-shaped,
//!    or complete-page content, in that order
//! 3. **Render** - mount a new overlay element or swap the live one's inner
//!    content in place; or replace the page body/head while keeping open
//!    overlays floating above the new content
//! 4. **Rebind** - re-harvest forms and anchors inside the overlay so the
//!    next interaction routes back through the navigator
//!
//! Responses that fit no strategy surface their status text through the
//! presenter's blocking alert. Overlapping navigations resolve latest-wins:
//! stale responses are discarded before touching page state.
//!
//! # Usage
//!
//! ```ignore
//! use remote_overlay::{HostPage, Navigator, NavigatorConfig, OverlayKind, RecordingPresenter};
//!
//! let page = HostPage::new("Items", head_markup, body_markup);
//! let presenter = RecordingPresenter::new();
//! let (navigator, mut events) = Navigator::new(
//!     page_url,
//!     page,
//!     Box::new(presenter.clone()),
//!     &NavigatorConfig::default(),
//! )?;
//!
//! navigator.navigate("/items/3/edit").await?;
//! let form = navigator.bindings(OverlayKind::Modal).await.forms[0].clone();
//! navigator.submit(&form).await?;
//! ```

mod bind;
mod classify;
mod http;
mod navigator;
mod page;
mod presenter;
mod types;

pub mod trigger;

pub use bind::{Bindings, FocusTarget, FormBinding, LinkBinding};
pub use classify::ScriptTag;
pub use http::REFERER_HEADER;
pub use navigator::Navigator;
pub use page::{HostPage, OverlayElement, OverlayId, OverlaySnapshot, PageSnapshot};
pub use presenter::{OverlayPresenter, PresenterOp, RecordingPresenter};
pub use types::{NavError, NavigationOutcome, NavigatorConfig, OverlayKind, PageEvent};
