//! Domain types for remote overlay navigation.
//!
//! Configuration, errors, navigation outcomes, and the page-level
//! notification events emitted by the navigator.

use serde::Deserialize;
use thiserror::Error;

/// Which of the two overlay slots a piece of content targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    /// A centered modal dialog.
    Modal,
    /// A slide-in panel along a page edge.
    Panel,
}

impl OverlayKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modal => "modal",
            Self::Panel => "panel",
        }
    }
}

/// How a completed navigation was rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Dialog-shaped content was mounted or refreshed in the modal slot.
    Modal,
    /// Slide-in content was mounted or refreshed in the panel slot.
    Panel,
    /// A complete page replaced the current body and head.
    PageReplaced,
    /// The response matched no render strategy; its status text was surfaced
    /// through the presenter's blocking alert.
    Alerted {
        /// Status text shown to the user.
        status_text: String,
    },
    /// A newer navigation was issued while this one was in flight; the
    /// response was discarded without touching page state.
    Superseded,
}

/// Page-level notifications emitted on the navigator's event channel.
///
/// This is a closed enum: only the navigator constructs these variants,
/// overlay content and page scripts cannot fabricate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Overlay content of the given kind finished loading (mount or in-place
    /// refresh). Bubbles to whoever holds the receiver.
    OverlayLoaded(OverlayKind),
    /// A full-page replacement completed; listeners should re-initialize
    /// against the new content.
    ContentLoaded,
}

/// Navigation error.
///
/// Render fallbacks (non-HTML responses, unclassifiable markup) are not
/// errors; they surface as [`NavigationOutcome::Alerted`]. Only transport
/// and target-resolution failures reach the caller as `Err`.
#[derive(Debug, Error)]
pub enum NavError {
    /// The navigation target could not be resolved to a URL.
    #[error("invalid navigation target: {0}")]
    InvalidTarget(#[from] url::ParseError),

    /// Building the HTTP client or performing the request failed.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Navigator configuration.
///
/// All fields are optional; accessors apply the defaults. Maps to a
/// `[navigator]` table when deserialized from an embedder's config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigatorConfig {
    /// User-Agent string for overlay requests.
    pub user_agent: Option<String>,

    /// Request timeout in seconds. Default: 20.
    pub timeout_seconds: Option<u32>,
}

impl NavigatorConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECONDS: u32 = 20;

    #[must_use]
    pub fn timeout_seconds(&self) -> u32 {
        self.timeout_seconds
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::{NavigatorConfig, OverlayKind};

    #[test]
    fn default_config_accessors() {
        let config = NavigatorConfig::default();
        assert_eq!(config.timeout_seconds(), 20);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn explicit_timeout_wins() {
        let config = NavigatorConfig {
            timeout_seconds: Some(5),
            ..Default::default()
        };
        assert_eq!(config.timeout_seconds(), 5);
    }

    #[test]
    fn kind_names() {
        assert_eq!(OverlayKind::Modal.as_str(), "modal");
        assert_eq!(OverlayKind::Panel.as_str(), "panel");
    }
}
