//! Controller configuration.

use std::time::Duration;

use nv_core::{VisId, DEFAULT_AUTOHIDE};

use crate::content::ViewScope;

/// Delay between reconciliation poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Grace period between a confirmed mutation and its follow-up fetch,
/// giving the backend time to propagate.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Knobs of one gallery session.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Public origin used in embed snippets, without a trailing slash.
    pub hostname: String,

    /// Visualization the server-rendered page already shows, if any.
    pub initial_vis: Option<VisId>,

    /// Which part of fetched view pages lands in the viewport.
    pub view_scope: ViewScope,

    /// Delay between reconciliation poll cycles.
    pub poll_interval: Duration,

    /// Grace period between a confirmed mutation and its follow-up fetch.
    pub settle_delay: Duration,

    /// How long transient status messages stay up.
    pub autohide: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            hostname: "http://localhost:8080".to_owned(),
            initial_vis: None,
            view_scope: ViewScope::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
            autohide: DEFAULT_AUTOHIDE,
        }
    }
}
