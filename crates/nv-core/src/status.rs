//! Single-slot status bar with timed auto-hide.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::surface::StatusSurface;

/// Prefix prepended to every error shown in the bar.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// How long a transient message stays up by default.
pub const DEFAULT_AUTOHIDE: Duration = Duration::from_millis(1800);

#[derive(Debug, Clone, Default)]
struct Slot {
    text: String,
    error: bool,
    dismissable: bool,
    visible: bool,
}

/// A one-message notification bar.
///
/// Showing a message replaces whatever was there before. Transient
/// messages take themselves down after the auto-hide delay; errors stay
/// until replaced or dismissed. Every new message bumps an epoch, and an
/// armed hide timer re-checks the epoch when it fires, so a timer armed
/// for an old message never takes down a newer one.
#[derive(Clone)]
pub struct StatusBar {
    surface: Arc<dyn StatusSurface>,
    slot: Arc<RwLock<Slot>>,
    epoch: Arc<AtomicU64>,
    autohide: Duration,
}

impl StatusBar {
    pub fn new(surface: Arc<dyn StatusSurface>, autohide: Duration) -> Self {
        Self {
            surface,
            slot: Arc::new(RwLock::new(Slot::default())),
            epoch: Arc::new(AtomicU64::new(0)),
            autohide,
        }
    }

    /// Show `message`; with `autohide` it disappears after the configured
    /// delay. Empty messages are ignored.
    pub fn show(&self, message: &str, autohide: bool) {
        if message.is_empty() {
            return;
        }
        self.display(message.to_owned(), autohide, false, false);
    }

    /// Show a persistent error, prefixed with [`ERROR_PREFIX`] and carrying
    /// a dismiss affordance.
    pub fn show_error(&self, message: &str) {
        self.display(format!("{ERROR_PREFIX}{message}"), false, true, true);
    }

    /// Take the bar down. Leaves the slot content alone, like a dismissed
    /// error whose text is simply no longer shown.
    pub fn hide(&self) {
        self.slot.write().visible = false;
        self.surface.hide();
    }

    /// Clear the text and error decoration and cancel any armed hide timer.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let mut slot = self.slot.write();
        slot.text.clear();
        slot.error = false;
        slot.dismissable = false;
    }

    pub fn message(&self) -> String {
        self.slot.read().text.clone()
    }

    pub fn is_error(&self) -> bool {
        self.slot.read().error
    }

    pub fn is_dismissable(&self) -> bool {
        self.slot.read().dismissable
    }

    pub fn is_visible(&self) -> bool {
        self.slot.read().visible
    }

    fn display(&self, text: String, autohide: bool, error: bool, dismissable: bool) {
        self.reset();
        {
            let mut slot = self.slot.write();
            slot.text = text.clone();
            slot.error = error;
            slot.dismissable = dismissable;
            slot.visible = true;
        }
        self.surface.show(&text, error, dismissable);
        if autohide {
            let armed = self.epoch.load(Ordering::SeqCst);
            let bar = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(bar.autohide).await;
                if bar.epoch.load(Ordering::SeqCst) == armed {
                    bar.hide();
                }
            });
        }
    }
}
