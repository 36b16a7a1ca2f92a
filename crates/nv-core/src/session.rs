//! Per-page session state: the active visualization, the current mode and
//! the pending-creation placeholder.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::entry::VisId;
use crate::mode::Mode;
use crate::surface::EntryBinding;

/// Mutable state of one gallery session.
///
/// At most one creation can be pending at a time; the slot holds the
/// placeholder row until the poller promotes it or a failure clears it.
/// The surrounding UI keeps a second creation from being issued while the
/// slot is occupied, so an occupied slot on `set_pending` means a bug
/// upstream and is logged, not papered over.
pub struct Session {
    active: RwLock<Option<VisId>>,
    mode: RwLock<Mode>,
    pending: RwLock<Option<Arc<dyn EntryBinding>>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            active: RwLock::new(None),
            mode: RwLock::new(Mode::Browse),
            pending: RwLock::new(None),
        }
    }

    /// Visualization currently shown, if any.
    pub fn active(&self) -> Option<VisId> {
        *self.active.read()
    }

    pub fn set_active(&self, id: Option<VisId>) {
        *self.active.write() = id;
    }

    pub fn mode(&self) -> Mode {
        *self.mode.read()
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.write() = mode;
    }

    /// Whether a creation is still waiting for its server-assigned id.
    pub fn pending_active(&self) -> bool {
        self.pending.read().is_some()
    }

    /// Park the placeholder row of a freshly issued creation.
    pub fn set_pending(&self, placeholder: Arc<dyn EntryBinding>) {
        let mut slot = self.pending.write();
        if let Some(old) = slot.replace(placeholder) {
            warn!("pending placeholder replaced while still outstanding");
            old.detach();
        }
    }

    /// Claim the placeholder, leaving the slot empty.
    pub fn take_pending(&self) -> Option<Arc<dyn EntryBinding>> {
        self.pending.write().take()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
