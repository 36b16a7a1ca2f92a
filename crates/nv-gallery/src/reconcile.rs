//! Reconciliation of a pending creation against the server's index.
//!
//! The backend assigns ids, so a freshly created visualization exists
//! locally only as a placeholder row until it shows up in the fetched
//! index. The reconciler polls for it and promotes the placeholder to
//! the first row this client has never seen.

use anyhow::Result;
use tracing::{debug, info};

use nv_core::{IndexRow, VisId};

use crate::gallery::Gallery;

/// What one reconciliation pass concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No creation is pending, so there is nothing to look for.
    Idle,

    /// The index was fetched but the new entry is not in it yet.
    StillPending,

    /// The placeholder was promoted to this server-assigned id.
    Promoted(VisId),
}

/// Polls the remote index on behalf of one pending creation.
///
/// One reconciler is spawned per creation and runs until promotion,
/// until the placeholder is gone or until a fetch fails.
pub struct Reconciler {
    gallery: Gallery,
}

impl Reconciler {
    pub fn new(gallery: Gallery) -> Self {
        Self { gallery }
    }

    /// One fetch-and-merge pass.
    ///
    /// With no placeholder outstanding no request goes out at all; the
    /// pass reports [`PollOutcome::Idle`] immediately.
    pub async fn poll_once(&self) -> Result<PollOutcome> {
        if !self.gallery.session.pending_active() {
            return Ok(PollOutcome::Idle);
        }
        let rows = self.gallery.remote.fetch_index().await?;
        Ok(self.merge(&rows))
    }

    /// Poll until the pending entry appears or the placeholder is gone.
    ///
    /// A fetch failure ends the loop through the shared failure handler,
    /// which also detaches the placeholder.
    pub async fn run(self) {
        loop {
            match self.poll_once().await {
                Ok(PollOutcome::StillPending) => {
                    debug!("pending entry not in the index yet");
                    tokio::time::sleep(self.gallery.config.poll_interval).await;
                }
                Ok(PollOutcome::Promoted(id)) => {
                    info!(id, "pending entry promoted");
                    return;
                }
                Ok(PollOutcome::Idle) => return,
                Err(err) => {
                    self.gallery.on_remote_failure(&err);
                    return;
                }
            }
        }
    }

    /// Fold one fetched index into the local state.
    ///
    /// Known rows get their dataset refs refreshed in place. The first
    /// unknown row is taken to be the pending creation: the placeholder
    /// becomes its listing row and the scan stops. Any further unknown
    /// rows stay invisible until the next full boot.
    fn merge(&self, rows: &[IndexRow]) -> PollOutcome {
        for row in rows {
            if self.gallery.index.contains(row.id) {
                self.gallery.index.set_dataset(row.id, row.dataset.clone());
                continue;
            }
            let Some(placeholder) = self.gallery.session.take_pending() else {
                break;
            };
            placeholder.promote(row.id, &row.name);
            self.gallery
                .index
                .register(row.id, &row.name, row.dataset.clone(), row.is_public);
            self.gallery.index.bind(row.id, placeholder);
            return PollOutcome::Promoted(row.id);
        }
        if self.gallery.session.pending_active() {
            PollOutcome::StillPending
        } else {
            PollOutcome::Idle
        }
    }
}
