//! Create, update, delete and refresh against the remote authority.
//!
//! Every operation has the same shape: validate, apply the local
//! mutations synchronously, then dispatch the request and reconcile in a
//! spawned task when the response lands. Delete and rename stay applied
//! even if the server later rejects them; the next full reload squares
//! the local state up again.

use tracing::warn;

use nv_core::{link, FormField, Mode, VisForm};

use crate::gallery::Gallery;
use crate::reconcile::Reconciler;

impl Gallery {
    /// Submit the editor form, creating or updating per the current mode.
    ///
    /// Validation failures leave the panel open and send nothing. Once a
    /// request is dispatched the panel closes and the page returns to
    /// browsing.
    pub fn save(&self) {
        let form = self.chrome.read_form();
        if !self.require(&form.name, FormField::Name, "Please name your visualization.") {
            return;
        }
        if !self.require(
            &form.spreadsheet_link,
            FormField::SpreadsheetLink,
            "Please provide a valid spreadsheet link.",
        ) {
            return;
        }
        let dispatched = if self.session.mode() == Mode::Edit {
            self.dispatch_update(&form)
        } else {
            self.dispatch_create(&form);
            true
        };
        if dispatched {
            self.leave_to_browse();
        }
    }

    fn require(&self, value: &str, field: FormField, message: &str) -> bool {
        if value.is_empty() {
            self.status.show(message, true);
            self.chrome.focus_field(field);
            return false;
        }
        true
    }

    /// Issue a creation, tracked by a pending placeholder until the
    /// poller discovers the server-assigned id.
    fn dispatch_create(&self, form: &VisForm) {
        let placeholder = self.list.insert_pending();
        self.session.set_pending(placeholder);
        self.status.show(
            &format!("Creating new visualization \"{}\"...", form.name),
            false,
        );

        let this = self.clone();
        let form = form.clone();
        tokio::spawn(async move {
            match this.remote.create(&form).await {
                Ok(()) => {
                    this.status.show("Finished creation.", true);
                    // Give the backend a moment to index the new entry
                    // before the first poll.
                    tokio::time::sleep(this.config.settle_delay).await;
                    Reconciler::new(this.clone()).run().await;
                }
                Err(err) => this.on_remote_failure(&err),
            }
        });
    }

    /// Issue an update for the active entry, applying the rename and
    /// index changes optimistically. Returns false when validation fails,
    /// in which case nothing was sent.
    fn dispatch_update(&self, form: &VisForm) -> bool {
        let Some(active) = self.session.active() else {
            warn!("update submitted with nothing open");
            return false;
        };
        let Some(new_dataset) = link::dataset_ref(&form.spreadsheet_link) else {
            self.status.show_error("Invalid spreadsheet URL.");
            return false;
        };
        let dataset_changed = self.index.dataset_of(active).as_ref() != Some(&new_dataset);

        self.index.rename(active, &form.name);
        self.index.set_dataset(active, new_dataset);
        self.index.set_visibility(active, form.is_public);
        self.status.show("Updating details...", false);

        let this = self.clone();
        let form = form.clone();
        tokio::spawn(async move {
            match this.remote.update(active, &form).await {
                Ok(()) => {
                    this.status.show("Update complete.", true);
                    if dataset_changed {
                        tokio::time::sleep(this.config.settle_delay).await;
                        // Only reopen what the user is still looking at.
                        if this.session.active() == Some(active) {
                            this.refresh();
                        }
                    }
                }
                Err(err) => this.on_remote_failure(&err),
            }
        });
        true
    }

    /// Delete the active entry. The listing row, viewport and index entry
    /// go away immediately; the server's answer only decides the final
    /// notification.
    pub fn delete(&self) {
        let Some(active) = self.session.active() else {
            warn!("delete requested with nothing open");
            return;
        };
        let name = self.index.name_of(active).unwrap_or_default();
        let form = self.chrome.read_form();

        if let Some(binding) = self.index.remove(active) {
            binding.detach();
        }
        self.clear_view();
        self.chrome.set_action_bar_visible(false);
        self.session.set_active(None);
        self.history.push("/");
        self.leave_to_browse();
        self.status.show(&format!("Deleting \"{name}\"..."), true);

        let this = self.clone();
        tokio::spawn(async move {
            match this.remote.delete(active, &form).await {
                Ok(()) => this
                    .status
                    .show(&format!("Deleted graph \"{name}\"."), true),
                Err(err) => this.on_remote_failure(&err),
            }
        });
    }

    /// Re-pull spreadsheet data for the active visualization, then reopen
    /// it if it is still the one on screen.
    pub fn refresh(&self) {
        let Some(active) = self.session.active() else {
            warn!("refresh requested with nothing open");
            return;
        };
        self.chrome.set_refresh_enabled(false);
        self.chrome.set_refresh_tip_visible(false);
        self.status.show("Refreshing data from spreadsheet...", false);

        let this = self.clone();
        tokio::spawn(async move {
            match this.remote.reload(active).await {
                Ok(()) => {
                    this.chrome.set_refresh_enabled(true);
                    this.status.show("Visualization data refreshed!", true);
                    if this.session.active() == Some(active) {
                        // Same id, so open() skips the loading flash.
                        this.open(active).await;
                    }
                }
                Err(err) => this.on_remote_failure(&err),
            }
        });
    }
}
