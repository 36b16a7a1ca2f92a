//! Mode transitions: browse, create, edit.
//!
//! Each transition updates the session mode and the editor panel in the
//! same synchronous call, so the two can never disagree.

use tracing::warn;

use nv_core::{link, Mode, VisForm};

use crate::gallery::Gallery;

impl Gallery {
    /// Point the session at `mode` and caption the submit control for it.
    /// Browsing leaves the caption alone; the panel is closed then anyway.
    fn switch_mode(&self, mode: Mode) {
        self.session.set_mode(mode);
        if let Some(label) = mode.save_label() {
            self.chrome.set_save_label(label);
        }
    }

    /// Open the editor panel on a blank form for a new visualization.
    pub fn begin_create(&self) {
        self.switch_mode(Mode::Create);
        self.clear_view();
        self.show_help();
        self.chrome.set_delete_visible(false);
        self.list.deselect_all();
        self.chrome.fill_form(&VisForm {
            is_public: true,
            ..VisForm::default()
        });
        self.chrome.set_panel_open(true);
    }

    /// Open the editor panel pre-filled with the active entry's details.
    ///
    /// Ignored while an edit is already underway, when nothing is open,
    /// or when the active id is missing from the index.
    pub fn begin_edit(&self) {
        if self.session.mode() == Mode::Edit {
            return;
        }
        let Some(id) = self.session.active() else {
            warn!("edit requested with nothing open");
            return;
        };
        let Some(entry) = self.index.lookup(id) else {
            warn!(id, "edit requested for an entry missing from the index");
            return;
        };
        self.switch_mode(Mode::Edit);
        self.chrome.set_edit_enabled(false);
        self.chrome.set_delete_visible(true);
        self.chrome.fill_form(&VisForm {
            name: entry.name,
            spreadsheet_link: link::canonical_link(&entry.dataset),
            is_public: entry.is_public,
            vis_id: Some(id),
        });
        self.chrome.set_panel_open(true);
    }

    /// Close the editor panel and return to browsing.
    pub fn leave_to_browse(&self) {
        self.switch_mode(Mode::Browse);
        self.chrome.set_panel_open(false);
        self.chrome.set_edit_enabled(true);
        self.chrome.set_help_visible(false);
    }
}
