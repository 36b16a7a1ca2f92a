//! Trait seams between the controller and whatever renders the page.
//!
//! The controller never touches a concrete widget toolkit. It drives these
//! traits, and the embedding application decides whether they are backed by
//! a browser DOM, a terminal, or a test recorder.

use std::sync::Arc;

use crate::entry::VisId;
use crate::mode::SaveLabel;
use crate::remote::VisForm;

/// Where status messages land.
pub trait StatusSurface: Send + Sync {
    /// Display `text`, replacing any previous message.
    fn show(&self, text: &str, error: bool, dismissable: bool);

    /// Take the bar down.
    fn hide(&self);
}

/// Handle to one row in the gallery listing.
///
/// A row usually represents a server-side entry, but a freshly created one
/// starts life as a pending placeholder with no id until the poller
/// [`promote`](EntryBinding::promote)s it.
pub trait EntryBinding: Send + Sync {
    /// Update the displayed label.
    fn set_label(&self, label: &str);

    /// Toggle the selected highlight.
    fn set_selected(&self, selected: bool);

    /// Give a placeholder its real identity and make it open that entry.
    fn promote(&self, id: VisId, label: &str);

    /// Remove the row from the listing.
    fn detach(&self);
}

/// The gallery listing itself.
pub trait EntryList: Send + Sync {
    /// Append a row for a known entry.
    fn bind(&self, id: VisId, label: &str) -> Arc<dyn EntryBinding>;

    /// Prepend the `"..."` placeholder row for an entry still being created.
    fn insert_pending(&self) -> Arc<dyn EntryBinding>;

    /// Drop the selected highlight from every row.
    fn deselect_all(&self);
}

/// The main viewport the server-rendered visualization content lands in.
pub trait ViewportSurface: Send + Sync {
    /// Replace the viewport content and reveal it.
    fn splice(&self, content: &str);

    /// Empty and conceal the viewport.
    fn clear(&self);
}

/// Session history, so the address bar follows navigation.
pub trait History: Send + Sync {
    /// Record `path` as the current location without triggering a load.
    fn push(&self, path: &str);
}

/// Which form field to put the cursor in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    SpreadsheetLink,
}

/// Everything on the page that is not the listing, the viewport or the
/// status bar: the editor panel, the action bar, the help overlay and the
/// embed snippet popover.
pub trait PageChrome: Send + Sync {
    /// Slide the editor panel in or out.
    fn set_panel_open(&self, open: bool);

    /// Show or hide the action bar above the viewport.
    fn set_action_bar_visible(&self, visible: bool);

    /// Show or hide the help overlay.
    fn set_help_visible(&self, visible: bool);

    /// Caption the form's submit control.
    fn set_save_label(&self, label: SaveLabel);

    /// Show or hide the delete control inside the panel.
    fn set_delete_visible(&self, visible: bool);

    /// Enable or disable the edit control.
    fn set_edit_enabled(&self, enabled: bool);

    /// Enable or disable the refresh control.
    fn set_refresh_enabled(&self, enabled: bool);

    /// Show or hide the refresh control's tooltip.
    fn set_refresh_tip_visible(&self, visible: bool);

    /// Overwrite the form fields.
    fn fill_form(&self, form: &VisForm);

    /// Read the form fields as the user left them.
    fn read_form(&self) -> VisForm;

    /// Put the cursor in `field`.
    fn focus_field(&self, field: FormField);

    /// Reveal the embed popover with `snippet` in it.
    fn show_embed(&self, snippet: &str);

    /// Conceal the embed popover.
    fn hide_embed(&self);
}
