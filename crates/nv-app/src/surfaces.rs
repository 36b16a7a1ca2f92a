//! Terminal implementations of the gallery's rendering surfaces.
//!
//! The browser front end slides panels and swaps DOM nodes; here the same
//! trait calls print lines and update a little state for `ls` to render.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use nv_core::{
    EntryBinding, EntryList, FormField, History, PageChrome, SaveLabel, StatusSurface,
    ViewportSurface, VisForm, VisId,
};

/// Status messages go straight to the terminal, one line each.
pub struct TermStatus;

impl StatusSurface for TermStatus {
    fn show(&self, text: &str, error: bool, _dismissable: bool) {
        if error {
            eprintln!("! {text}");
        } else {
            println!("* {text}");
        }
    }

    fn hide(&self) {
        // Printed lines scroll away on their own.
    }
}

#[derive(Clone, Default)]
struct RowState {
    id: Option<VisId>,
    label: String,
    selected: bool,
    attached: bool,
    pending: bool,
}

struct TermRow(Arc<Mutex<RowState>>);

impl EntryBinding for TermRow {
    fn set_label(&self, label: &str) {
        self.0.lock().label = label.to_owned();
    }

    fn set_selected(&self, selected: bool) {
        self.0.lock().selected = selected;
    }

    fn promote(&self, id: VisId, label: &str) {
        let mut row = self.0.lock();
        row.id = Some(id);
        row.label = label.to_owned();
        row.pending = false;
    }

    fn detach(&self) {
        self.0.lock().attached = false;
    }
}

/// The listing, rendered on demand by the `ls` command.
#[derive(Default)]
pub struct TermList {
    rows: Mutex<Vec<Arc<Mutex<RowState>>>>,
}

impl TermList {
    /// One line per attached row, placeholders included.
    pub fn render(&self) -> Vec<String> {
        self.rows
            .lock()
            .iter()
            .map(|row| row.lock().clone())
            .filter(|row| row.attached)
            .map(|row| {
                let marker = if row.selected { '>' } else { ' ' };
                match row.id {
                    Some(id) => format!("{marker} {id:>4}  {}", row.label),
                    None => format!("{marker}    ?  {}", row.label),
                }
            })
            .collect()
    }
}

impl EntryList for TermList {
    fn bind(&self, id: VisId, label: &str) -> Arc<dyn EntryBinding> {
        let state = Arc::new(Mutex::new(RowState {
            id: Some(id),
            label: label.to_owned(),
            attached: true,
            ..RowState::default()
        }));
        self.rows.lock().push(state.clone());
        Arc::new(TermRow(state))
    }

    fn insert_pending(&self) -> Arc<dyn EntryBinding> {
        let state = Arc::new(Mutex::new(RowState {
            label: "...".to_owned(),
            attached: true,
            pending: true,
            ..RowState::default()
        }));
        self.rows.lock().insert(0, state.clone());
        Arc::new(TermRow(state))
    }

    fn deselect_all(&self) {
        for row in self.rows.lock().iter() {
            row.lock().selected = false;
        }
    }
}

/// Holds the last spliced view content and announces changes.
#[derive(Default)]
pub struct TermViewport {
    content: Mutex<Option<String>>,
}

impl ViewportSurface for TermViewport {
    fn splice(&self, content: &str) {
        println!("[view] {} bytes of markup", content.len());
        *self.content.lock() = Some(content.to_owned());
    }

    fn clear(&self) {
        if self.content.lock().take().is_some() {
            println!("[view] cleared");
        }
    }
}

/// There is no address bar; navigation is only logged.
#[derive(Default)]
pub struct TermHistory {
    path: Mutex<String>,
}

impl History for TermHistory {
    fn push(&self, path: &str) {
        debug!(path, "navigated");
        *self.path.lock() = path.to_owned();
    }
}

#[derive(Default)]
struct ChromeState {
    panel_open: bool,
    help: bool,
    save_label: Option<SaveLabel>,
    form: VisForm,
}

/// Editor panel, help overlay and embed popover, reduced to printouts.
///
/// The enable/visibility toggles that only restyle controls in the
/// browser have nothing to show here and are accepted silently.
#[derive(Default)]
pub struct TermChrome {
    state: Mutex<ChromeState>,
}

impl TermChrome {
    fn edit_form(&self, apply: impl FnOnce(&mut VisForm)) {
        let mut state = self.state.lock();
        if !state.panel_open {
            println!("no editor open; `new` or `edit` first");
            return;
        }
        apply(&mut state.form);
    }

    pub fn set_name(&self, name: &str) {
        self.edit_form(|form| form.name = name.to_owned());
    }

    pub fn set_link(&self, link: &str) {
        self.edit_form(|form| form.spreadsheet_link = link.to_owned());
    }

    pub fn set_public(&self, public: bool) {
        self.edit_form(|form| form.is_public = public);
    }
}

impl PageChrome for TermChrome {
    fn set_panel_open(&self, open: bool) {
        let mut state = self.state.lock();
        let was = std::mem::replace(&mut state.panel_open, open);
        if open && !was {
            let label = state.save_label.map(|l| l.as_str()).unwrap_or("Save");
            println!("--- editor ({label}) ---");
            println!("  name:   {}", state.form.name);
            println!("  link:   {}", state.form.spreadsheet_link);
            println!(
                "  public: {}",
                if state.form.is_public { "on" } else { "off" }
            );
        }
    }

    fn set_action_bar_visible(&self, _visible: bool) {}

    fn set_help_visible(&self, visible: bool) {
        let was = std::mem::replace(&mut self.state.lock().help, visible);
        if visible && !was {
            println!("Browse the gallery with `ls` and `open <id>`. `new` starts a");
            println!("visualization from a Google Spreadsheet; `edit` reworks the open one.");
        }
    }

    fn set_save_label(&self, label: SaveLabel) {
        self.state.lock().save_label = Some(label);
    }

    fn set_delete_visible(&self, _visible: bool) {}

    fn set_edit_enabled(&self, _enabled: bool) {}

    fn set_refresh_enabled(&self, _enabled: bool) {}

    fn set_refresh_tip_visible(&self, _visible: bool) {}

    fn fill_form(&self, form: &VisForm) {
        self.state.lock().form = form.clone();
    }

    fn read_form(&self) -> VisForm {
        self.state.lock().form.clone()
    }

    fn focus_field(&self, field: FormField) {
        debug!(?field, "focus requested");
    }

    fn show_embed(&self, snippet: &str) {
        println!("--- embed snippet ---");
        println!("{snippet}");
    }

    fn hide_embed(&self) {}
}
