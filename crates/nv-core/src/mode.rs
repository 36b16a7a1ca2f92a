//! Browse / create / edit mode machine.

/// What the editor panel is currently for.
///
/// The panel is open exactly when the mode is not [`Mode::Browse`]; every
/// transition updates the mode and the panel together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Browsing the gallery, panel closed.
    #[default]
    Browse,

    /// Filling in a brand-new entry.
    Create,

    /// Editing the active entry's details.
    Edit,
}

impl Mode {
    /// Whether the editor panel is open in this mode.
    pub fn panel_open(self) -> bool {
        !matches!(self, Mode::Browse)
    }

    /// Caption for the form's submit control, when a panel is open at all.
    pub fn save_label(self) -> Option<SaveLabel> {
        match self {
            Mode::Browse => None,
            Mode::Create => Some(SaveLabel::Create),
            Mode::Edit => Some(SaveLabel::Save),
        }
    }
}

/// Caption shown on the form's submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveLabel {
    Create,
    Save,
}

impl SaveLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveLabel::Create => "Create",
            SaveLabel::Save => "Save",
        }
    }
}
