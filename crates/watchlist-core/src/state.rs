use serde::Serialize;
use watchlist_models::{Movie, Notice};

/// Icon of the watchlist floating action button
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum FabIcon {
    Add,
    Delete,
}

impl FabIcon {
    /// `Delete` while anything is selected, `Add` otherwise
    pub fn for_selection_len(len: usize) -> Self {
        if len > 0 {
            FabIcon::Delete
        } else {
            FabIcon::Add
        }
    }
}

/// Everything a screen's view should show at one instant.
///
/// States are delivered one at a time and are never merged or diffed.
/// Each screen emits only the variants that make sense for it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ScreenState {
    /// A read is in flight; the progress indicator is visible.
    Loading,
    /// Transient progress indicator toggle.
    Progress(bool),
    Empty,
    Data(Vec<Movie>),
    Error(Notice),
    /// A write just completed.
    Completed(Notice),
    /// Confirmed deletion removed these movies from the displayed list.
    UpdateData { removed: Vec<Movie>, notice: Notice },
    FloatingActionButtonImage(FabIcon),
    ShowDeleteConfirmation,
    NavigateToSearch,
}

impl ScreenState {
    /// Progress indicator visibility implied by this state, if any.
    pub fn progress_visible(&self) -> Option<bool> {
        match self {
            ScreenState::Loading => Some(true),
            ScreenState::Progress(visible) => Some(*visible),
            _ => None,
        }
    }
}
