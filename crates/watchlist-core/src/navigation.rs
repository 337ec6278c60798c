use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};
use watchlist_models::{MovieCategory, Notice};
use watchlist_sources::MovieDataSource;
use crate::machine::ScreenKind;
use crate::screen::ScreenHandle;
use crate::state::ScreenState;

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Watchlist,
    Popular,
    Upcoming,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Watchlist, MenuItem::Popular, MenuItem::Upcoming];

    pub fn index(&self) -> usize {
        match self {
            MenuItem::Watchlist => 0,
            MenuItem::Popular => 1,
            MenuItem::Upcoming => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItem::Watchlist => "watchlist",
            MenuItem::Popular => "popular",
            MenuItem::Upcoming => "upcoming",
        }
    }

    pub fn target(&self) -> NavigationTarget {
        match self {
            MenuItem::Watchlist => NavigationTarget::Watchlist,
            MenuItem::Popular => NavigationTarget::Movies(MovieCategory::Popular),
            MenuItem::Upcoming => NavigationTarget::Movies(MovieCategory::Upcoming),
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "watchlist" => Ok(MenuItem::Watchlist),
            "popular" => Ok(MenuItem::Popular),
            "upcoming" => Ok(MenuItem::Upcoming),
            other => Err(format!("Unknown menu item: {}", other)),
        }
    }
}

/// Every place the app can navigate to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "screen", content = "category", rename_all = "snake_case")]
pub enum NavigationTarget {
    Watchlist,
    Movies(MovieCategory),
    Search,
}

impl NavigationTarget {
    pub fn screen_kind(&self) -> ScreenKind {
        match self {
            NavigationTarget::Watchlist => ScreenKind::Watchlist,
            NavigationTarget::Movies(category) => ScreenKind::Movies(*category),
            NavigationTarget::Search => ScreenKind::Search,
        }
    }
}

/// State of the main (menu) screen
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MainState {
    ShowScreen { target: NavigationTarget, selected_index: usize },
    Error { notice: Notice },
}

/// Single dispatcher for navigation requests, whether they come from the menu
/// or from a screen state.
#[derive(Clone)]
pub struct Navigator {
    source: Arc<dyn MovieDataSource>,
}

impl Navigator {
    pub fn new(source: Arc<dyn MovieDataSource>) -> Self {
        Self { source }
    }

    /// Resolve a raw menu selection. Unknown items yield a general error.
    pub fn select_menu_item(&self, raw: &str) -> MainState {
        match raw.parse::<MenuItem>() {
            Ok(item) => {
                debug!(%item, "Menu item selected");
                MainState::ShowScreen {
                    target: item.target(),
                    selected_index: item.index(),
                }
            }
            Err(e) => {
                warn!("{}", e);
                MainState::Error { notice: Notice::GeneralError }
            }
        }
    }

    /// Navigation a screen state asks for, if any
    pub fn target_for(state: &ScreenState) -> Option<NavigationTarget> {
        match state {
            ScreenState::NavigateToSearch => Some(NavigationTarget::Search),
            _ => None,
        }
    }

    /// Start the screen behind `target`
    pub fn open(&self, target: NavigationTarget) -> ScreenHandle {
        debug!(?target, "Opening screen");
        ScreenHandle::spawn(target.screen_kind(), Arc::clone(&self.source))
    }
}
