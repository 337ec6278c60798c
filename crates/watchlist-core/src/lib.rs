pub mod state;
pub mod selection;
pub mod intent;
pub mod machine;
pub mod bridge;
pub mod screen;
pub mod navigation;
pub mod error;

pub use state::{FabIcon, ScreenState};
pub use selection::SelectionTracker;
pub use intent::{Dispatch, Intent, Outcome, Request, RequestToken, Response};
pub use machine::{ScreenKind, ScreenMachine, Transition};
pub use bridge::{StateBridge, StateObserver};
pub use screen::ScreenHandle;
pub use navigation::{MainState, MenuItem, NavigationTarget, Navigator};
pub use error::CoreError;
