//! View-state machines behind the train dashboard.
//!
//! Nothing here touches the DOM or a map library. The map is reached through
//! [`MapSurface`], timers through [`TimerBackend`]; the browser client
//! supplies both, tests supply in-memory fakes.

pub mod refresh;
pub mod scheduler;
pub mod selection;
pub mod shuffle;
pub mod surface;
pub mod table;
pub mod view_state;

pub use refresh::{RefreshCycle, Settled};
pub use scheduler::{FinishOutcome, RefreshGate, RefreshScheduler, RefreshTicket, RefreshTrigger, TimerBackend};
pub use selection::{SelectionChange, SelectionState};
pub use shuffle::{AnimationRegistry, AnimationTicket, ShuffleFrames};
pub use surface::{LineStyle, MapSurface};
pub use table::{TableReconciler, TableUpdate};
pub use view_state::{DashboardViewState, OnScreenState, OpenInfoWindow, ReconcileReport};

#[cfg(test)]
pub(crate) mod testing;
