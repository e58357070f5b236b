pub mod tier_state;
pub mod warning_tracker;

pub use tier_state::{TierPhase, TierState};
pub use warning_tracker::{TierStatus, TrackerDecision, WarningTracker};
