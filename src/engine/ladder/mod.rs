pub mod threshold_ladder;

pub use threshold_ladder::{LadderEvaluation, ThresholdLadder, ThresholdTier};
