use strum_macros::Display;

/// How a round ended.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Won)
    }
}

/// A claim lands when the tracked offset and the observed difference
/// offset are within `tolerance` chars of each other, in either
/// direction, boundary included.
pub fn within_tolerance(tracked: usize, diff_idx: usize, tolerance: usize) -> bool {
    tracked.abs_diff(diff_idx) <= tolerance
}
