use rand::{thread_rng, Rng};

use crate::engine::verdict::within_tolerance;

/// Where a session is in its life cycle. A finished session stays in
/// its terminal phase until it is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Won,
    Lost,
}

/// Tracks one round of listening: the randomized start offset, the
/// furthest spoken position reported so far, and the phase. All offsets
/// are char offsets into the flat text; progress reports are relative
/// to the start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingSession {
    start_offset: usize,
    current_offset: usize,
    phase: Phase,
}

impl ReadingSession {
    pub fn new() -> Self {
        Self {
            start_offset: 0,
            current_offset: 0,
            phase: Phase::Idle,
        }
    }

    /// Start a round at a random offset in the first 90% of a document
    /// of `doc_chars` chars. Returns false if the session is not idle.
    pub fn begin(&mut self, doc_chars: usize) -> bool {
        let max = (doc_chars as f64 * 0.9).floor() as usize;
        let start = thread_rng().gen_range(0..=max);
        self.begin_at(start)
    }

    /// Start a round at a fixed offset. Returns false if the session is
    /// not idle.
    pub fn begin_at(&mut self, start_offset: usize) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.start_offset = start_offset;
        self.current_offset = 0;
        self.phase = Phase::Active;
        true
    }

    /// Record that speech has reached `offset` chars past the start.
    /// Late or reordered reports never move the position backwards, and
    /// reports outside an active round are dropped.
    pub fn on_progress(&mut self, offset: usize) {
        if self.phase != Phase::Active {
            return;
        }
        self.current_offset = self.current_offset.max(offset);
    }

    /// The tracked position in whole-document coordinates.
    pub fn absolute_offset(&self) -> usize {
        self.start_offset + self.current_offset
    }

    /// Judge a guess that resolved to `diff_idx`. A hit within the
    /// tolerance wins and ends the round; a miss leaves the round
    /// running. Guesses outside an active round are ignored.
    pub fn claim(&mut self, diff_idx: usize, tolerance: usize) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        if within_tolerance(self.absolute_offset(), diff_idx, tolerance) {
            self.phase = Phase::Won;
            true
        } else {
            false
        }
    }

    /// Speech ran out before a winning guess. Only an active round can
    /// be lost this way.
    pub fn complete(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.phase = Phase::Lost;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn current_offset(&self) -> usize {
        self.current_offset
    }
}

impl Default for ReadingSession {
    fn default() -> Self {
        Self::new()
    }
}
