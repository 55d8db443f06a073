use chrono::prelude::*;
use std::fs::OpenOptions;
use std::io;
use std::time::SystemTime;

use crate::app_dirs::AppDirs;
use crate::celebration::CelebrationAnimation;
use crate::document::{Document, PassageDoc};
use crate::engine::{resolve_selection, Outcome, RawSelection, ReadingSession};
use crate::narrator::{SpeechSource, VoiceEvent};
use crate::passage::Passage;
use crate::stats::{RoundRecord, RoundsDb};
use crate::time_series::ProgressPoint;
use crate::TICK_RATE_MS;

/// One playthrough of a passage: the narrated document, the listening
/// session tracking where the voice is, and everything measured along
/// the way.
#[derive(Debug)]
pub struct Game {
    pub passage: Passage,
    pub doc: PassageDoc,
    pub flat: String,
    pub doc_chars: usize,
    pub session: ReadingSession,
    pub tolerance: usize,
    pub wpm: u64,
    pub voice_generation: u64,
    pub spoken_word: Option<String>,
    pub started_at: Option<SystemTime>,
    pub elapsed_secs: f64,
    pub progress_points: Vec<ProgressPoint>,
    pub guesses: usize,
    pub guess_distances: Vec<f64>,
    pub outcome: Option<Outcome>,
    pub stats_db: Option<RoundsDb>,
    pub celebration: CelebrationAnimation,
}

impl Game {
    pub fn new(passage: Passage, tolerance: usize, wpm: u64) -> Self {
        let doc = PassageDoc::new(passage.units.clone());
        let flat = doc.flat_text();
        let doc_chars = flat.chars().count();

        Self {
            passage,
            doc,
            flat,
            doc_chars,
            session: ReadingSession::new(),
            tolerance,
            wpm,
            voice_generation: 0,
            spoken_word: None,
            started_at: None,
            elapsed_secs: 0.0,
            progress_points: vec![],
            guesses: 0,
            guess_distances: vec![],
            outcome: None,
            stats_db: RoundsDb::new().ok(),
            celebration: CelebrationAnimation::new(),
        }
    }

    /// Start narration from a random offset. False when a round is
    /// already under way.
    pub fn start_round(&mut self, narrator: &mut dyn SpeechSource) -> bool {
        if !self.session.begin(self.doc_chars) {
            return false;
        }
        self.launch_voice(narrator);
        true
    }

    /// Start narration from a fixed offset, for tests.
    pub fn start_round_at(&mut self, start_offset: usize, narrator: &mut dyn SpeechSource) -> bool {
        if !self.session.begin_at(start_offset) {
            return false;
        }
        self.launch_voice(narrator);
        true
    }

    fn launch_voice(&mut self, narrator: &mut dyn SpeechSource) {
        self.voice_generation = narrator.speak(&self.flat, self.session.start_offset());
        self.started_at = Some(SystemTime::now());
        self.elapsed_secs = 0.0;
    }

    pub fn on_tick(&mut self) {
        if self.session.is_active() {
            self.elapsed_secs += TICK_RATE_MS as f64 / 1000.0;
        }
        self.celebration.update();
    }

    /// Handle a voice event. Events from a superseded utterance are
    /// dropped. Returns true when the event ended the round.
    pub fn on_voice(&mut self, event: &VoiceEvent) -> bool {
        if event.generation() != self.voice_generation {
            return false;
        }

        match event {
            VoiceEvent::Boundary {
                char_index, word, ..
            } => {
                if !self.session.is_active() {
                    return false;
                }
                self.session.on_progress(*char_index);
                self.spoken_word = Some(word.clone());

                let t = self
                    .started_at
                    .and_then(|at| at.elapsed().ok())
                    .map_or(self.elapsed_secs, |d| d.as_secs_f64());
                self.progress_points
                    .push(ProgressPoint::new(t, self.session.absolute_offset() as f64));
                false
            }
            VoiceEvent::Complete { .. } => {
                if self.session.complete() {
                    self.outcome = Some(Outcome::Lost);
                    self.finish();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Judge a click. Blank or unusable selections resolve to nothing
    /// and do not count as a guess; a resolved miss leaves the round
    /// running. Returns the resolved offset, if any.
    pub fn guess(
        &mut self,
        selection: RawSelection,
        narrator: &mut dyn SpeechSource,
    ) -> Option<usize> {
        if !self.session.is_active() {
            return None;
        }

        let diff_idx = resolve_selection(&mut self.doc, selection)?;

        self.guesses += 1;
        let distance = self.session.absolute_offset().abs_diff(diff_idx);
        self.guess_distances.push(distance as f64);

        if self.session.claim(diff_idx, self.tolerance) {
            narrator.cancel();
            self.outcome = Some(Outcome::Won);
            self.finish();
        }

        Some(diff_idx)
    }

    pub fn has_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn start_celebration_if_won(&mut self, width: u16, height: u16) {
        if self.outcome == Some(Outcome::Won) {
            self.celebration.start(width, height);
        }
    }

    fn finish(&mut self) {
        if let Some(started_at) = self.started_at {
            if let Ok(elapsed) = started_at.elapsed() {
                self.elapsed_secs = elapsed.as_secs_f64();
            }
        }
        let _ = self.save_results();
    }

    pub fn round_record(&self) -> RoundRecord {
        RoundRecord {
            played_at: Local::now(),
            source: self.passage.source.to_string(),
            title: self.passage.title.clone(),
            outcome: self
                .outcome
                .map_or_else(|| "unfinished".to_string(), |o| o.to_string()),
            elapsed_secs: self.elapsed_secs,
            doc_chars: self.doc_chars,
            start_offset: self.session.start_offset(),
            tolerance: self.tolerance,
            wpm: self.wpm,
            guesses: self.guesses,
            distance: match self.outcome {
                Some(Outcome::Won) => self.guess_distances.last().map(|d| *d as usize),
                _ => None,
            },
        }
    }

    pub fn save_results(&self) -> io::Result<()> {
        if let Some(log_path) = AppDirs::round_log_path() {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // If the log file doesn't exist, we need to emit a header
            let needs_header = !log_path.exists();

            let log_file = OpenOptions::new()
                .write(true)
                .append(true)
                .create(true)
                .open(log_path)?;

            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(log_file);

            if needs_header {
                writer.write_record([
                    "date",
                    "source",
                    "title",
                    "outcome",
                    "elapsed_secs",
                    "doc_chars",
                    "start_offset",
                    "tolerance",
                    "wpm",
                    "guesses",
                    "distance",
                ])?;
            }

            let record = self.round_record();
            writer.write_record([
                record.played_at.format("%c").to_string(),
                record.source,
                record.title,
                record.outcome,
                format!("{:.2}", record.elapsed_secs),
                record.doc_chars.to_string(),
                record.start_offset.to_string(),
                record.tolerance.to_string(),
                record.wpm.to_string(),
                record.guesses.to_string(),
                record.distance.map_or(String::new(), |d| d.to_string()),
            ])?;
            writer.flush()?;
        }

        if let Some(ref db) = self.stats_db {
            let _ = db.record_round(&self.round_record());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Phase;
    use crate::narrator::ScriptedVoice;
    use crate::passage::PassageSource;

    fn test_game(text: &str, tolerance: usize) -> Game {
        let passage = PassageSource::Inline(text.into()).resolve().unwrap();
        let mut game = Game::new(passage, tolerance, 150);
        // keep unit tests off the on-disk database
        game.stats_db = None;
        game
    }

    #[test]
    fn start_round_speaks_the_flat_text_from_the_start_offset() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();

        assert!(game.start_round_at(4, &mut voice));
        assert_eq!(game.voice_generation, 1);
        assert_eq!(voice.spoken, vec![("the quick brown fox".to_string(), 4)]);
        assert!(game.session.is_active());

        // a second start while active does nothing
        assert!(!game.start_round_at(0, &mut voice));
        assert_eq!(voice.spoken.len(), 1);
    }

    #[test]
    fn start_round_picks_an_offset_inside_the_document() {
        let mut game = test_game("some words to listen to in a longer line", 30);
        let mut voice = ScriptedVoice::new();

        assert!(game.start_round(&mut voice));
        let (_, offset) = voice.spoken[0];
        assert_eq!(offset, game.session.start_offset());
        assert!(offset <= (game.doc_chars as f64 * 0.9).floor() as usize);
    }

    #[test]
    fn boundaries_advance_the_tracked_offset() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);

        let ended = game.on_voice(&VoiceEvent::Boundary {
            generation: 1,
            char_index: 6,
            word: "brown".into(),
        });

        assert!(!ended);
        assert_eq!(game.session.absolute_offset(), 10);
        assert_eq!(game.spoken_word.as_deref(), Some("brown"));
        assert_eq!(game.progress_points.len(), 1);
        assert_eq!(game.progress_points[0].offset, 10.0);
    }

    #[test]
    fn stale_generation_events_are_dropped() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);

        game.on_voice(&VoiceEvent::Boundary {
            generation: 99,
            char_index: 12,
            word: "fox".into(),
        });
        assert_eq!(game.session.absolute_offset(), 4);

        assert!(!game.on_voice(&VoiceEvent::Complete { generation: 99 }));
        assert!(game.session.is_active());
    }

    #[test]
    fn winning_guess_ends_the_round_and_silences_the_voice() {
        let mut game = test_game("the quick brown fox", 0);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);
        game.on_voice(&VoiceEvent::Boundary {
            generation: 1,
            char_index: 6,
            word: "brown".into(),
        });

        // "brown" occupies chars 10..15 of the only unit
        let resolved = game.guess(RawSelection::new(0, 10, 15), &mut voice);

        assert_eq!(resolved, Some(10));
        assert_eq!(game.outcome, Some(Outcome::Won));
        assert!(game.has_finished());
        assert_eq!(voice.cancelled, 1);
        assert_eq!(game.guesses, 1);
        assert_eq!(game.guess_distances, vec![0.0]);
        // the mutate/measure/restore trick left the text intact
        assert_eq!(game.doc.flat_text(), game.flat);
    }

    #[test]
    fn missed_guess_keeps_the_round_running() {
        let mut game = test_game("the quick brown fox", 0);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);
        game.on_voice(&VoiceEvent::Boundary {
            generation: 1,
            char_index: 6,
            word: "brown".into(),
        });

        // removing "fox" also drops the space before it from the flat
        // text, so the first difference is at 15, five chars past the
        // tracked offset
        let resolved = game.guess(RawSelection::new(0, 16, 19), &mut voice);

        assert_eq!(resolved, Some(15));
        assert_eq!(game.outcome, None);
        assert!(game.session.is_active());
        assert_eq!(game.guesses, 1);
        assert_eq!(game.guess_distances, vec![5.0]);
        assert_eq!(voice.cancelled, 0);
    }

    #[test]
    fn blank_selection_is_not_a_guess() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(0, &mut voice);

        // the space between "the" and "quick"
        assert_eq!(game.guess(RawSelection::new(0, 3, 4), &mut voice), None);
        assert_eq!(game.guesses, 0);
        assert!(game.guess_distances.is_empty());
    }

    #[test]
    fn completion_loses_the_round() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);

        let ended = game.on_voice(&VoiceEvent::Complete { generation: 1 });

        assert!(ended);
        assert_eq!(game.outcome, Some(Outcome::Lost));
        assert_eq!(game.session.phase(), Phase::Lost);
        assert_eq!(game.round_record().distance, None);
    }

    #[test]
    fn guesses_after_the_round_ends_are_ignored() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);
        game.on_voice(&VoiceEvent::Complete { generation: 1 });

        assert_eq!(game.guess(RawSelection::new(0, 10, 15), &mut voice), None);
        assert_eq!(game.guesses, 0);
    }

    #[test]
    fn round_record_captures_the_round() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);
        game.guess(RawSelection::new(0, 4, 9), &mut voice);

        let record = game.round_record();
        assert_eq!(record.source, "inline");
        assert_eq!(record.title, "custom text");
        assert_eq!(record.outcome, "won");
        assert_eq!(record.doc_chars, 19);
        assert_eq!(record.start_offset, 4);
        assert_eq!(record.tolerance, 30);
        assert_eq!(record.wpm, 150);
        assert_eq!(record.guesses, 1);
        assert_eq!(record.distance, Some(0));
    }

    #[test]
    fn ticks_advance_the_clock_only_while_listening() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();

        game.on_tick();
        assert_eq!(game.elapsed_secs, 0.0);

        game.start_round_at(0, &mut voice);
        game.on_tick();
        game.on_tick();
        assert!((game.elapsed_secs - 0.2).abs() < 1e-9);
    }

    #[test]
    fn celebration_only_starts_after_a_win() {
        let mut game = test_game("the quick brown fox", 30);
        let mut voice = ScriptedVoice::new();
        game.start_round_at(4, &mut voice);

        game.start_celebration_if_won(80, 24);
        assert!(!game.celebration.is_active);

        game.guess(RawSelection::new(0, 4, 9), &mut voice);
        game.start_celebration_if_won(80, 24);
        assert!(game.celebration.is_active);
    }
}
