use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::runtime::GameEvent;
use crate::util;

/// Pause appended after a sentence-ending word, in ms.
const DOT_PAUSE_MS: u64 = 450;
/// Pause appended after a clause-ending word, in ms.
const COMMA_PAUSE_MS: u64 = 200;

/// Progress report from an utterance. `char_index` is the char offset
/// of the word within the spoken slice, not the whole document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceEvent {
    Boundary {
        generation: u64,
        char_index: usize,
        word: String,
    },
    Complete {
        generation: u64,
    },
}

impl VoiceEvent {
    pub fn generation(&self) -> u64 {
        match self {
            VoiceEvent::Boundary { generation, .. } => *generation,
            VoiceEvent::Complete { generation } => *generation,
        }
    }
}

/// Something that can speak text and report word-by-word progress.
/// `speak` returns the generation id of the new utterance; any prior
/// utterance is superseded. `cancel` silences the current utterance and
/// is safe to call repeatedly or with nothing playing.
pub trait SpeechSource {
    fn speak(&mut self, text: &str, from_offset: usize) -> u64;
    fn cancel(&mut self);
}

/// Speech source that paces through the words of the text on a
/// background thread, emitting a boundary per word and a completion at
/// the end. Timing follows the configured words-per-minute rate, with
/// extra pauses after punctuation.
pub struct PacedNarrator {
    tx: Sender<GameEvent>,
    wpm: u64,
    generation: Arc<AtomicU64>,
}

impl PacedNarrator {
    pub fn new(tx: Sender<GameEvent>, wpm: u64) -> Self {
        Self {
            tx,
            wpm,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl SpeechSource for PacedNarrator {
    fn speak(&mut self, text: &str, from_offset: usize) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let slice: String = text.chars().skip(from_offset).collect();
        let words = util::word_spans(&slice);
        let tx = self.tx.clone();
        let wpm = self.wpm;
        let current = Arc::clone(&self.generation);

        std::thread::spawn(move || {
            for (char_index, word) in words {
                if current.load(Ordering::SeqCst) != generation {
                    return;
                }
                let delay = word_delay_ms(&word, wpm);
                let event = VoiceEvent::Boundary {
                    generation,
                    char_index,
                    word,
                };
                if tx.send(GameEvent::Voice(event)).is_err() {
                    return;
                }
                std::thread::sleep(Duration::from_millis(delay));
            }
            if current.load(Ordering::SeqCst) == generation {
                let _ = tx.send(GameEvent::Voice(VoiceEvent::Complete { generation }));
            }
        });

        generation
    }

    fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Per-word dwell time: the base rate plus a pause when the word closes
/// a sentence or a clause. Trailing quotes and brackets are ignored
/// when looking at the final character.
fn word_delay_ms(word: &str, wpm: u64) -> u64 {
    let base = 60_000 / wpm.max(1);
    let trimmed = word.trim_end_matches(['"', '\'', ')', ']']);
    match trimmed.chars().last() {
        Some('.') | Some('!') | Some('?') => base + DOT_PAUSE_MS,
        Some(',') | Some(';') | Some(':') => base + COMMA_PAUSE_MS,
        _ => base,
    }
}

/// Scripted speech source for tests: records calls, emits nothing.
#[derive(Debug, Default)]
pub struct ScriptedVoice {
    pub next_generation: u64,
    pub spoken: Vec<(String, usize)>,
    pub cancelled: usize,
}

impl ScriptedVoice {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechSource for ScriptedVoice {
    fn speak(&mut self, text: &str, from_offset: usize) -> u64 {
        self.next_generation += 1;
        self.spoken.push((text.to_string(), from_offset));
        self.next_generation
    }

    fn cancel(&mut self) {
        self.cancelled += 1;
    }
}
