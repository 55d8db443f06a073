// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod document;
pub mod engine;
pub mod game;
pub mod library;
pub mod narrator;
pub mod passage;
pub mod runtime;
pub mod stats;
pub mod time_series;
pub mod util;

pub const TICK_RATE_MS: u64 = 100;
