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
pub mod ui;
pub mod util;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    game::Game,
    narrator::{PacedNarrator, SpeechSource},
    passage::{Passage, PassageSource},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use webbrowser::Browser;

const TICK_RATE_MS: u64 = 100;

/// listen to a passage and click the word being spoken
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A listening TUI that narrates a passage from a random spot. Click the word the voice is saying before it runs out of text, and keep your round history for later gloating."
)]
pub struct Cli {
    /// custom passage text to narrate
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// read the passage from a text file
    #[clap(short = 'F', long)]
    file: Option<PathBuf>,

    /// narrate generated sentences instead of a bundled passage
    #[clap(short = 'f', long = "full-sentences")]
    number_of_sentences: Option<Option<usize>>,

    /// bundled passage to narrate
    #[clap(short = 'l', long)]
    library_passage: Option<String>,

    /// list the bundled passages and exit
    #[clap(long)]
    list_passages: bool,

    /// narration speed in words per minute
    #[clap(short = 'w', long)]
    wpm: Option<u64>,

    /// how close a click must land to the spoken word, in characters
    #[clap(short = 't', long)]
    tolerance: Option<usize>,

    /// difficulty preset for the winning distance
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Relaxed,
    Standard,
    Strict,
}

impl Difficulty {
    fn tolerance(&self) -> usize {
        match self {
            Difficulty::Relaxed => 100,
            Difficulty::Standard => 30,
            Difficulty::Strict => 10,
        }
    }
}

/// Everything a round needs, after CLI flags and the config file have
/// been reconciled.
#[derive(Debug, Clone)]
pub struct RoundSettings {
    pub source: PassageSource,
    pub wpm: u64,
    pub tolerance: usize,
}

impl Cli {
    /// Convert CLI arguments and stored config into round settings
    fn to_round_settings(&self, config: &Config) -> RoundSettings {
        let source = if let Some(text) = &self.prompt {
            PassageSource::Inline(text.clone())
        } else if let Some(path) = &self.file {
            PassageSource::File(path.clone())
        } else if let Some(sentences) = self.number_of_sentences {
            PassageSource::Generated {
                sentences: sentences.unwrap_or(config.number_of_sentences),
            }
        } else if let Some(name) = &self.library_passage {
            PassageSource::Library(name.clone())
        } else {
            PassageSource::RandomLibrary
        };

        RoundSettings {
            source,
            wpm: self.wpm.unwrap_or(config.wpm),
            tolerance: self
                .tolerance
                .or_else(|| self.difficulty.map(|d| d.tolerance()))
                .unwrap_or(config.tolerance),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Playing,
    Results,
    History,
}

#[derive(Debug, Default)]
pub struct HistoryState {
    pub scroll_offset: usize,
}

pub struct App {
    pub settings: RoundSettings,
    pub game: Game,
    pub narrator: Box<dyn SpeechSource>,
    pub state: AppState,
    pub history: HistoryState,
}

impl App {
    pub fn new(passage: Passage, settings: RoundSettings, narrator: Box<dyn SpeechSource>) -> Self {
        Self {
            game: Game::new(passage, settings.tolerance, settings.wpm),
            settings,
            narrator,
            state: AppState::Playing,
            history: HistoryState::default(),
        }
    }

    /// Tear down the current round. `Some` replays the given passage,
    /// `None` resolves a fresh one from the configured source.
    pub fn reset(&mut self, passage: Option<Passage>) -> io::Result<()> {
        self.narrator.cancel();
        let passage = match passage {
            Some(passage) => passage,
            None => self.settings.source.resolve()?,
        };
        self.game = Game::new(passage, self.settings.tolerance, self.settings.wpm);
        self.state = AppState::Playing;
        self.history = HistoryState::default();
        Ok(())
    }

    pub fn start_round(&mut self) -> bool {
        self.game.start_round(self.narrator.as_mut())
    }

    /// Map a mouse click to a guess. Clicks outside the passage pane,
    /// outside an active round, or on nothing resolvable are ignored.
    pub fn click(&mut self, column: u16, row: u16, area: Rect) -> Option<usize> {
        if self.state != AppState::Playing || !self.game.session.is_active() {
            return None;
        }

        let (_, passage_area, _) = ui::playing_layout(area);
        if !passage_area.contains(Position::new(column, row)) {
            return None;
        }

        let x = column - passage_area.x;
        let row_idx = (row - passage_area.y) as usize;
        let rows = ui::passage_view::wrap_units(self.game.doc.units(), passage_area.width);
        let selection = ui::passage_view::selection_at(&rows, self.game.doc.units(), row_idx, x)?;

        self.game.guess(selection, self.narrator.as_mut())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_passages {
        for name in library::names() {
            println!("{name}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    let settings = cli.to_round_settings(&config);
    // resolve before touching the terminal so a bad source errors cleanly
    let passage = settings.source.resolve()?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_source = CrosstermEventSource::new();
    let narrator = PacedNarrator::new(event_source.sender(), settings.wpm);
    let mut app = App::new(passage, settings, Box::new(narrator));

    let result = start_tui(&mut terminal, &mut app, event_source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: CrosstermEventSource,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        event_source,
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        let mut exit_type: ExitType = ExitType::Quit;
        terminal.draw(|f| ui(app, f))?;

        loop {
            match runner.step() {
                GameEvent::Tick => {
                    app.game.on_tick();

                    // Draw on every tick while the clock runs or confetti falls
                    if app.game.celebration.is_active || app.game.session.is_active() {
                        terminal.draw(|f| ui(app, f))?;
                    }
                }
                GameEvent::Resize => {
                    terminal.draw(|f| ui(app, f))?;
                }
                GameEvent::Voice(event) => {
                    if app.game.on_voice(&event) {
                        // the voice ran out of text before a winning click
                        let size = terminal.size().unwrap_or_default();
                        app.game.start_celebration_if_won(size.width, size.height);
                        app.state = AppState::Results;
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
                GameEvent::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        let size = terminal.size().unwrap_or_default();
                        let area = Rect::new(0, 0, size.width, size.height);

                        if app.click(mouse.column, mouse.row, area).is_some()
                            && app.game.has_finished()
                        {
                            app.game.start_celebration_if_won(size.width, size.height);
                            app.state = AppState::Results;
                        }
                        terminal.draw(|f| ui(app, f))?;
                    }
                }
                GameEvent::Key(key) => {
                    match key.code {
                        KeyCode::Esc => {
                            break;
                        }
                        KeyCode::Left => {
                            exit_type = ExitType::Restart;
                            break;
                        }
                        KeyCode::Right => {
                            exit_type = ExitType::New;
                            break;
                        }
                        KeyCode::Up => {
                            if app.state == AppState::History && app.history.scroll_offset > 0 {
                                app.history.scroll_offset -= 1;
                            }
                        }
                        KeyCode::Down => {
                            if app.state == AppState::History {
                                // render clamps to the table length
                                app.history.scroll_offset += 1;
                            }
                        }
                        KeyCode::PageUp => {
                            if app.state == AppState::History {
                                app.history.scroll_offset =
                                    app.history.scroll_offset.saturating_sub(10);
                            }
                        }
                        KeyCode::PageDown => {
                            if app.state == AppState::History {
                                app.history.scroll_offset += 10;
                            }
                        }
                        KeyCode::Home => {
                            if app.state == AppState::History {
                                app.history.scroll_offset = 0;
                            }
                        }
                        KeyCode::Backspace => {
                            if app.state == AppState::History {
                                app.state = AppState::Results;
                            }
                        }
                        KeyCode::Char(c) => {
                            if key.modifiers.contains(KeyModifiers::CONTROL)
                                && key.code == KeyCode::Char('c')
                            // ctrl+c to quit
                            {
                                break;
                            }

                            match app.state {
                                AppState::Playing => {
                                    if c == ' ' {
                                        app.start_round();
                                    }
                                }
                                AppState::Results => match key.code {
                                    KeyCode::Char('t') => {
                                        if Browser::is_available() {
                                            webbrowser::open(&format!("https://twitter.com/intent/tweet?text={}%20a%20narrated%20passage%20in%20{}%20with%20{}%20guesses%20%2F%2F%20earshot", app.game.outcome.map_or("played".to_string(), |o| o.to_string()), util::format_clock(app.game.elapsed_secs), app.game.guesses))
                                        .unwrap_or_default();
                                        }
                                    }
                                    KeyCode::Char('r') => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    KeyCode::Char('n') => {
                                        exit_type = ExitType::New;
                                        break;
                                    }
                                    KeyCode::Char('h') => {
                                        app.state = AppState::History;
                                    }
                                    _ => {}
                                },
                                AppState::History => match key.code {
                                    KeyCode::Char('r') => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    KeyCode::Char('n') => {
                                        exit_type = ExitType::New;
                                        break;
                                    }
                                    KeyCode::Char('b') => {
                                        app.state = AppState::Results;
                                    }
                                    _ => {}
                                },
                            }
                        }
                        _ => {}
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => {
                app.reset(Some(app.game.passage.clone()))?;
            }
            ExitType::New => {
                app.reset(None)?;
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    match app.state {
        AppState::Playing | AppState::Results => {
            f.render_widget(&*app, f.area());
        }
        AppState::History => {
            ui::history::render_history(app, f);
        }
    }
}
