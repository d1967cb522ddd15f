use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use dualback::{
    app::{App, Control, DrillSettings},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    language::WordMode,
    runtime::{CrosstermEventSource, DrillEvent, Runner},
    ui::screen::current_screen,
    TICK_RATE_MS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// dual n-back memory trainer: grid positions and words
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A dual n-back trainer. Each step lights a cell of a 3x3 grid and shows a word; press (a) when the cell matches the one N steps back and (l) when the word does. Options not given fall back to the last saved preferences."
)]
pub struct Cli {
    /// how many steps back to compare against (N)
    #[clap(short = 'n', long)]
    lag: Option<usize>,

    /// number of scored trials; the session runs trials + N steps
    #[clap(short = 't', long)]
    trials: Option<usize>,

    /// milliseconds each stimulus stays on screen
    #[clap(long)]
    step_ms: Option<u64>,

    /// blank milliseconds after each stimulus (responses still count)
    #[clap(long)]
    gap_ms: Option<u64>,

    /// bundled word list to draw words from
    #[clap(short = 'l', long, value_enum)]
    language: Option<WordMode>,

    /// shortest word to use, in characters
    #[clap(long)]
    min_len: Option<usize>,

    /// longest word to use, in characters
    #[clap(long)]
    max_len: Option<usize>,

    /// comma separated custom word list; overrides --language for this run
    #[clap(long, value_delimiter = ',')]
    words: Vec<String>,

    /// seed for a reproducible stimulus stream
    #[clap(long)]
    seed: Option<u64>,
}

impl Cli {
    /// Overlay command line values on the saved preferences
    fn to_drill_settings(&self, saved: &Config) -> DrillSettings {
        let mut settings = DrillSettings::from_config(saved);
        if let Some(lag) = self.lag {
            settings.lag = lag;
        }
        if let Some(trials) = self.trials {
            settings.trials = trials;
        }
        if let Some(step_ms) = self.step_ms {
            settings.step_ms = step_ms;
        }
        if let Some(gap_ms) = self.gap_ms {
            settings.gap_ms = gap_ms;
        }
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(min_len) = self.min_len {
            settings.min_len = min_len;
        }
        if self.max_len.is_some() {
            settings.max_len = self.max_len;
        }
        settings.custom_words = self
            .words
            .iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        settings.seed = self.seed;
        settings
    }
}

/// Logs go to a file; the terminal belongs to the TUI.
fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("DUALBACK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging();

    let store = FileConfigStore::new();
    let settings = cli.to_drill_settings(&store.load());
    let mut app = App::new(settings);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    // Guarantee no step outlives the screen it was drawn on.
    app.leave();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = store.save(&Config::from(&app.settings)) {
        tracing::warn!(path = %store.path().display(), error = %e, "could not save preferences");
    }

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| current_screen(app.phase()).render(app, f))?;

    loop {
        match runner.step_until(app.session.next_wakeup(Instant::now())) {
            DrillEvent::Tick => {
                app.on_tick(Instant::now());
            }
            DrillEvent::Resize => {}
            DrillEvent::Key(key) => {
                if app.on_key(key, Instant::now()) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| current_screen(app.phase()).render(app, f))?;
    }

    Ok(())
}
