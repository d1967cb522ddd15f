use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::config::Config;
use crate::engine::{Advance, Channel, ResponseOutcome, Session, SessionConfig, SessionPhase};
use crate::error::{ConfigError, LanguageError, SettingsError};
use crate::language::{LengthFilter, WordMode, WordPool};

/// Range of N the idle screen lets the user pick from.
pub const MIN_LAG: usize = 1;
pub const MAX_LAG: usize = 5;

pub const POSITION_KEY: char = 'a';
pub const WORD_KEY: char = 'l';

/// Everything needed to build the next session, merged from the CLI and the
/// saved preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillSettings {
    pub lag: usize,
    /// Scored steps; the session runs `trials + lag` steps in total.
    pub trials: usize,
    pub step_ms: u64,
    pub gap_ms: u64,
    pub language: WordMode,
    pub min_len: usize,
    pub max_len: Option<usize>,
    /// Overrides `language` when non-empty.
    pub custom_words: Vec<String>,
    pub seed: Option<u64>,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl DrillSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            lag: cfg.lag,
            trials: cfg.trials,
            step_ms: cfg.step_ms,
            gap_ms: cfg.gap_ms,
            language: cfg.language,
            min_len: cfg.min_len,
            max_len: cfg.max_len,
            custom_words: Vec::new(),
            seed: None,
        }
    }

    pub fn word_pool(&self) -> Result<WordPool, LanguageError> {
        if !self.custom_words.is_empty() {
            return Ok(WordPool::new(self.custom_words.iter().cloned()));
        }
        let language = self.language.as_lang()?;
        Ok(WordPool::from_language(
            &language,
            LengthFilter::new(self.min_len, self.max_len),
        ))
    }

    pub fn session_config(&self) -> Result<SessionConfig, SettingsError> {
        let total_steps = self.trials.checked_add(self.lag).ok_or(ConfigError::TooManySteps {
            trials: self.trials,
            lag: self.lag,
        })?;
        Ok(SessionConfig {
            lag: self.lag,
            step_duration: Duration::from_millis(self.step_ms),
            inter_step_gap: Duration::from_millis(self.gap_ms),
            total_steps,
            word_pool: self.word_pool()?,
        })
    }

    pub fn pool_label(&self) -> String {
        if self.custom_words.is_empty() {
            self.language.to_string()
        } else {
            format!("custom ({} words)", self.custom_words.len())
        }
    }
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub settings: DrillSettings,
    pub session: Session,
    /// Blocking message shown on the idle screen, e.g. a rejected start.
    pub notice: Option<String>,
    pub last_response: Option<(Channel, ResponseOutcome)>,
}

impl App {
    pub fn new(settings: DrillSettings) -> Self {
        let session = match settings.seed {
            Some(seed) => Session::seeded(seed),
            None => Session::default(),
        };
        Self {
            settings,
            session,
            notice: None,
            last_response: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// Builds a session from the current settings and starts it. Failures
    /// become the idle screen's notice.
    pub fn start(&mut self, now: Instant) {
        self.last_response = None;
        let result = self
            .settings
            .session_config()
            .map_err(|e| e.to_string())
            .and_then(|cfg| self.session.start(cfg, now).map_err(|e| e.to_string()));

        match result {
            Ok(_) => self.notice = None,
            Err(message) => {
                warn!(%message, "session did not start");
                self.notice = Some(message);
            }
        }
    }

    pub fn on_tick(&mut self, now: Instant) -> Advance {
        let advance = self.session.poll(now);
        if matches!(advance, Advance::Next(_) | Advance::Finished(_)) {
            self.last_response = None;
        }
        advance
    }

    /// Stops whatever is running; used when the user navigates away.
    pub fn leave(&mut self) {
        self.session.abort();
        self.last_response = None;
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.leave();
            return Control::Quit;
        }

        // Close any window that expired before this key arrived, so the press
        // lands on the step that is actually current.
        self.on_tick(now);

        match self.phase() {
            SessionPhase::Idle => match key.code {
                KeyCode::Esc => return Control::Quit,
                KeyCode::Enter | KeyCode::Char(' ') => self.start(now),
                KeyCode::Up | KeyCode::Right | KeyCode::Char('+') => self.adjust_lag(true),
                KeyCode::Down | KeyCode::Left | KeyCode::Char('-') => self.adjust_lag(false),
                _ => {}
            },
            SessionPhase::Playing => match key.code {
                KeyCode::Esc => self.leave(),
                KeyCode::Char(c) => {
                    let channel = match c.to_ascii_lowercase() {
                        POSITION_KEY => Some(Channel::Position),
                        WORD_KEY => Some(Channel::Word),
                        _ => None,
                    };
                    if let Some(channel) = channel {
                        let outcome = self.session.record_response(channel);
                        self.last_response = Some((channel, outcome));
                    }
                }
                _ => {}
            },
            SessionPhase::Result => match key.code {
                KeyCode::Esc => return Control::Quit,
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('b') | KeyCode::Backspace => {
                    self.session.return_to_idle();
                }
                _ => {}
            },
        }
        Control::Continue
    }

    /// Moves N one step. A value outside the picker's range (from the CLI)
    /// is only pulled back toward the range, never jumped past it.
    fn adjust_lag(&mut self, up: bool) {
        let lag = self.settings.lag;
        self.settings.lag = if up {
            if lag < MAX_LAG {
                lag + 1
            } else {
                lag
            }
        } else {
            lag.saturating_sub(1).max(MIN_LAG)
        };
        self.notice = None;
    }
}
