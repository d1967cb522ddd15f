use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::{app::App, engine::SessionPhase};

/// A UI Screen boundary: responsible for rendering and optional key handling
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
    /// Optional per-screen key handling. Returns true if the key was handled.
    fn on_key(&mut self, _key: KeyEvent, _app: &mut App) -> bool {
        false
    }
}

/// Settings and instructions before a session starts
pub struct IdleScreen;

impl Screen for IdleScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Grid, word and response buttons while a session runs
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Final tally
pub struct ResultScreen;

impl Screen for ResultScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: SessionPhase) -> Box<dyn Screen> {
    match phase {
        SessionPhase::Idle => Box::new(IdleScreen),
        SessionPhase::Playing => Box::new(PlayingScreen),
        SessionPhase::Result => Box::new(ResultScreen),
    }
}
