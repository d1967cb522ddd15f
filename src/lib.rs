// Library surface for headless/integration tests and reuse.
// The binary only adds the CLI, terminal setup and the event loop.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod runtime;
pub mod ui;

/// Longest the event loop sleeps while nothing is scheduled.
pub const TICK_RATE_MS: u64 = 20;
