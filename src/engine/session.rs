use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, SessionError};
use crate::language::WordPool;

use super::response::{self, ResponseOutcome, ResponseState};
use super::scorer::ScoreTally;
use super::stimulus::{Channel, Position, RandomStimuli, StimulusSource, StimulusStep};
use super::timer::StepTimer;

/// Scored trials per session when no explicit length is given.
pub const DEFAULT_TRIALS: usize = 20;
pub const DEFAULT_LAG: usize = 2;
pub const DEFAULT_STEP_MS: u64 = 2000;
pub const DEFAULT_GAP_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub lag: usize,
    /// How long the stimulus stays on screen.
    pub step_duration: Duration,
    /// Blank interval after the stimulus; presses still count for the step.
    pub inter_step_gap: Duration,
    pub total_steps: usize,
    pub word_pool: WordPool,
}

impl SessionConfig {
    /// Pools smaller than this make word matches so frequent the channel
    /// stops being informative.
    pub const RECOMMENDED_POOL_SIZE: usize = 4;

    /// Upper bound for both the stimulus duration and the gap.
    pub const MAX_PHASE_DURATION: Duration = Duration::from_secs(10 * 60);

    /// Default timings with `DEFAULT_TRIALS` scored steps after the first `lag`.
    pub fn new(word_pool: WordPool, lag: usize) -> Self {
        Self {
            lag,
            step_duration: Duration::from_millis(DEFAULT_STEP_MS),
            inter_step_gap: Duration::from_millis(DEFAULT_GAP_MS),
            total_steps: DEFAULT_TRIALS + lag,
            word_pool,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.word_pool.is_empty() {
            return Err(ConfigError::EmptyWordPool);
        }
        if self.lag == 0 {
            return Err(ConfigError::ZeroLag);
        }
        if self.step_duration.is_zero() {
            return Err(ConfigError::ZeroStepDuration);
        }
        if self.step_duration > Self::MAX_PHASE_DURATION
            || self.inter_step_gap > Self::MAX_PHASE_DURATION
        {
            return Err(ConfigError::StepTooLong {
                max_secs: Self::MAX_PHASE_DURATION.as_secs(),
            });
        }
        if self.lag >= self.total_steps {
            return Err(ConfigError::LagTooLarge {
                lag: self.lag,
                total_steps: self.total_steps,
            });
        }
        Ok(())
    }

    /// Length of one response window.
    pub fn cadence(&self) -> Duration {
        self.step_duration + self.inter_step_gap
    }

    /// Steps that can be scored at all.
    pub fn scored_steps(&self) -> usize {
        self.total_steps.saturating_sub(self.lag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionPhase {
    Idle,
    Playing,
    Result,
}

/// What the presentation layer renders for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub position: Position,
    pub word: String,
    /// Zero-based index of the step in progress.
    pub index: usize,
    pub total: usize,
}

/// Result of polling the step timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Nothing to do yet, or not playing.
    Pending,
    /// The previous window closed and a new stimulus is up.
    Next(StepView),
    /// The last window closed; the session is now in `Result`.
    Finished(ScoreTally),
}

/// The dual n-back session driver.
///
/// Owns everything one session touches: history, tally, per-step response
/// state and the step timer. Callers drive it with explicit timestamps, so
/// key presses and timer expiry are ordered by whoever calls first.
pub struct Session {
    phase: SessionPhase,
    config: Option<SessionConfig>,
    history: Vec<StimulusStep>,
    response: ResponseState,
    tally: ScoreTally,
    source: Box<dyn StimulusSource>,
    timer: StepTimer,
    step_started_at: Option<Instant>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("history", &self.history.len())
            .field("response", &self.response)
            .field("tally", &self.tally)
            .field("timer", &self.timer)
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Box::new(RandomStimuli::new()))
    }
}

impl Session {
    pub fn new(source: Box<dyn StimulusSource>) -> Self {
        Self {
            phase: SessionPhase::Idle,
            config: None,
            history: Vec::new(),
            response: ResponseState::default(),
            tally: ScoreTally::default(),
            source,
            timer: StepTimer::default(),
            step_started_at: None,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(RandomStimuli::seeded(seed)))
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Configuration of the running or just-finished session.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn history(&self) -> &[StimulusStep] {
        &self.history
    }

    pub fn tally(&self) -> ScoreTally {
        self.tally
    }

    pub fn response_state(&self) -> ResponseState {
        self.response
    }

    pub fn current_index(&self) -> Option<usize> {
        self.history.len().checked_sub(1)
    }

    pub fn current_step(&self) -> Option<StepView> {
        let config = self.config.as_ref()?;
        let index = self.current_index()?;
        let step = &self.history[index];
        Some(StepView {
            position: step.position,
            word: step.word.clone(),
            index,
            total: config.total_steps,
        })
    }

    /// Whether the current stimulus is still on screen (as opposed to the
    /// blank gap at the end of its window).
    pub fn stimulus_visible(&self, now: Instant) -> bool {
        match (self.phase, self.step_started_at, self.config.as_ref()) {
            (SessionPhase::Playing, Some(started), Some(config)) => {
                now.saturating_duration_since(started) < config.step_duration
            }
            _ => false,
        }
    }

    /// Time until the current response window closes.
    pub fn window_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// The next instant at which the screen changes on its own: the stimulus
    /// disappearing into the gap, or the window closing. `None` unless playing.
    pub fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        let deadline = self.timer.deadline()?;
        let hides_at = match (self.step_started_at, self.config.as_ref()) {
            (Some(started), Some(config)) => started + config.step_duration,
            _ => deadline,
        };
        Some(if hides_at > now { hides_at.min(deadline) } else { deadline })
    }

    /// Starts a session from `Idle` and presents step 0.
    ///
    /// On error nothing changes and the session stays idle.
    pub fn start(&mut self, config: SessionConfig, now: Instant) -> Result<StepView, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::NotIdle);
        }
        config.validate()?;
        if config.word_pool.len() < SessionConfig::RECOMMENDED_POOL_SIZE {
            warn!(
                pool_size = config.word_pool.len(),
                "word pool is small; word matches will dominate"
            );
        }

        self.source.reset();
        let first = self
            .source
            .generate(&config.word_pool)
            .ok_or(ConfigError::EmptyWordPool)?;

        self.history.clear();
        self.history.push(first);
        self.tally = ScoreTally::default();
        self.response = ResponseState::default();
        self.step_started_at = Some(now);
        self.timer.arm(now + config.cadence());
        info!(
            lag = config.lag,
            total_steps = config.total_steps,
            pool_size = config.word_pool.len(),
            "session started"
        );
        self.config = Some(config);
        self.phase = SessionPhase::Playing;

        Ok(self.presented())
    }

    /// Closes the current window once its deadline has passed.
    ///
    /// Misses for the closing step are counted before anything else happens;
    /// then either the next stimulus is generated or the session finishes.
    /// At most one step advances per call.
    pub fn poll(&mut self, now: Instant) -> Advance {
        if self.phase != SessionPhase::Playing || !self.timer.fire_if_due(now) {
            return Advance::Pending;
        }
        let Some(config) = self.config.as_ref() else {
            return Advance::Pending;
        };
        let Some(index) = self.current_index() else {
            return Advance::Pending;
        };

        let missed = self
            .tally
            .check_missed(&self.history, index, config.lag, &self.response);
        debug!(step = index, missed, "response window closed");

        if index + 1 >= config.total_steps {
            return self.finish();
        }

        let Some(next) = self.source.generate(&config.word_pool) else {
            warn!(step = index + 1, "stimulus source ran dry; ending session");
            return self.finish();
        };
        let cadence = config.cadence();
        self.history.push(next);
        self.response = ResponseState::default();
        self.step_started_at = Some(now);
        self.timer.arm(now + cadence);

        let view = self.presented();
        debug!(step = view.index, cell = view.position.cell(), word = %view.word, "stimulus presented");
        Advance::Next(view)
    }

    /// Applies a press on `channel` to the step currently on screen.
    pub fn record_response(&mut self, channel: Channel) -> ResponseOutcome {
        if self.phase != SessionPhase::Playing {
            return ResponseOutcome::Ignored;
        }
        let (Some(config), Some(index)) = (self.config.as_ref(), self.current_index()) else {
            return ResponseOutcome::Ignored;
        };
        let outcome = response::record_response(
            &mut self.response,
            &mut self.tally,
            &self.history,
            index,
            config.lag,
            channel,
        );
        debug!(step = index, %channel, ?outcome, "response");
        outcome
    }

    /// Like [`Session::record_response`], but only if `step_index` is still
    /// the current step. Anything else is a stale press and is dropped.
    pub fn record_response_for(&mut self, step_index: usize, channel: Channel) -> ResponseOutcome {
        if self.phase == SessionPhase::Playing && self.current_index() == Some(step_index) {
            return self.record_response(channel);
        }
        debug!(step = step_index, %channel, "stale response dropped");
        ResponseOutcome::Stale
    }

    /// Leaves the result screen, discarding history and tally.
    /// Returns false (and does nothing) in any other phase.
    pub fn return_to_idle(&mut self) -> bool {
        if self.phase != SessionPhase::Result {
            return false;
        }
        self.clear();
        true
    }

    /// Tears the session down from any phase and cancels the pending step.
    pub fn abort(&mut self) {
        if self.phase == SessionPhase::Playing {
            info!(step = ?self.current_index(), "session aborted");
        }
        self.clear();
    }

    fn finish(&mut self) -> Advance {
        self.timer.cancel();
        self.step_started_at = None;
        self.phase = SessionPhase::Result;
        info!(
            pos_hit = self.tally.pos_hit,
            pos_miss = self.tally.pos_miss,
            word_hit = self.tally.word_hit,
            word_miss = self.tally.word_miss,
            "session finished"
        );
        Advance::Finished(self.tally)
    }

    fn clear(&mut self) {
        self.timer.cancel();
        self.phase = SessionPhase::Idle;
        self.config = None;
        self.history.clear();
        self.response = ResponseState::default();
        self.tally = ScoreTally::default();
        self.step_started_at = None;
    }

    fn presented(&self) -> StepView {
        // Only called right after a push, so there is a current step.
        let index = self.history.len() - 1;
        let step = &self.history[index];
        StepView {
            position: step.position,
            word: step.word.clone(),
            index,
            total: self.config.as_ref().map_or(0, |c| c.total_steps),
        }
    }
}
