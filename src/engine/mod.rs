//! Dual n-back engine: stimulus stream, lag-window matching, response
//! tracking, scoring and the timer-driven session driver.

pub mod matcher;
pub mod response;
pub mod scorer;
pub mod session;
pub mod stimulus;
pub mod timer;

pub use matcher::is_match;
pub use response::{ResponseOutcome, ResponseState};
pub use scorer::ScoreTally;
pub use session::{Advance, Session, SessionConfig, SessionPhase, StepView};
pub use stimulus::{
    Channel, Position, RandomStimuli, ScriptedStimuli, StimulusSource, StimulusStep, GRID_CELLS,
};
pub use timer::StepTimer;
