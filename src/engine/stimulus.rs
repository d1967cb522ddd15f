use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::language::WordPool;

/// Number of cells in the 3x3 presentation grid.
pub const GRID_CELLS: u8 = 9;

/// A cell of the 3x3 grid, numbered row by row from the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(u8);

impl Position {
    pub fn new(cell: u8) -> Option<Self> {
        (cell < GRID_CELLS).then_some(Self(cell))
    }

    pub fn cell(self) -> u8 {
        self.0
    }

    pub fn row(self) -> u8 {
        self.0 / 3
    }

    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

/// One of the two independently scored match dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Channel {
    Position,
    Word,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Position, Channel::Word];
}

/// One presentation event: a lit grid cell and a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StimulusStep {
    pub position: Position,
    pub word: String,
}

impl StimulusStep {
    pub fn new(position: Position, word: impl Into<String>) -> Self {
        Self {
            position,
            word: word.into(),
        }
    }
}

/// Produces the stimulus stream for a session.
pub trait StimulusSource: Send {
    /// Next stimulus, or `None` if nothing can be produced from `pool`.
    fn generate(&mut self, pool: &WordPool) -> Option<StimulusStep>;

    /// Called when a new session starts.
    fn reset(&mut self) {}
}

/// Independent uniform draws: position from the grid, word from the pool.
///
/// Repeats across the lag window only happen by chance; no targets are
/// injected.
#[derive(Debug, Clone)]
pub struct RandomStimuli {
    rng: StdRng,
}

impl RandomStimuli {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStimuli {
    fn default() -> Self {
        Self::new()
    }
}

impl StimulusSource for RandomStimuli {
    fn generate(&mut self, pool: &WordPool) -> Option<StimulusStep> {
        let word = pool.choose(&mut self.rng)?.to_string();
        let position = Position(self.rng.gen_range(0..GRID_CELLS));
        Some(StimulusStep { position, word })
    }
}

/// Replays a fixed list of steps, wrapping around when exhausted. The word
/// pool is ignored.
#[derive(Debug, Clone)]
pub struct ScriptedStimuli {
    steps: Vec<StimulusStep>,
    next: usize,
}

impl ScriptedStimuli {
    pub fn new(steps: Vec<StimulusStep>) -> Self {
        Self { steps, next: 0 }
    }

    /// Builds a script from `(cell, word)` pairs, skipping cells outside the grid.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u8, &'a str)>,
    {
        let steps = pairs
            .into_iter()
            .filter_map(|(cell, word)| Position::new(cell).map(|p| StimulusStep::new(p, word)))
            .collect();
        Self::new(steps)
    }
}

impl StimulusSource for ScriptedStimuli {
    fn generate(&mut self, _pool: &WordPool) -> Option<StimulusStep> {
        if self.steps.is_empty() {
            return None;
        }
        let step = self.steps[self.next % self.steps.len()].clone();
        self.next += 1;
        Some(step)
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}
