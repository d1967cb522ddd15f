use thiserror::Error;

/// Rejections raised while validating a session configuration.
///
/// All of these are detected synchronously before the first stimulus is
/// generated, so a failed start always leaves the session idle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the word pool is empty; widen the length filter or supply words")]
    EmptyWordPool,

    #[error("N must be at least 1")]
    ZeroLag,

    #[error("the stimulus duration must be greater than zero")]
    ZeroStepDuration,

    #[error("N ({lag}) must be smaller than the number of steps ({total_steps})")]
    LagTooLarge { lag: usize, total_steps: usize },

    #[error("the stimulus and the gap may last at most {max_secs} s each")]
    StepTooLong { max_secs: u64 },

    #[error("{trials} trials plus N ({lag}) is more steps than a session can hold")]
    TooManySteps { trials: usize, lag: usize },
}

/// Errors returned by [`crate::engine::Session::start`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a session is already running or waiting to be dismissed")]
    NotIdle,
}

/// Failures loading one of the bundled word lists.
#[derive(Error, Debug)]
pub enum LanguageError {
    #[error("word list '{0}' is not bundled")]
    NotFound(String),

    #[error("word list '{0}' is not valid UTF-8")]
    Encoding(String),

    #[error("word list '{name}' could not be parsed")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons the drill settings could not be turned into a session config.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Language(#[from] LanguageError),
}
