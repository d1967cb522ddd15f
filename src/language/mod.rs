pub mod core;
pub mod pool;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use core::Language;
pub use pool::{LengthFilter, WordPool};

/// Which bundled word list stimuli are drawn from.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum WordMode {
    #[default]
    Chinese,
    English,
    Mixed,
}

impl WordMode {
    pub fn file_stem(&self) -> String {
        self.to_string().to_lowercase()
    }

    pub fn as_lang(&self) -> Result<Language, crate::error::LanguageError> {
        Language::load(*self)
    }
}
