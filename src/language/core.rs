use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

use crate::error::LanguageError;

use super::WordMode;

static LANG_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/lang");

/// A bundled word list as stored in `src/lang/<name>.json`.
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    pub fn load(mode: WordMode) -> Result<Self, LanguageError> {
        read_language_from_file(&format!("{}.json", mode.file_stem()))
    }
}

fn read_language_from_file(file_name: &str) -> Result<Language, LanguageError> {
    let file = LANG_DIR
        .get_file(file_name)
        .ok_or_else(|| LanguageError::NotFound(file_name.to_string()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or_else(|| LanguageError::Encoding(file_name.to_string()))?;

    from_str(file_as_str).map_err(|source| LanguageError::Parse {
        name: file_name.to_string(),
        source,
    })
}
