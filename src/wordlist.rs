use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;
use std::fmt;

static WORDS_DIR: Dir = include_dir!("src/words");

/// A fixed vocabulary for one practice session.
///
/// Words are lowercase ASCII tokens; anything else is dropped during
/// normalization. A list that ends up empty is rejected outright, since
/// every selection strategy needs at least one word.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

#[derive(Debug)]
pub enum WordListError {
    UnknownList(String),
    Malformed(String),
    Empty(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordListError::UnknownList(name) => write!(f, "no built-in word list named '{name}'"),
            WordListError::Malformed(name) => write!(f, "word list '{name}' is not valid JSON"),
            WordListError::Empty(name) => {
                write!(f, "word list '{name}' has no usable words after normalization")
            }
        }
    }
}

impl Error for WordListError {}

impl WordList {
    /// Load one of the lists embedded at compile time.
    pub fn load(file_name: &str) -> Result<WordList, WordListError> {
        let file = WORDS_DIR
            .get_file(file_name)
            .ok_or_else(|| WordListError::UnknownList(file_name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| WordListError::Malformed(file_name.to_string()))?;

        let list: WordList =
            from_str(contents).map_err(|_| WordListError::Malformed(file_name.to_string()))?;

        WordList::from_words(list.name, list.words)
    }

    /// Build a list from arbitrary tokens, normalizing each to lowercase and
    /// dropping tokens that are not pure ASCII letters.
    pub fn from_words<S: Into<String>>(
        name: S,
        words: Vec<String>,
    ) -> Result<WordList, WordListError> {
        let name = name.into();
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_lowercase()))
            .collect();

        if words.is_empty() {
            return Err(WordListError::Empty(name));
        }

        Ok(WordList {
            name,
            size: words.len() as u32,
            words,
        })
    }
}
