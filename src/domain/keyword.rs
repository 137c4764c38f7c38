//! Free-text keyword matching for catalog searches.
//!
//! Keywords are literal by default: the trimmed input is escaped before being
//! compiled, so `a.b` only matches the text `a.b`. [`KeywordMode::Pattern`]
//! keeps the power-user regular-expression search, compiled with a bounded
//! program size so oversized patterns are rejected instead of evaluated.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for compiled pattern programs.
const PATTERN_SIZE_LIMIT: usize = 1 << 16;
/// Longest keyword accepted from user input.
pub const MAX_KEYWORD_LEN: usize = 200;

/// How the keyword text is interpreted.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMode {
    #[default]
    Literal,
    Pattern,
}

impl TryFrom<&str> for KeywordMode {
    type Error = KeywordError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "" | "literal" => Ok(Self::Literal),
            "pattern" => Ok(Self::Pattern),
            other => Err(KeywordError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeywordError {
    #[error("keyword is longer than 200 characters")]
    TooLong,
    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),
    #[error("unknown keyword mode: {0}")]
    UnknownMode(String),
}

/// Compiled, case-insensitive keyword.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword: String,
    mode: KeywordMode,
    regex: Regex,
}

impl KeywordMatcher {
    /// Compile a keyword. Blank input yields `Ok(None)`: no text restriction.
    pub fn new(keyword: &str, mode: KeywordMode) -> Result<Option<Self>, KeywordError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(None);
        }
        if keyword.chars().count() > MAX_KEYWORD_LEN {
            return Err(KeywordError::TooLong);
        }

        let source = match mode {
            KeywordMode::Literal => regex::escape(keyword),
            KeywordMode::Pattern => keyword.to_string(),
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map_err(|e| KeywordError::InvalidPattern(e.to_string()))?;

        Ok(Some(Self {
            keyword: keyword.to_string(),
            mode,
            regex,
        }))
    }

    /// The trimmed keyword as typed.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn mode(&self) -> KeywordMode {
        self.mode
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for KeywordMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.keyword == other.keyword && self.mode == other.mode
    }
}
