//! Sticker validation and the stylesheet path derived from it.
//!
//! The sticker is written into an X property and interpolated into the
//! stylesheet argument passed to the browser, so it is restricted to
//! letters and digits.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Unicode general categories L (letter) and N (number), nothing else.
static STICKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}]+$").expect("sticker pattern is valid")
});

/// A validated window tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sticker(String);

impl Sticker {
    /// Validate `raw` and wrap it.
    ///
    /// Every char must be in Unicode category L or N. Marks and symbols
    /// that merely count as "alphabetic" (e.g. `ⓐ`, combining vowel signs)
    /// are rejected.
    ///
    /// The empty string is rejected as well. This is stricter than a
    /// letters-and-digits rule alone, which an empty string satisfies
    /// vacuously: an empty tag would compare equal to an untagged window.
    pub fn parse(raw: &str) -> Result<Self> {
        if !STICKER_RE.is_match(raw) {
            return Err(Error::InvalidSticker(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stylesheet handed to the browser via `-C`.
    ///
    /// The tilde is left for the browser to expand.
    pub fn stylesheet_path(&self) -> String {
        format!("~/.surf/styles/{}.css", self.0)
    }
}

impl fmt::Display for Sticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
