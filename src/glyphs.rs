//! The five glyphs a bar is drawn with.
//!
//! A glyph set is written either as five literal characters (`"[=>-]"`) or, when any
//! glyph needs more than one character (colour codes, multi-char art), as five entries
//! separated by NUL: `"\x1b[32m[\x1b[0m\0=\0>\0-\0]"`.

use std::str::FromStr;

use compact_str::CompactString;
use thiserror::Error;

/// Glyph set used when none is configured.
pub const DEFAULT_GLYPHS: &str = "[=>-]";

const DELIMITER: char = '\0';
const GLYPH_COUNT: usize = 5;

/// Errors from parsing a glyph set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// The format held the wrong number of glyphs.
    #[error("expected 5 glyphs, found {0}")]
    WrongCount(usize),
}

/// Bar-start, fill, cursor, empty and bar-end glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyphs {
    /// Opens the bar.
    pub start: CompactString,
    /// Completed cells.
    pub fill: CompactString,
    /// Leading edge of the fill, or the moving marker when there is no goal.
    pub cursor: CompactString,
    /// Cells not yet reached.
    pub empty: CompactString,
    /// Closes the bar.
    pub end: CompactString,
}

impl Glyphs {
    /// Parses a glyph set from five characters or five NUL-separated entries.
    ///
    /// # Errors
    ///
    /// Returns [`GlyphError::WrongCount`] when the input does not describe exactly five glyphs.
    pub fn parse(format: &str) -> Result<Self, GlyphError> {
        let entries: Vec<CompactString> = if format.chars().count() == GLYPH_COUNT {
            format.chars().map(|c| std::iter::once(c).collect::<CompactString>()).collect()
        } else {
            format.split(DELIMITER).map(CompactString::from).collect()
        };

        match <[CompactString; GLYPH_COUNT]>::try_from(entries) {
            Ok([start, fill, cursor, empty, end]) => Ok(Self {
                start,
                fill,
                cursor,
                empty,
                end,
            }),
            Err(entries) => Err(GlyphError::WrongCount(entries.len())),
        }
    }
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            start: "[".into(),
            fill: "=".into(),
            cursor: ">".into(),
            empty: "-".into(),
            end: "]".into(),
        }
    }
}

impl FromStr for Glyphs {
    type Err = GlyphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_GLYPHS, GlyphError, Glyphs};

    #[test]
    fn test_literal_chars() {
        let glyphs = Glyphs::parse("[#>.]").unwrap();
        assert_eq!(glyphs.start, "[");
        assert_eq!(glyphs.fill, "#");
        assert_eq!(glyphs.cursor, ">");
        assert_eq!(glyphs.empty, ".");
        assert_eq!(glyphs.end, "]");

        assert_eq!(Glyphs::parse(DEFAULT_GLYPHS).unwrap(), Glyphs::default());
        assert_eq!(Glyphs::parse("│█▌░│").unwrap().cursor, "▌");
    }

    /// Delimited Entries
    /// Multi-character glyphs such as colour-wrapped ones need the NUL-separated form.
    #[test]
    fn test_delimited() {
        let glyphs: Glyphs = "\x1b[32m[\x1b[0m\0==\0>\0 \0\x1b[32m]\x1b[0m".parse().unwrap();
        assert_eq!(glyphs.start, "\x1b[32m[\x1b[0m");
        assert_eq!(glyphs.fill, "==");
        assert_eq!(glyphs.empty, " ");
        assert_eq!(glyphs.end, "\x1b[32m]\x1b[0m");
    }

    #[test]
    fn test_wrong_count() {
        assert_eq!(Glyphs::parse("[=>]"), Err(GlyphError::WrongCount(1)));
        assert_eq!(Glyphs::parse("[\0=\0>]"), Err(GlyphError::WrongCount(3)));
        assert_eq!(
            Glyphs::parse("a\0b\0c\0d\0e\0f").unwrap_err().to_string(),
            "expected 5 glyphs, found 6"
        );
    }
}
