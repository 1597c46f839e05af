//! A line within a source file.

use std::str::FromStr;

use crate::record::entry;
use crate::record::entry::DELIMITER;
use crate::record::entry::MIN_NUM_FIELDS;
use crate::record::Entry;

/// An error associated with parsing a line of the source file.
#[derive(Debug)]
pub enum ParseError {
    /// A line with enough fields to be an entry that could not be parsed.
    InvalidEntry(entry::ParseError, String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidEntry(err, line) => {
                write!(f, "invalid entry: {}\n\nline: {}", err, line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// A line within a source file.
///
/// Lines with fewer than three tab-delimited fields (track lines, comments,
/// blank lines) are never indexed, but they still occupy an ordinal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// A line that does not have enough fields to be an entry.
    NonIndexable,

    /// An entry line.
    Entry(Entry),
}

impl Line {
    /// Returns whether the line could be indexed.
    pub fn is_indexable(&self) -> bool {
        matches!(self, Line::Entry(_))
    }
}

impl FromStr for Line {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Too few columns means "skip", whereas malformed coordinates in a line
        // with enough columns is an error.
        if s.split(DELIMITER).nth(MIN_NUM_FIELDS - 1).is_none() {
            return Ok(Line::NonIndexable);
        }

        s.parse::<Entry>()
            .map(Line::Entry)
            .map_err(|e| ParseError::InvalidEntry(e, s.into()))
    }
}
