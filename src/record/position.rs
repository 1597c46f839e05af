//! An indexed position.

use serde::Deserialize;
use serde::Serialize;

/// The location of one entry within the source file, as stored in the index.
///
/// The ordinal is the zero-based physical line number of the entry. Every
/// line of the source file is counted, including lines that were not indexed
/// (headers, comments, and the like), so the ordinal can always be used to
/// walk back to the original line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// The zero-based physical line number.
    ordinal: u64,

    /// The start position (inclusive).
    start: i64,

    /// The end position (exclusive).
    end: i64,
}

impl Position {
    /// Creates a new [`Position`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::record::Position;
    ///
    /// let position = Position::new(3, 10, 20);
    ///
    /// assert_eq!(position.ordinal(), 3);
    /// assert_eq!(position.start(), 10);
    /// assert_eq!(position.end(), 20);
    /// ```
    pub fn new(ordinal: u64, start: i64, end: i64) -> Self {
        Self {
            ordinal,
            start,
            end,
        }
    }

    /// Gets the zero-based physical line number.
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Gets the start position (inclusive).
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Gets the end position (exclusive).
    pub fn end(&self) -> i64 {
        self.end
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.ordinal, self.start, self.end)
    }
}
