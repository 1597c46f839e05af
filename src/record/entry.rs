//! A parsed entry within a source file.

use std::num::ParseIntError;
use std::str::FromStr;

/// The delimiter for the fields of an entry.
pub const DELIMITER: char = '\t';

/// The minimum number of fields for a line to be considered an entry.
pub const MIN_NUM_FIELDS: usize = 3;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the parsing of an entry.
#[derive(Debug)]
pub enum ParseError {
    /// An incorrect number of fields in the line.
    IncorrectNumberOfFields(usize),

    /// An invalid start position.
    InvalidStart(ParseIntError),

    /// An invalid end position.
    InvalidEnd(ParseIntError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncorrectNumberOfFields(n) => write!(
                f,
                "invalid number of fields in entry: expected at least {} fields, found {} fields",
                MIN_NUM_FIELDS, n
            ),
            ParseError::InvalidStart(err) => write!(f, "invalid start: {}", err),
            ParseError::InvalidEnd(err) => write!(f, "invalid end: {}", err),
        }
    }
}

impl std::error::Error for ParseError {}

////////////////////////////////////////////////////////////////////////////////////////
// Entry
////////////////////////////////////////////////////////////////////////////////////////

/// One parsed line of a source file.
///
/// The start position is inclusive and the end position is exclusive, as is
/// conventional for BED-style files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    /// The chromosome name.
    chromosome: String,

    /// The start position (inclusive).
    start: i64,

    /// The end position (exclusive).
    end: i64,

    /// Any fields trailing the end position, in their original order.
    extras: Vec<String>,
}

impl Entry {
    /// Creates a new [`Entry`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::record::Entry;
    ///
    /// let entry = Entry::new("chr1", 10, 20, vec![String::from("name")]);
    /// assert_eq!(entry.to_string(), "chr1\t10\t20\tname");
    /// ```
    pub fn new(chromosome: impl Into<String>, start: i64, end: i64, extras: Vec<String>) -> Self {
        Self {
            chromosome: chromosome.into(),
            start,
            end,
            extras,
        }
    }

    /// Gets the chromosome name.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::record::Entry;
    ///
    /// let entry = "chr1\t10\t20".parse::<Entry>()?;
    /// assert_eq!(entry.chromosome(), "chr1");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the start position (inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::record::Entry;
    ///
    /// let entry = "chr1\t10\t20".parse::<Entry>()?;
    /// assert_eq!(entry.start(), 10);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Gets the end position (exclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::record::Entry;
    ///
    /// let entry = "chr1\t10\t20".parse::<Entry>()?;
    /// assert_eq!(entry.end(), 20);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Gets the trailing fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::record::Entry;
    ///
    /// let entry = "chr1\t10\t20\tgeneA\t0\t+".parse::<Entry>()?;
    /// assert_eq!(entry.extras(), &["geneA", "0", "+"]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    /// Consumes self and returns the parts of the entry.
    pub fn into_parts(self) -> (String, i64, i64, Vec<String>) {
        (self.chromosome, self.start, self.end, self.extras)
    }
}

impl FromStr for Entry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split(DELIMITER);

        let (chromosome, start, end) = match (fields.next(), fields.next(), fields.next()) {
            (Some(chromosome), Some(start), Some(end)) => (chromosome, start, end),
            _ => {
                return Err(ParseError::IncorrectNumberOfFields(
                    s.split(DELIMITER).count(),
                ))
            }
        };

        let start = start.parse().map_err(ParseError::InvalidStart)?;
        let end = end.parse().map_err(ParseError::InvalidEnd)?;
        let extras = fields.map(String::from).collect();

        Ok(Self {
            chromosome: chromosome.to_string(),
            start,
            end,
            extras,
        })
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.chromosome, DELIMITER, self.start, DELIMITER, self.end
        )?;

        for extra in &self.extras {
            write!(f, "{}{}", DELIMITER, extra)?;
        }

        Ok(())
    }
}
