//! A builder for an [`Index`].

use std::collections::HashMap;
use std::io::BufRead;
use std::io::{self};
use std::path::Path;

use nonempty::NonEmpty;
use tracing::debug;
use tracing::info;

use crate::index::Index;
use crate::line;
use crate::reader;
use crate::record::Position;
use crate::Line;
use crate::Reader;

/// An error related to building an [`Index`].
#[derive(Debug)]
pub enum Error {
    /// The source file could not be opened or read.
    SourceUnreadable(io::Error),

    /// A line had enough fields to be an entry, but its coordinates could not
    /// be parsed.
    Parse {
        /// The ordinal of the offending line.
        ordinal: u64,

        /// The parse error.
        error: line::ParseError,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SourceUnreadable(err) => write!(f, "source unreadable: {err}"),
            Error::Parse { ordinal, error } => {
                write!(f, "parse error at line {ordinal}: {error}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reader::Error> for Error {
    fn from(err: reader::Error) -> Self {
        match err {
            reader::Error::Io(err) => Error::SourceUnreadable(err),
            reader::Error::Line(ordinal, error) => Error::Parse { ordinal, error },
        }
    }
}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for an [`Index`].
#[derive(Debug)]
pub struct Builder;

impl Builder {
    /// Builds an [`Index`] from a single pass over a source file reader.
    ///
    /// Every line advances the ordinal. Lines with fewer than three fields are
    /// not indexed. A line with three or more fields whose coordinates cannot
    /// be parsed fails the whole build.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"track name=genes\nchr1\t30\t40\nchr2\t5\t6\nchr1\t10\t20";
    /// let reader = bedindex::Reader::new(&data[..]);
    ///
    /// let index = bedindex::index::Builder::default().try_build_from(reader)?;
    ///
    /// assert_eq!(index.len(), 2);
    /// let ordinals = index
    ///     .get("chr1")
    ///     .unwrap()
    ///     .iter()
    ///     .map(|position| position.ordinal())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(ordinals, vec![3, 1]);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from<T>(&self, mut reader: Reader<T>) -> Result<Index>
    where
        T: BufRead,
    {
        let mut hm = HashMap::<String, Vec<Position>>::default();

        for result in reader.lines() {
            let (ordinal, line) = result?;

            if let Line::Entry(entry) = line {
                let (chromosome, start, end, _) = entry.into_parts();
                hm.entry(chromosome)
                    .or_default()
                    .push(Position::new(ordinal, start, end));
            }
        }

        debug!(lines = reader.ordinal(), "finished scanning source");

        let inner = hm
            .into_iter()
            .filter_map(|(chromosome, mut positions)| {
                // Stable, so equal starts keep their file order.
                positions.sort_by_key(|position| position.start());
                NonEmpty::from_vec(positions).map(|bucket| (chromosome, bucket))
            })
            .collect();

        let index = Index { inner };

        info!(
            chromosomes = index.len(),
            positions = index.num_positions(),
            "built index"
        );

        Ok(index)
    }

    /// Opens the source file at `path` and builds an [`Index`] from it.
    pub fn try_build_from_path<P>(&self, path: P) -> Result<Index>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        debug!(source = %path.display(), "building index");

        let reader = reader::open(path).map_err(Error::SourceUnreadable)?;
        self.try_build_from(reader)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self
    }
}
