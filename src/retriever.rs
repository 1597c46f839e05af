//! Retrieving the entries for a set of ordinals from a source file.
//!
//! The source file is walked forward exactly once per call. Lines that were
//! not requested are discarded without being parsed, so the cost of a fetch is
//! bounded by the ordinal of the last requested line rather than by the size
//! of the file.

use std::io::BufRead;
use std::io::{self};
use std::path::Path;

use tracing::debug;

use crate::reader;
use crate::record::entry;
use crate::record::Entry;
use crate::Reader;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to retrieving entries.
#[derive(Debug)]
pub enum Error {
    /// The source file could not be opened or read.
    SourceUnreadable(io::Error),

    /// The requested ordinals were not strictly ascending.
    UnorderedOrdinals {
        /// The preceding ordinal.
        previous: u64,

        /// The ordinal that was not greater than the preceding one.
        next: u64,
    },

    /// The source file ended before the requested line. This generally means
    /// the index is stale.
    MissingLine(u64),

    /// A requested line could not be parsed as an entry.
    Parse {
        /// The ordinal of the offending line.
        ordinal: u64,

        /// The parse error.
        error: entry::ParseError,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SourceUnreadable(err) => write!(f, "source unreadable: {err}"),
            Error::UnorderedOrdinals { previous, next } => write!(
                f,
                "ordinals must be strictly ascending: found {next} after {previous}"
            ),
            Error::MissingLine(ordinal) => {
                write!(f, "source ended before line {ordinal}")
            }
            Error::Parse { ordinal, error } => {
                write!(f, "parse error at line {ordinal}: {error}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Retrieval
////////////////////////////////////////////////////////////////////////////////////////

/// Opens the source file at `path` and fetches the entries at `ordinals`.
///
/// The source file is opened even when `ordinals` is empty, so a missing
/// source file is always reported.
pub fn fetch<P>(path: P, ordinals: &[u64]) -> Result<Vec<Entry>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = reader::open(path).map_err(Error::SourceUnreadable)?;

    debug!(
        source = %path.display(),
        lines = ordinals.len(),
        "fetching lines"
    );

    fetch_from(reader, ordinals)
}

/// Fetches the entries at `ordinals` from a source file reader.
///
/// The ordinals must be strictly ascending and must not lie behind the
/// reader's current position. The entries are returned sorted by start
/// position; entries sharing a start position stay in file order.
///
/// # Examples
///
/// ```
/// use bedindex::retriever;
///
/// let data = b"track name=genes\nchr1\t30\t40\tb\nchr1\t10\t20\ta\nchr1\t50\t60\tc";
/// let reader = bedindex::Reader::new(&data[..]);
///
/// let entries = retriever::fetch_from(reader, &[1, 2])?;
///
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].extras(), &["a"]);
/// assert_eq!(entries[1].extras(), &["b"]);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fetch_from<T>(mut reader: Reader<T>, ordinals: &[u64]) -> Result<Vec<Entry>>
where
    T: BufRead,
{
    if let Some(pair) = ordinals.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(Error::UnorderedOrdinals {
            previous: pair[0],
            next: pair[1],
        });
    }

    let mut buffer = String::new();
    let mut entries = Vec::with_capacity(ordinals.len());

    for &ordinal in ordinals {
        let gap = ordinal.saturating_sub(reader.ordinal());

        if reader.skip_lines(gap).map_err(Error::SourceUnreadable)? < gap {
            return Err(Error::MissingLine(ordinal));
        }

        if ordinal < reader.ordinal()
            || reader
                .read_line_raw(&mut buffer)
                .map_err(Error::SourceUnreadable)?
                == 0
        {
            return Err(Error::MissingLine(ordinal));
        }

        let entry = buffer
            .parse::<Entry>()
            .map_err(|error| Error::Parse { ordinal, error })?;
        entries.push(entry);
    }

    entries.sort_by_key(|entry| entry.start());
    Ok(entries)
}
