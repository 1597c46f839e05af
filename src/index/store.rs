//! Persisting and loading an [`Index`].
//!
//! The persisted form is the `bincode` encoding of the map from chromosome
//! name to bucket, with each bucket written as a plain sequence. There is no
//! header or version; an artifact is either decodable into a valid index or
//! it is unreadable. An empty bucket fails to decode.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Path;

use bincode::Options as _;
use tracing::info;
use tracing::warn;

use crate::index::Bucket;
use crate::index::Index;
use crate::index::InvariantError;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to persisting or loading an [`Index`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error (for example, a missing file or a permission error).
    Io(io::Error),

    /// The index could not be encoded.
    Encode(bincode::Error),

    /// The artifact could not be decoded as an index (including when a
    /// bucket holds no positions).
    ///
    /// Only returned under [`RecoveryPolicy::Strict`].
    Decode(bincode::Error),

    /// The artifact decoded, but does not describe a valid index.
    ///
    /// Only returned under [`RecoveryPolicy::Strict`].
    Invalid(InvariantError),
}

impl Error {
    /// Returns whether the error means the artifact was present but could not
    /// be interpreted as an index.
    pub fn is_index_unreadable(&self) -> bool {
        matches!(self, Error::Decode(_) | Error::Invalid(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Encode(err) => write!(f, "encode error: {err}"),
            Error::Decode(err) => write!(f, "index unreadable: {err}"),
            Error::Invalid(err) => write!(f, "index unreadable: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Recovery policy
////////////////////////////////////////////////////////////////////////////////////////

/// What to do when an index artifact exists but cannot be interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RecoveryPolicy {
    /// Log a warning and treat the artifact as an empty index, as if no index
    /// had been built yet.
    #[default]
    Empty,

    /// Return the decoding error to the caller.
    Strict,
}

////////////////////////////////////////////////////////////////////////////////////////
// Save and load
////////////////////////////////////////////////////////////////////////////////////////

/// The encoding options shared by [`write()`] and [`read()`].
fn options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Writes an [`Index`] to a writer.
pub fn write<W>(index: &Index, writer: W) -> Result<()>
where
    W: Write,
{
    options()
        .serialize_into(writer, index.inner())
        .map_err(|err| match *err {
            bincode::ErrorKind::Io(err) => Error::Io(err),
            other => Error::Encode(Box::new(other)),
        })
}

/// Saves an [`Index`] to the file at `path`, replacing any existing file.
///
/// # Examples
///
/// ```no_run
/// use bedindex::index::store;
///
/// let index = bedindex::index::Builder.try_build_from_path("genes.bed")?;
/// store::save(&index, "genes.bed.bedidx")?;
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn save<P>(index: &Index, path: P) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut writer = File::create(path).map(BufWriter::new).map_err(Error::Io)?;

    write(index, &mut writer)?;
    writer.flush().map_err(Error::Io)?;

    info!(
        index = %path.display(),
        chromosomes = index.len(),
        "saved index"
    );

    Ok(())
}

/// Reads an [`Index`] from a reader.
///
/// I/O errors are always returned. An artifact that cannot be interpreted is
/// handled according to `policy`.
///
/// # Examples
///
/// ```
/// use bedindex::index::store;
/// use bedindex::index::store::RecoveryPolicy;
///
/// let garbage = b"this is not an index";
///
/// let index = store::read(&garbage[..], RecoveryPolicy::Empty)?;
/// assert!(index.is_empty());
///
/// let err = store::read(&garbage[..], RecoveryPolicy::Strict).unwrap_err();
/// assert!(err.is_index_unreadable());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read<R>(mut reader: R, policy: RecoveryPolicy) -> Result<Index>
where
    R: Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(Error::Io)?;

    let result = options()
        .deserialize::<HashMap<String, Bucket>>(&bytes)
        .map_err(Error::Decode)
        .and_then(|map| Index::try_from(map).map_err(Error::Invalid));

    match (result, policy) {
        (Ok(index), _) => Ok(index),
        (Err(err), RecoveryPolicy::Empty) => {
            warn!(
                error = %err,
                "index artifact is unreadable; treating it as an empty index"
            );
            Ok(Index::default())
        }
        (Err(err), RecoveryPolicy::Strict) => Err(err),
    }
}

/// Loads an [`Index`] from the file at `path` with the default
/// [`RecoveryPolicy`].
pub fn load<P>(path: P) -> Result<Index>
where
    P: AsRef<Path>,
{
    load_with(path, RecoveryPolicy::default())
}

/// Loads an [`Index`] from the file at `path` with the given
/// [`RecoveryPolicy`].
pub fn load_with<P>(path: P, policy: RecoveryPolicy) -> Result<Index>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(Error::Io)?;
    let index = read(file, policy)?;

    info!(
        index = %path.display(),
        chromosomes = index.len(),
        positions = index.num_positions(),
        "loaded index"
    );

    Ok(index)
}
