//! A source file paired with its index.

use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use crate::index::builder;
use crate::index::store;
use crate::index::store::RecoveryPolicy;
use crate::index::BedIndex;
use crate::index::Builder;
use crate::index::Index;
use crate::record::Entry;
use crate::retriever;

/// The suffix appended to a source path to form its default index path.
pub const INDEX_SUFFIX: &str = ".bedidx";

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to an [`IndexedReader`].
#[derive(Debug)]
pub enum Error {
    /// An error building the index.
    Build(builder::Error),

    /// An error persisting or loading the index.
    Store(store::Error),

    /// An error retrieving entries from the source file.
    Fetch(retriever::Error),
}

impl Error {
    /// Returns whether the error was caused by the source file being missing
    /// or unreadable (as opposed to a problem with the index).
    pub fn is_source_unreadable(&self) -> bool {
        matches!(
            self,
            Error::Build(builder::Error::SourceUnreadable(_))
                | Error::Fetch(retriever::Error::SourceUnreadable(_))
        )
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Build(err) => write!(f, "build error: {err}"),
            Error::Store(err) => write!(f, "index store error: {err}"),
            Error::Fetch(err) => write!(f, "fetch error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Indexed reader
////////////////////////////////////////////////////////////////////////////////////////

/// Gets the default index path for a source file (`<source>.bedidx`).
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use bedindex::indexed::default_index_path;
///
/// assert_eq!(
///     default_index_path("data/genes.bed"),
///     Path::new("data/genes.bed.bedidx")
/// );
/// ```
pub fn default_index_path<P>(source: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let mut path = OsString::from(source.as_ref().as_os_str());
    path.push(INDEX_SUFFIX);
    PathBuf::from(path)
}

/// Builds the index for the source file at `source` and persists it to
/// `index_path`.
pub fn build_index<P, Q>(source: P, index_path: Q) -> Result<Index>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let index = Builder
        .try_build_from_path(source)
        .map_err(Error::Build)?;
    store::save(&index, index_path).map_err(Error::Store)?;
    Ok(index)
}

/// A source file together with an index over it.
///
/// The index is never mutated after construction, so a reader can be shared
/// across threads and queried concurrently; each query opens its own handle
/// to the source file.
#[derive(Clone, Debug)]
pub struct IndexedReader<I = Index>
where
    I: BedIndex,
{
    /// The path to the source file.
    source: PathBuf,

    /// The index over the source file.
    index: I,
}

impl<I> IndexedReader<I>
where
    I: BedIndex,
{
    /// Creates a new [`IndexedReader`] from a source path and an index.
    pub fn new(source: impl Into<PathBuf>, index: I) -> Self {
        Self {
            source: source.into(),
            index,
        }
    }

    /// Gets the path to the source file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Gets the index.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Consumes self and returns the index.
    pub fn into_index(self) -> I {
        self.index
    }

    /// Queries the source file for all entries on `chromosome` whose start is
    /// at least `start` and whose end is strictly less than `end`. The entries
    /// are returned sorted by start position.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bedindex::IndexedReader;
    ///
    /// let reader = IndexedReader::open_or_build("genes.bed", "genes.bed.bedidx")?;
    ///
    /// for entry in reader.query("chr1", 2321, 10000)? {
    ///     println!("{entry}");
    /// }
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn query(&self, chromosome: &str, start: i64, end: i64) -> Result<Vec<Entry>> {
        let ordinals = self.index.find(chromosome, start, end);
        retriever::fetch(&self.source, &ordinals).map_err(Error::Fetch)
    }
}

impl IndexedReader<Index> {
    /// Builds the index for `source`, persists it to `index_path`, and returns
    /// a reader over the source using the freshly built index.
    pub fn build<P, Q>(source: P, index_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let source = source.as_ref();
        let index = build_index(source, index_path)?;
        Ok(Self::new(source, index))
    }

    /// Loads the index at `index_path` for `source` with the default
    /// [`RecoveryPolicy`].
    pub fn load<P, Q>(source: P, index_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Self::load_with(source, index_path, RecoveryPolicy::default())
    }

    /// Loads the index at `index_path` for `source` with the given
    /// [`RecoveryPolicy`].
    pub fn load_with<P, Q>(source: P, index_path: Q, policy: RecoveryPolicy) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let index = store::load_with(index_path, policy).map_err(Error::Store)?;
        Ok(Self::new(source.as_ref(), index))
    }

    /// Loads the index at `index_path` for `source` with the default
    /// [`RecoveryPolicy`], building and persisting it first if needed.
    ///
    /// See [`open_or_build_with()`](Self::open_or_build_with).
    pub fn open_or_build<P, Q>(source: P, index_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Self::open_or_build_with(source, index_path, RecoveryPolicy::default())
    }

    /// Loads the index at `index_path` for `source` with the given
    /// [`RecoveryPolicy`], building and persisting it first if needed.
    ///
    /// The index is built when no file exists at `index_path`. It is also
    /// rebuilt when the file loads as an empty index, which is what an
    /// unreadable artifact becomes under [`RecoveryPolicy::Empty`]. Under
    /// [`RecoveryPolicy::Strict`] an unreadable artifact is an error and
    /// nothing is rebuilt. An existing, non-empty index is reused as is, even
    /// if the source has changed since it was built.
    pub fn open_or_build_with<P, Q>(
        source: P,
        index_path: Q,
        policy: RecoveryPolicy,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let source = source.as_ref();
        let index_path = index_path.as_ref();

        if index_path.exists() {
            let reader = Self::load_with(source, index_path, policy)?;

            if !reader.index().is_empty() {
                return Ok(reader);
            }

            info!(index = %index_path.display(), "index is empty; re-indexing");
        } else {
            info!(index = %index_path.display(), "no index found; indexing");
        }

        Self::build(source, index_path)
    }
}
