//! `bedindex` is a crate for fast range queries over large, tab-delimited
//! genomic interval files (BED-style files).
//!
//! Each line of such a file begins with a chromosome name, a start position
//! (inclusive), and an end position (exclusive), optionally followed by any
//! number of additional fields. Rather than scanning the whole file for every
//! query, this crate builds a persistent, per-chromosome index that maps
//! coordinates to the physical line numbers (_ordinals_) of the entries in the
//! file. Queries consult the index and then re-read only the matching lines.
//!
//! The crate provides the following points of entry:
//!
//! - Building an [`Index`](crate::index::Index) from a source file with
//!   [`index::Builder`].
//! - Persisting and loading an index with the facilities in [`index::store`].
//! - Resolving a query to ordinals with [`index::query::find()`] (or through
//!   the [`BedIndex`](crate::index::BedIndex) trait).
//! - Retrieving the entries for a set of ordinals with [`retriever::fetch()`].
//!
//! Most users will want the [`IndexedReader`] facility, which ties these
//! together.
//!
//! ## Query semantics
//!
//! An entry matches a query `(chromosome, start, end)` when it lies on
//! `chromosome`, its start is greater than or equal to the query start, and its
//! end is _strictly less_ than the query end. This is not a general overlap
//! test.
//!
//! ```
//! use bedindex::index::BedIndex;
//!
//! let data = b"track name=genes\nchr1\t2321\t3521\tgeneA\nchr1\t4324\t6543\tgeneB";
//! let reader = bedindex::Reader::new(&data[..]);
//! let index = bedindex::index::Builder.try_build_from(reader)?;
//!
//! let ordinals = index.find("chr1", 2000, 6543);
//! assert_eq!(ordinals, vec![1]);
//!
//! let entries = bedindex::retriever::fetch_from(bedindex::Reader::new(&data[..]), &ordinals)?;
//! assert_eq!(entries[0].extras(), &["geneA"]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Unreadable indexes
//!
//! When an index file exists but cannot be interpreted (it is corrupt,
//! truncated, or was written by something else), loading it yields an _empty_
//! index by default and a warning is logged. Callers that would rather see the
//! error can opt into
//! [`RecoveryPolicy::Strict`](crate::index::store::RecoveryPolicy::Strict).

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod index;
pub mod indexed;
pub mod line;
pub mod reader;
pub mod record;
pub mod retriever;

pub use indexed::IndexedReader;
pub use line::Line;

pub use self::reader::Reader;
