//! A per-chromosome index of the entries within a source file.

pub mod builder;
pub mod query;
pub mod store;

use std::collections::hash_map;
use std::collections::HashMap;

use nonempty::NonEmpty;

pub use builder::Builder;

use crate::record::Position;

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error related to the invariants of an [`Index`].
#[derive(Debug, Eq, PartialEq)]
pub enum InvariantError {
    /// The positions for a chromosome were not sorted by start position.
    UnsortedBucket(String),
}

impl std::fmt::Display for InvariantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantError::UnsortedBucket(chromosome) => write!(
                f,
                "positions for chromosome `{chromosome}` are not sorted by start"
            ),
        }
    }
}

impl std::error::Error for InvariantError {}

////////////////////////////////////////////////////////////////////////////////////////
// Lookup
////////////////////////////////////////////////////////////////////////////////////////

/// A facility that can resolve a range query to the ordinals of the matching
/// lines within a source file.
pub trait BedIndex {
    /// Returns the ordinals, in ascending order, of all lines on `chromosome`
    /// whose start is at least `start` and whose end is strictly less than
    /// `end`.
    fn find(&self, chromosome: &str, start: i64, end: i64) -> Vec<u64>;
}

////////////////////////////////////////////////////////////////////////////////////////
// Index
////////////////////////////////////////////////////////////////////////////////////////

/// The positions recorded for a single chromosome.
pub type Bucket = NonEmpty<Position>;

/// A mapping from each chromosome to its [`Bucket`] of [`Position`]s.
///
/// Every bucket is non-empty by construction and sorted by start position.
/// Positions that share a start position retain the order in which they
/// appeared in the source file. An index is immutable once it has been built.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Index {
    /// The buckets keyed by chromosome name.
    inner: HashMap<String, Bucket>,
}

impl Index {
    /// Gets the bucket for a chromosome, if it exists.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\t30\t40\nchr1\t10\t20";
    /// let index = bedindex::index::Builder.try_build_from(bedindex::Reader::new(&data[..]))?;
    ///
    /// let bucket = index.get("chr1").unwrap();
    /// assert_eq!(bucket[0].start(), 10);
    /// assert_eq!(bucket[0].ordinal(), 1);
    /// assert!(index.get("chr2").is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn get(&self, chromosome: &str) -> Option<&Bucket> {
        self.inner.get(chromosome)
    }

    /// Returns whether the index contains a chromosome.
    pub fn contains(&self, chromosome: &str) -> bool {
        self.inner.contains_key(chromosome)
    }

    /// Gets an iterator over the chromosome names in arbitrary order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|chromosome| chromosome.as_str())
    }

    /// Gets an iterator over the chromosomes and their buckets in arbitrary
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.inner
            .iter()
            .map(|(chromosome, bucket)| (chromosome.as_str(), bucket))
    }

    /// Gets the number of chromosomes in the index.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns whether the index has no chromosomes.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Gets the total number of positions across all buckets.
    pub fn num_positions(&self) -> usize {
        self.inner.values().map(NonEmpty::len).sum()
    }

    /// Gets the inner map.
    pub(crate) fn inner(&self) -> &HashMap<String, Bucket> {
        &self.inner
    }
}

impl TryFrom<HashMap<String, Bucket>> for Index {
    type Error = InvariantError;

    fn try_from(inner: HashMap<String, Bucket>) -> Result<Self, Self::Error> {
        for (chromosome, bucket) in &inner {
            let unsorted = bucket
                .iter()
                .zip(bucket.iter().skip(1))
                .any(|(a, b)| a.start() > b.start());

            if unsorted {
                return Err(InvariantError::UnsortedBucket(chromosome.clone()));
            }
        }

        Ok(Self { inner })
    }
}

impl BedIndex for Index {
    fn find(&self, chromosome: &str, start: i64, end: i64) -> Vec<u64> {
        query::find(self, chromosome, start, end)
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = (&'a String, &'a Bucket);
    type IntoIter = hash_map::Iter<'a, String, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use nonempty::nonempty;

    use super::*;

    #[test]
    fn test_try_from_valid_map() -> Result<(), Box<dyn std::error::Error>> {
        let mut map = HashMap::new();
        map.insert(
            String::from("chr1"),
            nonempty![Position::new(1, 10, 20), Position::new(0, 10, 15)],
        );

        let index = Index::try_from(map)?;
        assert_eq!(index.len(), 1);
        assert_eq!(index.num_positions(), 2);
        assert!(index.contains("chr1"));

        Ok(())
    }

    #[test]
    fn test_try_from_unsorted_bucket() {
        let mut map = HashMap::new();
        map.insert(
            String::from("chr1"),
            nonempty![Position::new(0, 30, 40), Position::new(1, 10, 20)],
        );

        let err = Index::try_from(map).unwrap_err();
        assert_eq!(
            err.to_string(),
            "positions for chromosome `chr1` are not sorted by start"
        );
    }
}
