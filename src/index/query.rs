//! Range queries against an [`Index`].
//!
//! A position matches a query when its start is greater than or equal to the
//! query start and its end is strictly less than the query end. This is not
//! a general overlap test: positions that begin before the query start never
//! match, regardless of where they end.

use tracing::debug;

use crate::index::Bucket;
use crate::index::Index;
use crate::record::Position;

/// Finds the ordinals of all positions on `chromosome` matching the query, in
/// ascending order.
///
/// Unknown chromosomes and negative coordinates produce no matches.
///
/// # Examples
///
/// ```
/// use bedindex::index::query;
///
/// let data = b"chr1\t30\t40\nchr1\t10\t20\nchr1\t15\t50";
/// let index = bedindex::index::Builder.try_build_from(bedindex::Reader::new(&data[..]))?;
///
/// assert_eq!(query::find(&index, "chr1", 10, 45), vec![0, 1]);
/// assert_eq!(query::find(&index, "chr1", 11, 45), vec![0]);
/// assert!(query::find(&index, "chrX", 0, 100).is_empty());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn find(index: &Index, chromosome: &str, start: i64, end: i64) -> Vec<u64> {
    if start < 0 || end < 0 {
        debug!(chromosome, start, end, "negative query coordinates");
        return Vec::new();
    }

    let bucket = match index.get(chromosome) {
        Some(bucket) => bucket,
        None => {
            debug!(chromosome, "chromosome not present in index");
            return Vec::new();
        }
    };

    let ordinals = find_in_bucket(bucket, start, end);
    debug!(chromosome, start, end, matches = ordinals.len(), "queried index");

    ordinals
}

/// Finds the ordinals of all positions within a start-sorted bucket matching
/// the query, in ascending order.
pub fn find_in_bucket(bucket: &Bucket, start: i64, end: i64) -> Vec<u64> {
    let first = match bucket.head.start() < start {
        true => 1 + bucket.tail.partition_point(|position| position.start() < start),
        false => 0,
    };

    if first == bucket.len() {
        return Vec::new();
    }

    // Ends are not ordered, so the remainder of the bucket must be scanned.
    let mut ordinals = bucket
        .iter()
        .skip(first)
        .filter(|position| position.end() < end)
        .map(Position::ordinal)
        .collect::<Vec<_>>();

    ordinals.sort_unstable();
    ordinals
}
