use std::fs;
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use bedindex::index::store;
use bedindex::index::store::RecoveryPolicy;
use bedindex::indexed;
use bedindex::record::Entry;
use bedindex::IndexedReader;
use flate2::write::GzEncoder;
use flate2::Compression;
use tempdir::TempDir;

const SAMPLE: &str = "chr1\t2321\t3521\t2312321 321321, 3213213, 321, 321, 31\t321212 fdskajflk\n\
                      chr1\t4324\t6543\t2312321 321321, 3213213, 321, 321, 31\t321212 fdskajflk\n\
                      chr1\t8654\t9323\t2312321 321321, 3213213, 321, 321, 31\t321212 fdskajflk\n\
                      chr2\t10213\t12122\t2312321 321321, 3213213, 321, 321, 31\t321212 fdskajflk\n\
                      chr2\t232121\t4323232\t2312321 321321, 3213213, 321, 321, 31  321212 fdskajflk";

const HEADER: &str = "ANY HEADER DATA  bla-bla-bla JFKD\t djfsa\n";

fn extras() -> Vec<String> {
    vec![
        String::from("2312321 321321, 3213213, 321, 321, 31"),
        String::from("321212 fdskajflk"),
    ]
}

fn expected() -> Vec<Entry> {
    vec![
        Entry::new("chr1", 2321, 3521, extras()),
        Entry::new("chr1", 4324, 6543, extras()),
        Entry::new("chr1", 8654, 9323, extras()),
        Entry::new("chr2", 10213, 12122, extras()),
        Entry::new(
            "chr2",
            232121,
            4323232,
            vec![String::from(
                "2312321 321321, 3213213, 321, 321, 31  321212 fdskajflk",
            )],
        ),
    ]
}

fn write_source(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("sample.bed");
    fs::write(&path, contents).unwrap();
    path
}

fn build(source: &Path) -> IndexedReader {
    let index_path = indexed::default_index_path(source);
    IndexedReader::build(source, &index_path).unwrap();
    IndexedReader::load(source, &index_path).unwrap()
}

#[test]
fn index_round_trips_through_disk() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, SAMPLE);
    let index_path = indexed::default_index_path(&source);

    let built = IndexedReader::build(&source, &index_path)?;
    let loaded = IndexedReader::load(&source, &index_path)?;

    assert_eq!(loaded.index(), built.index());
    assert_eq!(loaded.index().len(), 2);
    assert_eq!(loaded.index().get("chr1").unwrap().len(), 3);
    assert_eq!(loaded.index().get("chr2").unwrap().len(), 2);

    for (_, bucket) in loaded.index().iter() {
        let starts = bucket.iter().map(|p| p.start()).collect::<Vec<_>>();
        assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    Ok(())
}

#[test]
fn query_whole_chromosome() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let reader = build(&write_source(&dir, SAMPLE));

    let entries = reader.query("chr1", 2321, 10000)?;
    assert_eq!(entries, expected()[0..3].to_vec());

    Ok(())
}

#[test]
fn query_end_is_exclusive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let reader = build(&write_source(&dir, SAMPLE));

    let entries = reader.query("chr2", 10213, 4323232)?;
    assert_eq!(entries, expected()[3..4].to_vec());

    let entries = reader.query("chr2", 10213, 4323233)?;
    assert_eq!(entries, expected()[3..5].to_vec());

    Ok(())
}

#[test]
fn query_with_no_matches() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let reader = build(&write_source(&dir, SAMPLE));

    assert!(reader.query("chr10", 2321, 10000)?.is_empty());
    assert!(reader.query("foobar", 2321, 10000)?.is_empty());
    assert!(reader.query("chr1", 1000000, 100000)?.is_empty());
    assert!(reader.query("chr1", -2321, 10000)?.is_empty());

    Ok(())
}

#[test]
fn header_lines_do_not_shift_results() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, &format!("{}{}", HEADER.repeat(3), SAMPLE));
    let reader = build(&source);

    assert_eq!(reader.index().len(), 2);
    assert_eq!(
        reader.query("chr2", 10213, 4323233)?,
        expected()[3..5].to_vec()
    );
    assert_eq!(reader.query("chr1", 2321, 10000)?, expected()[0..3].to_vec());

    Ok(())
}

#[test]
fn gzip_source() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = dir.path().join("sample.bed.gz");

    let mut encoder = GzEncoder::new(File::create(&source)?, Compression::default());
    encoder.write_all(HEADER.as_bytes())?;
    encoder.write_all(SAMPLE.as_bytes())?;
    encoder.finish()?;

    let reader = build(&source);
    assert_eq!(reader.query("chr1", 4324, 10000)?, expected()[1..3].to_vec());

    Ok(())
}

#[test]
fn missing_source_is_reported_distinctly() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, SAMPLE);
    let reader = build(&source);

    let moved = IndexedReader::new(dir.path().join("missing.bed"), reader.into_index());
    let err = moved.query("chr1", 2321, 10000).unwrap_err();
    assert!(err.is_source_unreadable());

    let err = IndexedReader::build(dir.path().join("missing.bed"), dir.path().join("x.bedidx"))
        .unwrap_err();
    assert!(err.is_source_unreadable());

    Ok(())
}

#[test]
fn malformed_coordinates_fail_the_build() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, &format!("{}\nchr1\tabc\t10\n", SAMPLE));
    let index_path = indexed::default_index_path(&source);

    let err = IndexedReader::build(&source, &index_path).unwrap_err();
    assert!(!err.is_source_unreadable());
    assert!(!index_path.exists());

    Ok(())
}

#[test]
fn corrupt_index_loads_as_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, SAMPLE);
    let index_path = indexed::default_index_path(&source);
    fs::write(&index_path, b"definitely not an index")?;

    let reader = IndexedReader::load(&source, &index_path)?;
    assert!(reader.index().is_empty());
    assert!(reader.query("chr1", 2321, 10000)?.is_empty());

    let err = IndexedReader::load_with(&source, &index_path, RecoveryPolicy::Strict).unwrap_err();
    assert!(!err.is_source_unreadable());

    Ok(())
}

#[test]
fn missing_index_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, SAMPLE);

    let err = store::load(dir.path().join("missing.bedidx")).unwrap_err();
    assert!(matches!(err, store::Error::Io(_)));
    assert!(IndexedReader::load(&source, dir.path().join("missing.bedidx")).is_err());

    Ok(())
}

#[test]
fn open_or_build_creates_the_index_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, SAMPLE);
    let index_path = indexed::default_index_path(&source);

    assert!(!index_path.exists());
    let reader = IndexedReader::open_or_build(&source, &index_path)?;
    assert!(index_path.exists());
    assert_eq!(reader.query("chr1", 2321, 10000)?.len(), 3);

    // The existing index is reused even though the source has since changed.
    fs::write(&source, format!("{}{}", HEADER, SAMPLE))?;
    let reader = IndexedReader::open_or_build(&source, &index_path)?;
    assert_eq!(reader.index().get("chr1").unwrap()[0].ordinal(), 0);

    Ok(())
}

#[test]
fn open_or_build_replaces_a_corrupt_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let source = write_source(&dir, SAMPLE);
    let index_path = indexed::default_index_path(&source);
    fs::write(&index_path, b"definitely not an index")?;

    let err = IndexedReader::open_or_build_with(&source, &index_path, RecoveryPolicy::Strict)
        .unwrap_err();
    assert!(!err.is_source_unreadable());

    let reader = IndexedReader::open_or_build(&source, &index_path)?;
    assert_eq!(reader.query("chr1", 2321, 10000)?, expected()[0..3].to_vec());

    let reloaded = IndexedReader::load_with(&source, &index_path, RecoveryPolicy::Strict)?;
    assert_eq!(reloaded.index(), reader.index());

    Ok(())
}

#[test]
fn concurrent_queries_share_one_index() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new("bedindex")?;
    let reader = build(&write_source(&dir, SAMPLE));

    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| scope.spawn(|| reader.query("chr1", 2321, 10000).unwrap().len()))
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
    });

    Ok(())
}
