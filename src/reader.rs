//! A source file reader.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::{self};
use std::iter;
use std::mem;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::line;
use crate::Line;

/// The new line byte.
const NEW_LINE: u8 = b'\n';

/// The carriage return byte.
const CARRIAGE_RETURN: u8 = b'\r';

/// The extension of gzip-compressed source files.
const GZIP_EXTENSION: &str = "gz";

/// An error related to a [`Reader`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// A line error at the given ordinal.
    Line(u64, line::ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Line(ordinal, err) => write!(f, "line error at line {ordinal}: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A forward-only reader over the lines of a source file.
///
/// The reader keeps track of the ordinal of the next line to be read. The
/// ordinal counts every physical line, regardless of its content.
#[derive(Clone, Debug)]
pub struct Reader<T>
where
    T: BufRead,
{
    /// The inner reader.
    inner: T,

    /// The ordinal of the next line to be read.
    ordinal: u64,
}

impl<T> Reader<T>
where
    T: BufRead,
{
    /// Creates a source file reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"chr1\t10\t20\n";
    /// let reader = bedindex::Reader::new(&data[..]);
    /// assert_eq!(reader.ordinal(), 0);
    /// ```
    pub fn new(inner: T) -> Self {
        Self::from(inner)
    }

    /// Gets a reference to the inner reader.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consumes self and returns the inner reader.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Gets the ordinal of the next line to be read (equivalently, the number
    /// of lines consumed so far).
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Reads a raw, textual line from the underlying reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    ///
    /// let data = b"track name=genes\r\nchr1\t10\t20";
    /// let mut reader = bedindex::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 18);
    /// assert_eq!(buffer, "track name=genes");
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 10);
    /// assert_eq!(buffer, "chr1\t10\t20");
    /// assert_eq!(reader.ordinal(), 2);
    ///
    /// assert_eq!(reader.read_line_raw(&mut buffer)?, 0);
    /// assert_eq!(reader.ordinal(), 2);
    ///
    /// # Ok::<(), io::Error>(())
    /// ```
    pub fn read_line_raw(&mut self, buffer: &mut String) -> io::Result<usize> {
        let read = read_line(&mut self.inner, buffer)?;

        if read > 0 {
            self.ordinal += 1;
        }

        Ok(read)
    }

    /// Attempts to read a [`Line`] from the underlying reader, returning it
    /// together with its ordinal.
    ///
    /// # Examples
    ///
    /// ```
    /// use bedindex::Line;
    ///
    /// let data = b"track name=genes\nchr1\t10\t20";
    /// let mut reader = bedindex::Reader::new(&data[..]);
    ///
    /// let mut buffer = String::new();
    /// assert!(matches!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some((0, Line::NonIndexable))
    /// ));
    /// assert!(matches!(
    ///     reader.read_line(&mut buffer)?,
    ///     Some((1, Line::Entry(_)))
    /// ));
    /// assert!(reader.read_line(&mut buffer)?.is_none());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_line(&mut self, buffer: &mut String) -> Result<Option<(u64, Line)>, Error> {
        let ordinal = self.ordinal;
        let read = self.read_line_raw(buffer).map_err(Error::Io)?;

        match read {
            0 => Ok(None),
            _ => {
                let line = buffer
                    .parse::<Line>()
                    .map_err(|e| Error::Line(ordinal, e))?;
                Ok(Some((ordinal, line)))
            }
        }
    }

    /// Discards up to `n` lines without interpreting them. Returns the number
    /// of lines actually discarded, which is less than `n` only when the end
    /// of the input was reached.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"a\nb\nc\n";
    /// let mut reader = bedindex::Reader::new(&data[..]);
    ///
    /// assert_eq!(reader.skip_lines(2)?, 2);
    /// assert_eq!(reader.ordinal(), 2);
    /// assert_eq!(reader.skip_lines(5)?, 1);
    /// assert_eq!(reader.ordinal(), 3);
    ///
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn skip_lines(&mut self, n: u64) -> io::Result<u64> {
        let mut buffer = Vec::new();
        let mut skipped = 0;

        while skipped < n {
            buffer.clear();

            if self.inner.read_until(NEW_LINE, &mut buffer)? == 0 {
                break;
            }

            skipped += 1;
        }

        self.ordinal += skipped;
        Ok(skipped)
    }

    /// Returns an iterator over the ordinals and [`Line`]s in the underlying
    /// reader.
    ///
    /// # Examples
    ///
    /// ```
    /// let data = b"track name=genes\nchr1\t10\t20\nchr1\t30\t40";
    /// let mut reader = bedindex::Reader::new(&data[..]);
    ///
    /// let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    /// assert_eq!(lines.len(), 3);
    /// assert_eq!(lines[2].0, 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn lines(&mut self) -> impl Iterator<Item = Result<(u64, Line), Error>> + '_ {
        let mut buffer = String::new();
        iter::from_fn(move || self.read_line(&mut buffer).transpose())
    }
}

impl<T> From<T> for Reader<T>
where
    T: BufRead,
{
    fn from(inner: T) -> Self {
        Self { inner, ordinal: 0 }
    }
}

/// Opens a source file for reading.
///
/// Files ending in `.gz` are decompressed on the fly. Ordinals always refer
/// to decompressed lines.
pub fn open<P>(path: P) -> io::Result<Reader<Box<dyn BufRead>>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)?;

    let inner: Box<dyn BufRead> = match path.extension().and_then(|ext| ext.to_str()) {
        Some(GZIP_EXTENSION) => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    };

    Ok(Reader::new(inner))
}

/// Reads a line from a buffered reader, stripping the line terminator.
///
/// Lines are read as raw bytes. Bytes that are not valid UTF-8 are replaced
/// with `U+FFFD`, so a stray byte never makes the rest of the file unreadable.
fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead,
{
    let mut bytes = mem::take(buffer).into_bytes();
    bytes.clear();

    let n = reader.read_until(NEW_LINE, &mut bytes)?;

    if bytes.ends_with(&[NEW_LINE]) {
        bytes.pop();

        if bytes.ends_with(&[CARRIAGE_RETURN]) {
            bytes.pop();
        }
    }

    *buffer = match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };

    Ok(n)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write as _;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_read_line() {
        let data = b"hello\r\nworld!";
        let mut cursor = io::Cursor::new(data);

        let mut buffer = String::new();
        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "hello");
        assert_eq!(len, 7);

        let len = read_line(&mut cursor, &mut buffer).unwrap();
        assert_eq!(buffer, "world!");
        assert_eq!(len, 6);
    }

    #[test]
    fn test_read_line_with_invalid_utf8() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"# caf\xe9 annotations\r\nchr1\t10\t20\tx\n";
        let mut reader = Reader::new(&data[..]);

        let mut buffer = String::new();
        assert_eq!(reader.read_line_raw(&mut buffer)?, 20);
        assert_eq!(buffer, "# caf\u{FFFD} annotations");

        assert!(matches!(
            reader.read_line(&mut buffer)?,
            Some((1, Line::Entry(_)))
        ));
        assert!(reader.read_line(&mut buffer)?.is_none());

        Ok(())
    }

    #[test]
    fn test_ordinals_count_every_line() -> Result<(), Box<dyn std::error::Error>> {
        let data = b"header\n\nchr1\t1\t2\n";
        let mut reader = Reader::new(&data[..]);

        let ordinals = reader
            .lines()
            .map(|result| result.map(|(ordinal, line)| (ordinal, line.is_indexable())))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(ordinals, vec![(0, false), (1, false), (2, true)]);
        Ok(())
    }

    #[test]
    fn test_line_error_carries_ordinal() {
        let data = b"header\nchr1\tx\t2\n";
        let mut reader = Reader::new(&data[..]);

        let err = reader.lines().find_map(Result::err).unwrap();
        assert!(matches!(err, Error::Line(1, _)));
    }

    #[test]
    fn test_open_gzip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new("bedindex")?;
        let path = dir.path().join("data.bed.gz");

        let mut encoder = GzEncoder::new(File::create(&path)?, Compression::default());
        encoder.write_all(b"header\nchr1\t1\t2\n")?;
        encoder.finish()?;

        let mut reader = open(&path)?;
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

        assert_eq!(lines.len(), 2);
        assert!(lines[1].1.is_indexable());
        Ok(())
    }

    #[test]
    fn test_open_missing_file() {
        let err = open("/nonexistent/path/to/data.bed").err().expect("opening a missing file should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
