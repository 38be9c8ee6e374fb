//! File input for the command-line tools.
//!
//! [`open`] picks a decoder from the file suffix and [`Lines`] yields the decoded text
//! one numbered line at a time:
//!
//! | Suffix | Decoder |
//! |--------|---------|
//! | `.qs`, `.json` | none |
//! | `.qs.gz`, `.json.gz` | gzip (`flate2`) |
//! | `.qs.bz2`, `.json.bz2` | bzip2 |
//! | `.qs.zst`, `.json.zst` | zstd |

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// The kind of record file being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// qs lines, read by `qs-parse`.
    Qs,
    /// JSON `[identifier, timestamp, fields]` lines, read by `qs-format`.
    Json,
}

impl InputKind {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            InputKind::Qs => "qs",
            InputKind::Json => "json",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Zstd,
}

impl Compression {
    const ALL: [Compression; 4] = [
        Compression::None,
        Compression::Gzip,
        Compression::Bzip2,
        Compression::Zstd,
    ];

    const fn suffix(&self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Gzip => ".gz",
            Compression::Bzip2 => ".bz2",
            Compression::Zstd => ".zst",
        }
    }

    /// Detects the compression of a `kind` file from its name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qsck::input::{Compression, InputKind};
    /// use std::path::Path;
    ///
    /// let detect = |name: &str| Compression::detect(Path::new(name), InputKind::Qs);
    /// assert_eq!(detect("logs/day.qs").unwrap(), Compression::None);
    /// assert_eq!(detect("logs/day.qs.bz2").unwrap(), Compression::Bzip2);
    /// assert!(detect("logs/day.json").is_err());
    /// ```
    pub fn detect(path: &Path, kind: InputKind) -> Result<Self> {
        let name = path.to_string_lossy();
        let base = format!(".{}", kind.extension());

        Compression::ALL
            .into_iter()
            .find(|compression| name.ends_with(&format!("{}{}", base, compression.suffix())))
            .ok_or_else(|| Error::UnsupportedSuffix {
                path: name.to_string(),
                expected: Compression::ALL
                    .iter()
                    .map(|compression| format!("`{}{}`", base, compression.suffix()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    fn decoder<'a, R: Read + 'a>(&self, reader: R) -> Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => Box::new(reader),
            Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::Decoder::new(reader)?),
        })
    }
}

/// Opens a record file, decompressing according to its suffix.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSuffix`] for unknown suffixes and [`Error::Io`] when the
/// file cannot be opened.
pub fn open(path: &Path, kind: InputKind) -> Result<Lines<Box<dyn BufRead>>> {
    let compression = Compression::detect(path, kind)?;
    let file = File::open(path).map_err(|e| Error::io(&format!("{}: {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), ?compression, "opened input");

    let decoded = compression.decoder(BufReader::new(file))?;
    Ok(Lines::new(Box::new(BufReader::new(decoded))))
}

/// Iterator over the `\n`-terminated lines of a reader, numbered from 1.
///
/// Each line keeps its terminator. Invalid UTF-8 fails that line only.
pub struct Lines<R> {
    reader: R,
    number: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Lines {
            reader,
            number: 0,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = (usize, Result<String>);

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.number += 1;
                let line = String::from_utf8(std::mem::take(&mut self.buf))
                    .map_err(|e| Error::io(&format!("line {} is not UTF-8: {}", self.number, e)));
                Some((self.number, line))
            }
            Err(e) => {
                self.number += 1;
                Some((self.number, Err(Error::from(e))))
            }
        }
    }
}
