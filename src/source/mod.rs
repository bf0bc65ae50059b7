//! Line sources: one logical sequence of lines over several inputs.
//!
//! Inputs are read in the order given, each to its end, before the next one is
//! opened. Lines are yielded without their trailing `\n`; a `\r` before the
//! newline is kept as part of the record, so writing each record back followed
//! by `\n` reproduces the input bytes exactly.
//!
//! Opening failures are lenient: a named input that cannot be opened is
//! skipped with a warning. A read failure is terminal: it ends the whole
//! sequence and is kept for the caller to inspect through [`LineSource::report`].

mod compression;

pub use compression::Compression;

use crate::progress::{ProgressFn, ProgressReader};
use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Read buffer for each opened input.
pub const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Where one input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Stdin,
    Path(PathBuf),
}

impl Locator {
    /// `-` names standard input, anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Locator::Stdin
        } else {
            Locator::Path(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Stdin => write!(f, "<stdin>"),
            Locator::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl From<PathBuf> for Locator {
    fn from(path: PathBuf) -> Self {
        Locator::Path(path)
    }
}

impl From<&Path> for Locator {
    fn from(path: &Path) -> Self {
        Locator::Path(path.to_path_buf())
    }
}

/// How the line sequence ended, plus what was skipped along the way.
#[derive(Debug, Default)]
pub struct SourceReport {
    pub lines_read: u64,
    pub bytes_read: u64,
    /// Inputs that could not be opened, with the reason.
    pub skipped: Vec<(Locator, String)>,
    /// Inputs that were opened and read.
    pub opened: usize,
    /// The read failure that cut the sequence short, if any.
    pub read_error: Option<(Locator, io::Error)>,
}

impl SourceReport {
    /// Every named input failed to open, so nothing at all was read.
    pub fn all_skipped(&self) -> bool {
        self.opened == 0 && !self.skipped.is_empty()
    }
}

/// A lazy, finite, non-restartable sequence of lines.
pub struct LineSource {
    pending: VecDeque<Locator>,
    current: Option<(Locator, Box<dyn BufRead>)>,
    progress: Option<ProgressFn>,
    report: SourceReport,
    done: bool,
}

impl LineSource {
    /// Source over the given inputs; an empty list means standard input.
    pub fn new(locators: Vec<Locator>) -> Self {
        Self::with_skipped(locators, Vec::new())
    }

    /// Source over the inputs that survived expansion, with the named inputs
    /// that were already dropped (a pattern matching no file, say).
    ///
    /// Standard input is the default only when nothing at all was named. If
    /// everything named was dropped, the source reads nothing.
    pub fn with_skipped(locators: Vec<Locator>, skipped: Vec<(Locator, String)>) -> Self {
        let pending = if locators.is_empty() && skipped.is_empty() {
            VecDeque::from([Locator::Stdin])
        } else {
            locators.into()
        };

        Self {
            pending,
            current: None,
            progress: None,
            report: SourceReport {
                skipped,
                ..SourceReport::default()
            },
            done: false,
        }
    }

    /// Source over an already-open reader, mostly useful in tests.
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        let mut source = Self::new(Vec::new());
        source.pending.clear();
        source.report.opened = 1;
        source.current = Some((
            Locator::Stdin,
            Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, reader)),
        ));
        source
    }

    pub fn with_progress(mut self, callback: ProgressFn) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn report(&self) -> &SourceReport {
        &self.report
    }

    pub fn into_report(self) -> SourceReport {
        self.report
    }

    fn open(&self, locator: &Locator) -> io::Result<Box<dyn BufRead>> {
        let (raw, compression): (Box<dyn Read>, Compression) = match locator {
            Locator::Stdin => (Box::new(io::stdin()), Compression::None),
            Locator::Path(path) => (Box::new(File::open(path)?), Compression::from_path(path)),
        };

        let counted: Box<dyn Read> = match &self.progress {
            Some(cb) => Box::new(ProgressReader::new(raw, cb.clone())),
            None => raw,
        };

        if compression != Compression::None {
            log::debug!("decompressing {} as {}", locator, compression);
        }
        let reader = compression.wrap_reader(counted)?;
        Ok(Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, reader)))
    }

    /// Open the next input that can be opened, skipping the rest.
    fn advance(&mut self) -> bool {
        while let Some(locator) = self.pending.pop_front() {
            match self.open(&locator) {
                Ok(reader) => {
                    log::info!("reading {}", locator);
                    self.report.opened += 1;
                    self.current = Some((locator, reader));
                    return true;
                }
                Err(e) => {
                    log::warn!("skipping {}: {}", locator, e);
                    self.report.skipped.push((locator, e.to_string()));
                }
            }
        }

        if self.report.all_skipped() {
            log::warn!("none of the named inputs could be opened; reading nothing");
        }
        false
    }

    fn finish(&mut self) {
        self.current = None;
        self.pending.clear();
        self.done = true;
    }
}

impl Iterator for LineSource {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.done {
            return None;
        }

        loop {
            if self.current.is_none() && !self.advance() {
                self.finish();
                return None;
            }

            let Some((locator, reader)) = self.current.as_mut() else {
                continue;
            };

            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    self.current = None;
                }
                Ok(n) => {
                    self.report.lines_read += 1;
                    self.report.bytes_read += n as u64;
                    if line.last() == Some(&b'\n') {
                        line.pop();
                    }
                    return Some(line);
                }
                Err(e) => {
                    log::error!("read error on {}: {}", locator, e);
                    self.report.read_error = Some((locator.clone(), e));
                    self.finish();
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_parse() {
        assert_eq!(Locator::parse("-"), Locator::Stdin);
        assert_eq!(
            Locator::parse("data.txt"),
            Locator::Path(PathBuf::from("data.txt"))
        );
    }

    #[test]
    fn test_lines_from_reader() {
        let source = LineSource::from_reader(&b"a\nb\r\nc"[..]);
        let lines: Vec<Vec<u8>> = source.collect();
        assert_eq!(lines, vec![b"a".to_vec(), b"b\r".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn test_empty_lines_are_records() {
        let lines: Vec<Vec<u8>> = LineSource::from_reader(&b"\n\nx\n"[..]).collect();
        assert_eq!(lines, vec![Vec::new(), Vec::new(), b"x".to_vec()]);
    }
}
