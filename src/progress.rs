//! Byte-level progress tracking for input streams.
//!
//! A `ProgressReader` wraps each opened input and reports how many bytes every
//! read produced, so one progress bar can advance across several concatenated
//! inputs.

use std::io::Read;
use std::rc::Rc;

/// Callback receiving the number of bytes produced by one read.
pub type ProgressFn = Rc<dyn Fn(u64)>;

/// A reader wrapper that reports the size of each successful read.
pub struct ProgressReader<R: Read> {
    reader: R,
    callback: ProgressFn,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(reader: R, callback: ProgressFn) -> Self {
        Self { reader, callback }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            (self.callback)(n as u64);
        }
        Ok(n)
    }
}
