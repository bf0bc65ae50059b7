//! Output sinks for sampled and partitioned lines.
//!
//! Every algorithm hands its output to a [`LineSink`] as `(destination, line)`
//! pairs. Single-stream modes only ever use destination 0; split mode addresses
//! one destination per weight.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
pub const LINE_BUFFER_COUNT: usize = 1000;

/// Consumer of `(destination, line)` pairs.
pub trait LineSink {
    /// Write one line to `dest`. A terminator is appended by the sink.
    fn write_line(&mut self, dest: usize, line: &[u8]) -> io::Result<()>;

    /// Flush everything written so far.
    fn finish(&mut self) -> io::Result<()>;
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn write_line(&mut self, dest: usize, line: &[u8]) -> io::Result<()> {
        (**self).write_line(dest, line)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Buffered line writer over any byte stream.
pub struct LineWriter<W: Write> {
    writer: BufWriter<W>,
    write_count: usize,
    max_line_buffer: usize,
    lines_written: u64,
}

impl LineWriter<File> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, inner),
            write_count: 0,
            max_line_buffer: LINE_BUFFER_COUNT,
            lines_written: 0,
        }
    }

    pub fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.writer.write_all(line)?;
        self.writer.write_all(b"\n")?;
        self.lines_written += 1;

        self.write_count += 1;
        if self.write_count >= self.max_line_buffer {
            self.write_count = 0;
            self.writer.flush()?;
        }

        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.write_count = 0;
        self.writer.flush()
    }
}

impl<W: Write> LineSink for LineWriter<W> {
    fn write_line(&mut self, dest: usize, line: &[u8]) -> io::Result<()> {
        if dest != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("single-stream sink has no destination {dest}"),
            ));
        }
        LineWriter::write_line(self, line)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Name of the file holding destination `index` of a split.
pub fn destination_path(base: &Path, index: usize) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!("_{index}"));
    PathBuf::from(name)
}

/// One file per split destination, named `{base}_{index}`.
pub struct WriterPool {
    paths: Vec<PathBuf>,
    writers: Vec<LineWriter<File>>,
}

impl WriterPool {
    /// Create (truncating) all `count` destination files up front.
    pub fn create(base: &Path, count: usize) -> io::Result<Self> {
        let mut paths = Vec::with_capacity(count);
        let mut writers = Vec::with_capacity(count);
        for index in 0..count {
            let path = destination_path(base, index);
            writers.push(LineWriter::create(&path)?);
            log::info!("created {}", path.display());
            paths.push(path);
        }
        Ok(Self { paths, writers })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl LineSink for WriterPool {
    fn write_line(&mut self, dest: usize, line: &[u8]) -> io::Result<()> {
        match self.writers.get_mut(dest) {
            Some(writer) => writer.write_line(line),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("no split destination {dest}"),
            )),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        for writer in self.writers.iter_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Keeps every line in memory, grouped by destination.
#[derive(Debug, Default, Clone)]
pub struct CollectSink {
    destinations: Vec<Vec<Vec<u8>>>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written to `dest`, in write order.
    pub fn lines(&self, dest: usize) -> &[Vec<u8>] {
        self.destinations.get(dest).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.destinations.iter().map(Vec::len).sum()
    }

    pub fn into_destinations(self) -> Vec<Vec<Vec<u8>>> {
        self.destinations
    }
}

impl LineSink for CollectSink {
    fn write_line(&mut self, dest: usize, line: &[u8]) -> io::Result<()> {
        if self.destinations.len() <= dest {
            self.destinations.resize_with(dest + 1, Vec::new);
        }
        self.destinations[dest].push(line.to_vec());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Discards everything; used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LineSink for NullSink {
    fn write_line(&mut self, _dest: usize, _line: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}
