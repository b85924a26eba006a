use crate::error::Result;
use std::fs::File;
use std::io::{self, BufWriter, StdoutLock, Write};
use std::path::Path;

/// Writes rendered units, one per line, to a file or the console.
pub struct ContextWriter<W: Write> {
    writer: W,
    written: usize,
}

impl ContextWriter<BufWriter<File>> {
    /// Creates (or truncates) the output file
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::Io` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl ContextWriter<StdoutLock<'static>> {
    pub fn stdout() -> Self {
        Self::new(io::stdout().lock())
    }
}

impl<W: Write> ContextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Writes one unit followed by a newline
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::Io` if the underlying writer fails.
    pub fn write_unit(&mut self, unit: &str) -> Result<()> {
        self.writer.write_all(unit.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Writes an already collected result sequence
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::Io` if the underlying writer fails.
    pub fn write_all<I, S>(&mut self, units: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for unit in units {
            self.write_unit(unit.as_ref())?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GitContextError::Io` if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(Into::into)
    }

    /// Number of units written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
