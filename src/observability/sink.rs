//! Output destinations for encoded records.
//!
//! # Design Decisions
//! - Any `tracing_subscriber` `MakeWriter` can back a sink, so the same
//!   writers used for operational logs (stdout, test writers) work here
//! - One `write_all` per record; a record line is never split across writes

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

/// Destination that receives one encoded JSON line per record.
pub struct Sink {
    make_writer: BoxMakeWriter,
}

impl Sink {
    pub fn new<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            make_writer: BoxMakeWriter::new(make_writer),
        }
    }

    /// The process's standard output stream.
    pub fn stdout() -> Self {
        Self::new(io::stdout)
    }

    pub(crate) fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.make_writer.make_writer().write_all(line)
    }

    pub(crate) fn flush(&self) -> io::Result<()> {
        self.make_writer.make_writer().flush()
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

/// In-memory sink capturing every emitted line.
///
/// Clones share the same buffer, so a clone can be handed to the logger
/// while the original is kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured output split into lines.
    pub fn lines(&self) -> Vec<String> {
        let buffer = match self.buffer.lock() {
            Ok(buffer) => buffer,
            Err(poisoned) => poisoned.into_inner(),
        };
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Captured output parsed as JSON records. Unparseable lines are skipped.
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("memory sink mutex poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemorySink {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl From<MemorySink> for Sink {
    fn from(memory: MemorySink) -> Self {
        Sink::new(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_lines() {
        let memory = MemorySink::new();
        let sink = Sink::from(memory.clone());

        sink.write_line(b"{\"a\":1}\n").unwrap();
        sink.write_line(b"{\"b\":2}\n").unwrap();
        sink.flush().unwrap();

        assert_eq!(memory.lines(), vec!["{\"a\":1}", "{\"b\":2}"]);
        assert_eq!(memory.records()[1]["b"], 2);

        memory.clear();
        assert!(memory.lines().is_empty());
    }
}
