//! Record sinks
//!
//! Records are handed to a sink the moment they are extracted; nothing is
//! buffered across rows or pages.

use crate::extract::BookRecord;
use std::io::{self, Write};

/// Destination for extracted book records
pub trait RecordSink {
    /// Emits one record
    fn emit(&mut self, record: &BookRecord) -> io::Result<()>;
}

/// Collects records in memory
impl RecordSink for Vec<BookRecord> {
    fn emit(&mut self, record: &BookRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes one `numRatings|avgRating|title` line per record
///
/// The writer is flushed after every record so a downstream pipe sees each
/// line as soon as its row is parsed.
pub struct LineWriter<W: Write> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    /// Wraps a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for LineWriter<W> {
    fn emit(&mut self, record: &BookRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record)?;
        self.writer.flush()
    }
}
