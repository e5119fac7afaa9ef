use std::io::Write;

use crate::types::LegislatorRecord;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Downstream persistence boundary. One call per finished legislator.
pub trait RecordSink {
    fn save(&mut self, record: LegislatorRecord) -> Result<(), SinkError>;
}

/// Writes one JSON object per line, flushing after each record.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn save(&mut self, record: LegislatorRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<LegislatorRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LegislatorRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LegislatorRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn save(&mut self, record: LegislatorRecord) -> Result<(), SinkError> {
        self.records.push(record);
        Ok(())
    }
}
