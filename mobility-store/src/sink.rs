//! JSON-Lines Record Sink
//!
//! One record per line, tagged by kind:
//!
//! ```text
//! {"type":"episode","state":"STILL","start":0,"end":120000}
//! {"type":"step","time":1830000000,"total_steps":1}
//! {"type":"step_summary","start":120000,"end":150000,"steps":42}
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use log::error;
use mobility_core::{Record, RecordSink};

use crate::error::StoreResult;

/// Writes each record as one JSON line
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
    failed: usize,
}

impl JsonLinesSink<BufWriter<File>> {
    /// Append to `path`, creating it if needed
    pub fn append(path: impl AsRef<Path>) -> StoreResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failed: 0,
        }
    }

    /// Serialize one record and terminate the line
    pub fn write_record(&mut self, record: &Record) -> StoreResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> StoreResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Records written successfully
    pub fn written(&self) -> usize {
        self.written
    }

    /// Records lost to write errors
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn record(&mut self, record: Record) {
        let result = self.write_record(&record).and_then(|_| match record {
            // episodes and summaries are rare and worth making durable at once
            Record::Step(_) => Ok(()),
            _ => self.flush(),
        });

        if let Err(e) = result {
            self.failed += 1;
            error!("dropping {} record: {}", record.kind(), e);
        }
    }
}

/// Parse a JSON-lines stream back into records, skipping blank lines
pub fn read_records<R: BufRead>(reader: R) -> StoreResult<Vec<Record>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobility_core::{Episode, MobilityState, StepEvent, StepSummary};
    use std::io;

    #[test]
    fn records_are_tagged_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.record(Record::Episode(Episode { state: MobilityState::Still, start: 0, end: 120_000 }));
        sink.record(Record::Step(StepEvent { time: 1_830_000_000, total_steps: 1 }));
        sink.record(Record::StepSummary(StepSummary { start: 120_000, end: 150_000, steps: 42 }));
        assert_eq!(sink.written(), 3);

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"type":"episode","state":"STILL","start":0,"end":120000}"#);
        assert_eq!(lines[1], r#"{"type":"step","time":1830000000,"total_steps":1}"#);
        assert_eq!(lines[2], r#"{"type":"step_summary","start":120000,"end":150000,"steps":42}"#);
    }

    #[test]
    fn lines_read_back() {
        let input = "\n{\"type\":\"episode\",\"state\":\"VEHICLE\",\"start\":5,\"end\":9}\n\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![Record::Episode(Episode { state: MobilityState::Vehicle, start: 5, end: 9 })]
        );
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_are_counted() {
        let mut sink = JsonLinesSink::new(Broken);
        sink.record(Record::Step(StepEvent { time: 0, total_steps: 1 }));
        assert_eq!(sink.written(), 0);
        assert_eq!(sink.failed(), 1);
    }
}
