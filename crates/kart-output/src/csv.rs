//! CSV trace backend.
//!
//! Creates two files in the configured output directory:
//! - `body_states.csv`
//! - `corrections.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{BodyStateRow, CorrectionRow, OutputResult};

/// Writes session traces to two CSV files.
pub struct CsvTraceWriter {
    states:      Writer<File>,
    corrections: Writer<File>,
    finished:    bool,
}

impl CsvTraceWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut states = Writer::from_path(dir.join("body_states.csv"))?;
        states.write_record([
            "tick", "participant", "body", "role", "x", "y", "z", "yaw", "speed", "queue_len",
        ])?;

        let mut corrections = Writer::from_path(dir.join("corrections.csv"))?;
        corrections.write_record(["tick", "participant", "body", "pruned", "replayed", "correction"])?;

        Ok(Self {
            states,
            corrections,
            finished: false,
        })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_states(&mut self, rows: &[BodyStateRow]) -> OutputResult<()> {
        for row in rows {
            self.states.write_record(&[
                row.tick.to_string(),
                row.participant.to_string(),
                row.body.to_string(),
                row.role.as_str().to_owned(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.yaw.to_string(),
                row.speed.to_string(),
                row.queue_len.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_correction(&mut self, row: &CorrectionRow) -> OutputResult<()> {
        self.corrections.write_record(&[
            row.tick.to_string(),
            row.participant.to_string(),
            row.body.to_string(),
            row.pruned.to_string(),
            row.replayed.to_string(),
            row.correction.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.states.flush()?;
        self.corrections.flush()?;
        Ok(())
    }
}
