//! The `TraceWriter` trait implemented by trace backends.

use crate::{BodyStateRow, CorrectionRow, OutputResult};

/// Sink for session traces.
///
/// Errors are stored by the observer and retrieved with
/// [`TraceObserver::take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    /// Write a batch of body-state rows.
    fn write_states(&mut self, rows: &[BodyStateRow]) -> OutputResult<()>;

    /// Write one reconciliation row.
    fn write_correction(&mut self, row: &CorrectionRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
