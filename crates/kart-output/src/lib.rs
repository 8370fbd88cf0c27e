//! `kart-output`: session trace writers for the kartnet workspace.
//!
//! | Backend | Files created                             |
//! |---------|-------------------------------------------|
//! | CSV     | `body_states.csv`, `corrections.csv`      |
//!
//! Writers implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `kart_sim::SessionObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kart_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer);
//! session.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{BodyStateRow, CorrectionRow};
pub use writer::TraceWriter;
