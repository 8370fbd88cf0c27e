//! `TraceObserver<W>`: bridges `SessionObserver` to a `TraceWriter`.

use kart_core::{BodyId, ParticipantId, Tick};
use kart_replicate::Reconciliation;
use kart_sim::{ParticipantView, SessionObserver, SessionStats};
use tracing::warn;

use crate::row::{BodyStateRow, CorrectionRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`SessionObserver`] that writes body states and corrections to any
/// [`TraceWriter`] backend.
///
/// Errors from the writer are stored internally because `SessionObserver`
/// methods have no return value.  After `session.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `session.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "trace write failed; further output may be incomplete");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> SessionObserver for TraceObserver<W> {
    fn on_snapshot(&mut self, tick: Tick, views: &[ParticipantView]) {
        // Unspawned copies have nothing to record.
        let rows: Vec<BodyStateRow> = views
            .iter()
            .filter_map(|v| {
                let state = v.state?;
                let p = state.transform.position;
                Some(BodyStateRow {
                    tick:        tick.0,
                    participant: v.participant.0,
                    body:        v.body.0,
                    role:        v.net_role,
                    x:           p.x,
                    y:           p.y,
                    z:           p.z,
                    yaw:         state.transform.yaw,
                    speed:       state.speed(),
                    queue_len:   v.queue_len as u32,
                })
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_states(&rows);
            self.store_err(result);
        }
    }

    fn on_correction(
        &mut self,
        tick:        Tick,
        participant: ParticipantId,
        body:        BodyId,
        outcome:     &Reconciliation,
    ) {
        let row = CorrectionRow {
            tick:        tick.0,
            participant: participant.0,
            body:        body.0,
            pruned:      outcome.pruned as u32,
            replayed:    outcome.replayed as u32,
            correction:  outcome.correction,
        };
        let result = self.writer.write_correction(&row);
        self.store_err(result);
    }

    fn on_session_end(&mut self, _final_tick: Tick, _stats: &SessionStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
