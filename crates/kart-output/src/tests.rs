//! Integration tests for kart-output.

#[cfg(test)]
mod csv_tests {
    use kart_core::NetRole;
    use tempfile::TempDir;

    use crate::csv::CsvTraceWriter;
    use crate::row::{BodyStateRow, CorrectionRow};
    use crate::writer::TraceWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn state_row(participant: u32, tick: u64) -> BodyStateRow {
        BodyStateRow {
            tick,
            participant,
            body:      0,
            role:      NetRole::SimulatedProxy,
            x:         1.5,
            y:         -2.0,
            z:         0.0,
            yaw:       0.25,
            speed:     10.0,
            queue_len: 0,
        }
    }

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvTraceWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("body_states.csv").exists());
        assert!(dir.path().join("corrections.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(
            headers(dir.path().join("body_states.csv")),
            ["tick", "participant", "body", "role", "x", "y", "z", "yaw", "speed", "queue_len"]
        );
        assert_eq!(
            headers(dir.path().join("corrections.csv")),
            ["tick", "participant", "body", "pruned", "replayed", "correction"]
        );
    }

    #[test]
    fn csv_state_rows_written() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.write_states(&[state_row(0, 5), state_row(1, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("body_states.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");         // tick
        assert_eq!(&rows[1][1], "1");         // participant
        assert_eq!(&rows[0][3], "simulated"); // role label
        assert_eq!(&rows[0][4], "1.5");       // x
    }

    #[test]
    fn csv_correction_row_written() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.write_correction(&CorrectionRow {
            tick:        9,
            participant: 2,
            body:        1,
            pruned:      3,
            replayed:    4,
            correction:  0.5,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("corrections.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["9", "2", "1", "3", "4", "0.5"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tmp();
        assert!(CsvTraceWriter::new(&dir.path().join("nope")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use std::io;

    use kart_motion::OpenGround;
    use kart_sim::{ConstantInput, LinkConfig, SessionBuilder, SessionConfig};

    use crate::row::{BodyStateRow, CorrectionRow};
    use crate::{CsvTraceWriter, OutputError, OutputResult, TraceObserver, TraceWriter};

    fn lan(total_ticks: u64, snapshot_interval_ticks: u64) -> SessionConfig {
        SessionConfig {
            total_ticks,
            snapshot_interval_ticks,
            broadcast_rate_hz: 60.0,
            link: LinkConfig { latency_secs: 0.0, jitter_secs: 0.0, loss: 0.0 },
            ..SessionConfig::default()
        }
    }

    /// In-memory writer for inspecting what the observer produced.
    #[derive(Default)]
    struct Collect {
        states:      Vec<BodyStateRow>,
        corrections: Vec<CorrectionRow>,
        finished:    u32,
    }

    impl TraceWriter for Collect {
        fn write_states(&mut self, rows: &[BodyStateRow]) -> OutputResult<()> {
            self.states.extend_from_slice(rows);
            Ok(())
        }

        fn write_correction(&mut self, row: &CorrectionRow) -> OutputResult<()> {
            self.corrections.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Fails every write.
    struct Broken;

    impl TraceWriter for Broken {
        fn write_states(&mut self, _rows: &[BodyStateRow]) -> OutputResult<()> {
            Err(io::Error::other("disk full").into())
        }

        fn write_correction(&mut self, _row: &CorrectionRow) -> OutputResult<()> {
            Err(io::Error::other("disk full").into())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn snapshots_and_corrections_recorded() {
        let mut session = SessionBuilder::new(lan(20, 10), OpenGround, ConstantInput::full_throttle())
            .clients(2)
            .build()
            .unwrap();
        let mut obs = TraceObserver::new(Collect::default());
        session.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let out = obs.into_writer();
        // Two snapshots × two bodies × three participants.
        assert_eq!(out.states.len(), 12);
        assert_eq!(out.finished, 1);
        assert!(!out.corrections.is_empty());
        assert!(out.corrections.iter().all(|c| c.participant != 0));

        let authority_rows = out.states.iter().filter(|r| r.participant == 0).count();
        assert_eq!(authority_rows, 4);
    }

    #[test]
    fn first_error_kept() {
        let mut session = SessionBuilder::new(lan(5, 1), OpenGround, ConstantInput::full_throttle())
            .build()
            .unwrap();
        let mut obs = TraceObserver::new(Broken);
        session.run(&mut obs).unwrap();
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn integration_csv() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = SessionBuilder::new(lan(30, 5), OpenGround, ConstantInput::full_throttle())
            .clients(1)
            .build()
            .unwrap();
        let mut obs = TraceObserver::new(CsvTraceWriter::new(dir.path()).unwrap());
        session.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("body_states.csv")).unwrap();
        // 6 snapshots × 1 body × 2 participants.
        assert_eq!(rdr.records().count(), 12);
    }
}
