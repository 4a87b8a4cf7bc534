//! Integration tests for dt-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(agent_id: u32, tick: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            agent_id,
            tick,
            x: agent_id as f32 * 10.0,
            y: 0.0,
        }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            unix_time_secs: tick as i64 * 3600,
            woken_agents: tick,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("agent_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["agent_id", "tick", "x", "y"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "unix_time_secs", "woken_agents"]);
    }

    #[test]
    fn csv_snapshot_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 3);
        assert_eq!(&read_rows[0][0], "0"); // agent_id
        assert_eq!(&read_rows[0][1], "5"); // tick
        assert_eq!(&read_rows[1][0], "1");
        assert_eq!(&read_rows[2][0], "2");
    }

    #[test]
    fn csv_tick_summary_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let read_rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(read_rows.len(), 1);
        assert_eq!(&read_rows[0][0], "3"); // tick
        assert_eq!(&read_rows[0][1], "10800"); // 3 * 3600
        assert_eq!(&read_rows[0][2], "3"); // woken_agents
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap(); // should return Ok(())
    }

    #[test]
    fn integration_csv() {
        use std::rc::Rc;

        use dt_agent::{Activity, Destination, FrameResult, Role, RoleContext, RoleFactory, SubTrip, TripChain, TripChainItem};
        use dt_core::{AgentId, Point2D, SegmentId, SimConfig, Tick, TransportMode};
        use dt_schedule::{PendingAgent, Placement};
        use dt_sim::SimBuilder;
        use dt_spatial::RoadNetwork;

        use crate::observer::SimOutputObserver;

        struct ThreeTickRole(u32);
        impl Role for ThreeTickRole {
            fn mode(&self) -> TransportMode {
                TransportMode::None
            }
            fn frame_tick(&mut self, _ctx: &RoleContext) -> FrameResult {
                if self.0 == 0 {
                    FrameResult::Done
                } else {
                    self.0 -= 1;
                    FrameResult::Continue
                }
            }
        }
        struct ThreeTickFactory;
        impl RoleFactory for ThreeTickFactory {
            fn create_role(
                &self,
                _agent: AgentId,
                _item: &TripChainItem,
                _sub_trip: Option<&SubTrip>,
                _position: &Rc<dt_buffer::DoubleBuffered<Point2D>>,
            ) -> Box<dyn Role> {
                Box::new(ThreeTickRole(2))
            }
        }

        fn chain() -> TripChain {
            TripChain::new(vec![TripChainItem::Activity(Activity {
                destination: Destination::Home,
                start_tick: Tick::ZERO,
                end_tick: Tick(3),
            })])
        }

        fn agent(id: u32) -> PendingAgent {
            PendingAgent {
                agent_id: AgentId(id),
                start_tick: Tick::ZERO,
                placement: Placement {
                    start_segment: SegmentId(0),
                    start_lane_index: 0,
                    segment_start_offset_m: 0.0,
                    initial_speed_mps: 0.0,
                },
                trip_chain: chain(),
            }
        }

        let config = SimConfig {
            start_unix_secs: 0,
            tick_duration_secs: 3600,
            total_ticks: 6,
            seed: 1,
            num_threads: Some(1),
            output_interval_ticks: 2,
            worker_count: 1,
            tick_step: 1,
            signal_voting_window: 5,
        };

        let sim = SimBuilder::new()
            .config(config.clone())
            .network(RoadNetwork::empty())
            .role_factory(|| Box::new(ThreeTickFactory))
            .agents(vec![agent(0), agent(1), agent(2)])
            .build()
            .unwrap();

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer, &config);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 2 → snapshots fired at ticks 0, 2, 4 (3 ticks × 3 agents = 9 rows)
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 9, "expected 3 ticks × 3 agents = 9 snapshot rows, got {}", rows.len());
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let rows = vec![
            AgentSnapshotRow { agent_id: 0, tick: 1, x: 10.0, y: 0.0 },
            AgentSnapshotRow { agent_id: 1, tick: 1, x: 11.0, y: 1.0 },
            AgentSnapshotRow { agent_id: 2, tick: 1, x: 12.0, y: 2.0 },
        ];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM agent_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_position_stored() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[AgentSnapshotRow { agent_id: 0, tick: 0, x: 5.5, y: 9.25 }])
            .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (x, y): (f64, f64) = conn
            .query_row(
                "SELECT x, y FROM agent_snapshots WHERE agent_id = 0",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(x, 5.5);
        assert_eq!(y, 9.25);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick: 7,
            unix_time_secs: 25_200,
            woken_agents: 42,
        })
        .unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, unix_time, woken): (i64, i64, i64) = conn
            .query_row(
                "SELECT tick, unix_time_secs, woken_agents FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(tick, 7);
        assert_eq!(unix_time, 25_200);
        assert_eq!(woken, 42);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use crate::parquet::ParquetWriter;
    use crate::row::AgentSnapshotRow;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("agent_snapshots.parquet").exists());
        assert!(dir.path().join("tick_summaries.parquet").exists());
    }

    #[test]
    fn parquet_snapshot_round_trip() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        let rows = vec![
            AgentSnapshotRow { agent_id: 0, tick: 2, x: 10.0, y: 0.0 },
            AgentSnapshotRow { agent_id: 1, tick: 2, x: 11.0, y: 1.0 },
        ];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("agent_snapshots.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total_rows, 2, "expected 2 rows");

        let field_names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(field_names, ["agent_id", "tick", "x", "y"]);
    }

    #[test]
    fn parquet_x_column_type() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[AgentSnapshotRow { agent_id: 0, tick: 0, x: 1.0, y: 2.0 }])
            .unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("agent_snapshots.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();

        let x_field = schema.field_with_name("x").unwrap();
        assert_eq!(*x_field.data_type(), DataType::Float32);
    }

    #[test]
    fn parquet_finish_required() {
        // A Parquet file whose writer was NOT closed is invalid (missing footer).
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_snapshots(&[AgentSnapshotRow { agent_id: 0, tick: 0, x: 0.0, y: 0.0 }])
                .unwrap();
            // Drop without calling finish() — ArrowWriter's Drop will NOT write the footer.
        }

        let file = std::fs::File::open(dir.path().join("agent_snapshots.parquet")).unwrap();
        let result = ParquetRecordBatchReaderBuilder::try_new(file);
        assert!(result.is_err(), "file without Parquet footer should fail to open");
    }
}
