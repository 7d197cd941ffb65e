use super::{AssignmentStore, RunRecord, RunTx};
use crate::{
    error::WorklistResult,
    event::{AssignmentEvent, EventLogEntry},
};
use rusqlite::{params, Connection, OptionalExtension};

fn insert_run(conn: &Connection, run: &RunRecord) -> WorklistResult<i64> {
    let seq: i64 = conn.query_row(
        "SELECT COALESCE(MAX(seq), 0) + 1 FROM assignment_run",
        [],
        |r| r.get(0),
    )?;
    conn.execute(
        "INSERT INTO assignment_run (
            run_id, kind, bucket_min_dpd, bucket_max_dpd,
            started_at, finished_at, summary_json, seq
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            run.run_id,
            run.kind,
            run.bucket_min_dpd,
            run.bucket_max_dpd,
            run.started_at,
            run.finished_at,
            run.summary_json,
            seq,
        ],
    )?;
    Ok(seq)
}

fn append_events(conn: &Connection, run_id: &str, events: &[AssignmentEvent]) -> WorklistResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO event_log (run_id, seq, event_type, payload) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (seq, event) in events.iter().enumerate() {
        let payload = serde_json::to_string(event)?;
        stmt.execute(params![run_id, seq as i64, event.type_name(), payload])?;
    }
    Ok(())
}

impl AssignmentStore {
    // ── Run audit ─────────────────────────────────────────────────

    /// The most recently committed run of `kind`.
    pub fn latest_run(&self, kind: &str) -> WorklistResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT run_id, kind, bucket_min_dpd, bucket_max_dpd,
                        started_at, finished_at, summary_json, seq
                 FROM assignment_run WHERE kind = ?1
                 ORDER BY seq DESC LIMIT 1",
                params![kind],
                |r| {
                    Ok(RunRecord {
                        run_id: r.get(0)?,
                        kind: r.get(1)?,
                        bucket_min_dpd: r.get(2)?,
                        bucket_max_dpd: r.get(3)?,
                        started_at: r.get(4)?,
                        finished_at: r.get(5)?,
                        summary_json: r.get(6)?,
                        seq: r.get(7)?,
                    })
                },
            )
            .optional()?;
        Ok(run)
    }

    pub fn run_count(&self, kind: &str) -> WorklistResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM assignment_run WHERE kind = ?1",
            params![kind],
            |r| r.get(0),
        )?)
    }

    pub fn events_for_run(&self, run_id: &str) -> WorklistResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, seq, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY seq ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    run_id: row.get(1)?,
                    seq: row.get::<_, i64>(2)? as u64,
                    event_type: row.get(3)?,
                    payload: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

impl RunTx<'_> {
    /// Record the run and its decision log. Returns the run's commit order.
    pub fn record_run(&self, run: &RunRecord, events: &[AssignmentEvent]) -> WorklistResult<i64> {
        append_events(self.conn(), &run.run_id, events)?;
        insert_run(self.conn(), run)
    }
}
