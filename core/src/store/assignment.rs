use super::{AssignmentRow, AssignmentStore, RunTx};
use crate::error::WorklistResult;
use rusqlite::{params, Connection};

/// Delete every row of `kind`, then insert `rows` in chunks.
///
/// Must run inside a transaction: the caller's commit or rollback decides
/// whether the replace is visible at all. Chunk boundaries are not.
pub(super) fn replace_assignments(
    conn: &Connection,
    kind: &str,
    rows: &[AssignmentRow],
    chunk_size: usize,
) -> WorklistResult<usize> {
    let deleted = conn.execute("DELETE FROM assignment WHERE kind = ?1", params![kind])?;
    log::debug!("ledger: deleted {deleted} prior '{kind}' assignments");

    let mut stmt = conn.prepare_cached(
        "INSERT INTO assignment (account_id, agent_id, kind, run_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let mut inserted = 0usize;
    for (i, chunk) in rows.chunks(chunk_size.max(1)).enumerate() {
        for row in chunk {
            inserted += stmt.execute(params![
                row.account_id,
                row.agent_id,
                row.kind,
                row.run_id,
                row.created_at,
            ])?;
        }
        log::debug!("ledger: chunk {i} wrote {} rows", chunk.len());
    }
    Ok(inserted)
}

pub(super) fn assignments_for_kind(conn: &Connection, kind: &str) -> WorklistResult<Vec<AssignmentRow>> {
    let mut stmt = conn.prepare(
        "SELECT assignment_id, account_id, agent_id, kind, run_id, created_at
         FROM assignment WHERE kind = ?1
         ORDER BY account_id ASC",
    )?;
    let rows = stmt.query_map(params![kind], |row| {
        Ok(AssignmentRow {
            id: Some(row.get(0)?),
            account_id: row.get(1)?,
            agent_id: row.get(2)?,
            kind: row.get(3)?,
            run_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

impl AssignmentStore {
    // ── Assignment ledger ─────────────────────────────────────────

    /// Standalone replace in its own transaction.
    pub fn replace_assignments(
        &mut self,
        kind: &str,
        rows: &[AssignmentRow],
        chunk_size: usize,
    ) -> WorklistResult<usize> {
        let tx = self.begin_run()?;
        let inserted = tx.replace_assignments(kind, rows, chunk_size)?;
        tx.commit()?;
        Ok(inserted)
    }

    pub fn assignments_for_kind(&self, kind: &str) -> WorklistResult<Vec<AssignmentRow>> {
        assignments_for_kind(&self.conn, kind)
    }

    pub fn assignment_count(&self, kind: &str) -> WorklistResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM assignment WHERE kind = ?1",
            params![kind],
            |r| r.get(0),
        )?)
    }

    /// Rows of `kind` per agent, unassigned rows under `None`.
    pub fn assignment_load_by_agent(&self, kind: &str) -> WorklistResult<Vec<(Option<String>, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT agent_id, COUNT(*) FROM assignment WHERE kind = ?1
             GROUP BY agent_id ORDER BY agent_id ASC",
        )?;
        let rows = stmt.query_map(params![kind], |r| Ok((r.get(0)?, r.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl RunTx<'_> {
    pub fn replace_assignments(
        &self,
        kind: &str,
        rows: &[AssignmentRow],
        chunk_size: usize,
    ) -> WorklistResult<usize> {
        replace_assignments(self.conn(), kind, rows, chunk_size)
    }
}
