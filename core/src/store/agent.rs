use super::{AgentRow, AssignmentStore, RunTx};
use crate::error::WorklistResult;
use rusqlite::{params, Connection};

/// All agents, ascending by agent_id. Seeds the queue order.
pub(super) fn agents_in_order(conn: &Connection) -> WorklistResult<Vec<AgentRow>> {
    let mut stmt = conn.prepare(
        "SELECT agent_id, agent_name, capacity, share_a, share_b
         FROM agent
         ORDER BY agent_id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(AgentRow {
            agent_id: row.get(0)?,
            agent_name: row.get(1)?,
            capacity: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            percentage_a: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            percentage_b: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

impl AssignmentStore {
    // ── Agent ─────────────────────────────────────────────────────

    pub fn insert_agent(&self, a: &AgentRow) -> WorklistResult<()> {
        self.conn.execute(
            "INSERT INTO agent (agent_id, agent_name, capacity, share_a, share_b)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![a.agent_id, a.agent_name, a.capacity, a.percentage_a, a.percentage_b],
        )?;
        Ok(())
    }

    pub fn agents(&self) -> WorklistResult<Vec<AgentRow>> {
        agents_in_order(&self.conn)
    }

    pub fn update_agent_capacity(&self, agent_id: &str, capacity: i64) -> WorklistResult<()> {
        self.conn.execute(
            "UPDATE agent SET capacity = ?1 WHERE agent_id = ?2",
            params![capacity, agent_id],
        )?;
        Ok(())
    }
}

impl RunTx<'_> {
    pub fn read_agents(&self) -> WorklistResult<Vec<AgentRow>> {
        agents_in_order(self.conn())
    }
}
