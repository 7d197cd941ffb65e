//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The engine calls store methods — it never executes SQL directly.
//!
//! Every query is written once against `&Connection` so it runs the same
//! on a bare connection and inside a run transaction (`RunTx`).

use crate::{
    config::DEFAULT_BUSY_TIMEOUT_MS,
    error::WorklistResult,
    types::{AccountId, AgentId, KindTag, RunId},
};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod account;
mod agent;
mod assignment;
mod run;

pub struct AssignmentStore {
    conn: Connection,
}

impl AssignmentStore {
    pub fn open(path: &str) -> WorklistResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> WorklistResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> WorklistResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_worklist.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_run_audit.sql"))?;
        Ok(())
    }

    /// How long to wait for another connection's write lock.
    pub fn set_busy_timeout(&self, millis: u64) -> WorklistResult<()> {
        self.conn.busy_timeout(Duration::from_millis(millis))?;
        Ok(())
    }

    /// Run raw SQL. For tooling and fault-injection tests only.
    pub fn execute_batch(&self, sql: &str) -> WorklistResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Start a run transaction.
    ///
    /// IMMEDIATE takes the database write lock up front, so the read
    /// snapshot and the replace of one run never interleave with another
    /// run's. A competing run blocks here until the busy timeout.
    pub fn begin_run(&mut self) -> WorklistResult<RunTx<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(RunTx { tx })
    }
}

/// An open run transaction. Dropping it without `commit` rolls back.
pub struct RunTx<'s> {
    tx: Transaction<'s>,
}

impl RunTx<'_> {
    pub fn commit(self) -> WorklistResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.tx
    }
}

// ── Rows ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    pub account_id: AccountId,
    pub customer_id: Option<String>,
    pub product_type: Option<String>,
    pub outstanding_amount: Option<i64>,
    /// NULL in the table reads as 0.
    pub days_past_due: i64,
}

impl AccountRow {
    pub fn new(account_id: &str, product_type: &str, days_past_due: i64) -> Self {
        Self {
            account_id: account_id.into(),
            customer_id: None,
            product_type: Some(product_type.into()),
            outstanding_amount: None,
            days_past_due,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRow {
    pub agent_id: AgentId,
    pub agent_name: Option<String>,
    /// NULL in the table reads as 0.
    pub capacity: i64,
    pub percentage_a: f64,
    pub percentage_b: f64,
}

impl AgentRow {
    pub fn new(agent_id: &str, capacity: i64, percentage_a: f64, percentage_b: f64) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_name: None,
            capacity,
            percentage_a,
            percentage_b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub id: Option<i64>,
    pub account_id: AccountId,
    pub agent_id: Option<AgentId>,
    pub kind: KindTag,
    pub run_id: RunId,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub kind: KindTag,
    pub bucket_min_dpd: i64,
    pub bucket_max_dpd: i64,
    pub started_at: String,
    pub finished_at: String,
    pub summary_json: String,
    /// Commit order among runs, 1-based.
    pub seq: i64,
}
