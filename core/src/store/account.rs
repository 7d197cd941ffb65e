use super::{AccountRow, AssignmentStore, RunTx};
use crate::{
    eligibility::{filter_bucket, DpdBucket},
    error::WorklistResult,
};
use rusqlite::{params, Connection, Row};

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        account_id: row.get(0)?,
        customer_id: row.get(1)?,
        product_type: row.get(2)?,
        outstanding_amount: row.get(3)?,
        days_past_due: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
    })
}

/// All accounts, ascending by account_id. The loop's processing order
/// depends on this ordering.
pub(super) fn accounts_in_order(conn: &Connection) -> WorklistResult<Vec<AccountRow>> {
    let mut stmt = conn.prepare(
        "SELECT account_id, customer_id, product_type, outstanding_amount, days_past_due
         FROM account
         ORDER BY account_id ASC",
    )?;
    let rows = stmt.query_map([], account_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub(super) fn eligible_accounts(conn: &Connection, bucket: DpdBucket) -> WorklistResult<Vec<AccountRow>> {
    Ok(filter_bucket(accounts_in_order(conn)?, bucket))
}

impl AssignmentStore {
    // ── Account ───────────────────────────────────────────────────

    pub fn insert_account(&self, a: &AccountRow) -> WorklistResult<()> {
        self.conn.execute(
            "INSERT INTO account (account_id, customer_id, product_type, outstanding_amount, days_past_due)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![a.account_id, a.customer_id, a.product_type, a.outstanding_amount, a.days_past_due],
        )?;
        Ok(())
    }

    pub fn accounts(&self) -> WorklistResult<Vec<AccountRow>> {
        accounts_in_order(&self.conn)
    }

    pub fn eligible_accounts(&self, bucket: DpdBucket) -> WorklistResult<Vec<AccountRow>> {
        eligible_accounts(&self.conn, bucket)
    }

    pub fn account_count(&self) -> WorklistResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM account", [], |r| r.get(0))?)
    }
}

impl RunTx<'_> {
    pub fn read_eligible_accounts(&self, bucket: DpdBucket) -> WorklistResult<Vec<AccountRow>> {
        eligible_accounts(self.conn(), bucket)
    }
}
