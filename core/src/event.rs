//! Decision log of one assignment run.
//!
//! The round-robin loop records one event per decision. The engine
//! persists them with the run so a worklist can be explained afterwards.

use crate::types::{AccountId, AgentId, Product, RunId};
use serde::{Deserialize, Serialize};

/// Variants are appended only — stored payloads must stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssignmentEvent {
    AccountAssigned {
        account_id: AccountId,
        agent_id: AgentId,
        product: Product,
    },
    AccountUnassigned {
        account_id: AccountId,
        product: Option<Product>,
        reason: UnassignedReason,
    },
    /// Overall capacity hit zero; the agent left both queues.
    AgentRetired {
        agent_id: AgentId,
        last_account_id: AccountId,
    },
    /// Product slots hit zero with overall capacity left; the agent is not
    /// re-queued for this product.
    AgentSlotsExhausted {
        agent_id: AgentId,
        product: Product,
        remaining_overall: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedReason {
    /// Product code matched neither configured lane.
    UnknownProduct,
    /// The product queue was empty when the account came up.
    NoAgentAvailable,
}

impl AssignmentEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AccountAssigned { .. } => "account_assigned",
            Self::AccountUnassigned { .. } => "account_unassigned",
            Self::AgentRetired { .. } => "agent_retired",
            Self::AgentSlotsExhausted { .. } => "agent_slots_exhausted",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub seq: u64,
    pub event_type: String,
    pub payload: String, // JSON-serialized AssignmentEvent
}
