//! Capacity-constrained round-robin assignment.
//!
//! For each eligible account, in order:
//!   1. pick the queue of the account's product; unknown product or empty
//!      queue → the account stays unassigned
//!   2. pop the head agent and assign it
//!   3. spend one unit of overall capacity and one product slot
//!   4. overall capacity gone → drop the agent from BOTH queues;
//!      product slots left → back to the tail of the same queue;
//!      otherwise → not re-queued here, other queue untouched
//!
//! FIFO position is the only tie-break. One iteration per account, no
//! failure paths: starvation is an outcome, not an error.

use crate::{
    capacity::{AgentCounters, CapacityRegistry},
    config::EngineConfig,
    eligibility::ProductCounts,
    event::{AssignmentEvent, UnassignedReason},
    queue::QueuePair,
    store::{AccountRow, AgentRow},
    summary::RunSummary,
    types::{AccountId, AgentId, Product},
};
use serde::{Deserialize, Serialize};

/// One placement decision. `agent_id == None` means unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub account_id: AccountId,
    pub agent_id: Option<AgentId>,
    pub product: Option<Product>,
}

/// Everything one pass of the loop produced.
#[derive(Debug, Clone)]
pub struct AssignmentPlan {
    pub assignments: Vec<Assignment>,
    pub events: Vec<AssignmentEvent>,
    pub summary: RunSummary,
}

/// Mutable state of one run: the counter registry and the two queues.
pub struct RoundRobin<'c> {
    config: &'c EngineConfig,
    registry: CapacityRegistry,
    queues: QueuePair,
    events: Vec<AssignmentEvent>,
    summary: RunSummary,
}

impl<'c> RoundRobin<'c> {
    /// `agents` must be ascending by agent_id; that order seeds both queues.
    pub fn new(config: &'c EngineConfig, agents: &[AgentRow], counts: ProductCounts) -> Self {
        let registry = CapacityRegistry::build(agents, &counts);
        let queues = QueuePair::initial(&registry);
        let summary = RunSummary {
            counts,
            slots_a: registry.total_slots(Product::A),
            slots_b: registry.total_slots(Product::B),
            ..RunSummary::default()
        };
        Self {
            config,
            registry,
            queues,
            events: Vec::new(),
            summary,
        }
    }

    /// Place one account.
    pub fn assign_next(&mut self, account: &AccountRow) -> Assignment {
        self.summary.eligible += 1;

        let Some(product) = self.config.product_for(account.product_type.as_deref()) else {
            log::warn!(
                "round_robin: account {} has unknown product {:?}",
                account.account_id,
                account.product_type
            );
            return self.unassigned(account, None, UnassignedReason::UnknownProduct);
        };

        let Some(slot) = self.queues.get_mut(product).pop_front() else {
            return self.unassigned(account, Some(product), UnassignedReason::NoAgentAvailable);
        };

        let counters = self.registry.get_mut(slot);
        let product_left = counters.consume(product);
        let agent_id = counters.agent_id.clone();
        let remaining_overall = counters.remaining_overall;

        self.summary.record_assigned(&agent_id, product);
        self.events.push(AssignmentEvent::AccountAssigned {
            account_id: account.account_id.clone(),
            agent_id: agent_id.clone(),
            product,
        });

        if remaining_overall <= 0 {
            self.queues.remove_everywhere(slot);
            self.summary.retired_agents += 1;
            log::debug!("round_robin: agent {agent_id} retired after {}", account.account_id);
            self.events.push(AssignmentEvent::AgentRetired {
                agent_id: agent_id.clone(),
                last_account_id: account.account_id.clone(),
            });
        } else if product_left > 0 {
            self.queues.get_mut(product).push_back(slot);
        } else {
            self.events.push(AssignmentEvent::AgentSlotsExhausted {
                agent_id: agent_id.clone(),
                product,
                remaining_overall,
            });
        }

        Assignment {
            account_id: account.account_id.clone(),
            agent_id: Some(agent_id),
            product: Some(product),
        }
    }

    fn unassigned(
        &mut self,
        account: &AccountRow,
        product: Option<Product>,
        reason: UnassignedReason,
    ) -> Assignment {
        self.summary.record_unassigned(product);
        self.events.push(AssignmentEvent::AccountUnassigned {
            account_id: account.account_id.clone(),
            product,
            reason,
        });
        Assignment {
            account_id: account.account_id.clone(),
            agent_id: None,
            product,
        }
    }

    /// Agent ids currently queued for `product`, head first.
    pub fn queued_agents(&self, product: Product) -> Vec<AgentId> {
        self.queues
            .get(product)
            .snapshot()
            .into_iter()
            .map(|slot| self.registry.get(slot).agent_id.clone())
            .collect()
    }

    pub fn counters(&self, agent_id: &str) -> Option<&AgentCounters> {
        self.registry.by_id(agent_id)
    }

    pub fn finish(self, assignments: Vec<Assignment>) -> AssignmentPlan {
        AssignmentPlan {
            assignments,
            events: self.events,
            summary: self.summary,
        }
    }
}

/// Run the loop over an already filtered account list.
pub fn plan(config: &EngineConfig, eligible: &[AccountRow], agents: &[AgentRow]) -> AssignmentPlan {
    let counts = ProductCounts::tally(eligible, config);
    let mut rr = RoundRobin::new(config, agents, counts);
    let assignments = eligible.iter().map(|account| rr.assign_next(account)).collect();
    rr.finish(assignments)
}
