//! Agent capacity model.
//!
//! Turns each agent's configured capacity and product shares into the
//! counters the round-robin loop spends during one run.
//!
//! Product slots are rounded per agent (half away from zero) with no
//! reconciliation against the eligible count. The sum of slots may be above
//! or below the count; surplus slots go unused and a shortfall shows up as
//! unassigned accounts.

use crate::{
    eligibility::ProductCounts,
    store::AgentRow,
    types::{AgentId, Product},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Remaining budget of one agent for the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCounters {
    pub agent_id: AgentId,
    pub remaining_overall: i64,
    pub remaining_a: i64,
    pub remaining_b: i64,
}

impl AgentCounters {
    pub fn from_agent(agent: &AgentRow, counts: &ProductCounts) -> Self {
        Self {
            agent_id: agent.agent_id.clone(),
            remaining_overall: agent.capacity,
            remaining_a: product_slots(agent.percentage_a, counts.a),
            remaining_b: product_slots(agent.percentage_b, counts.b),
        }
    }

    pub fn remaining(&self, product: Product) -> i64 {
        match product {
            Product::A => self.remaining_a,
            Product::B => self.remaining_b,
        }
    }

    /// Spend one unit of overall capacity and one slot of `product`.
    /// Returns the product counter after the decrement.
    pub fn consume(&mut self, product: Product) -> i64 {
        self.remaining_overall -= 1;
        let slot = match product {
            Product::A => &mut self.remaining_a,
            Product::B => &mut self.remaining_b,
        };
        *slot -= 1;
        *slot
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_overall <= 0
    }
}

/// `round(share * count)`, never negative.
pub fn product_slots(share: f64, count: usize) -> i64 {
    if !share.is_finite() || share <= 0.0 {
        return 0;
    }
    (share * count as f64).round() as i64
}

/// Registry of counters for one run, one canonical entry per agent.
///
/// Agents are addressed by a dense slot index so the product queues can keep
/// per-agent presence state in plain vectors.
#[derive(Debug, Clone, Default)]
pub struct CapacityRegistry {
    counters: Vec<AgentCounters>,
    /// Configured (share_a, share_b) per slot.
    shares: Vec<(f64, f64)>,
    slots: HashMap<AgentId, usize>,
}

impl CapacityRegistry {
    /// Build counters for `agents` in the order given (ascending agent_id).
    pub fn build(agents: &[AgentRow], counts: &ProductCounts) -> Self {
        let mut registry = Self::default();
        for agent in agents {
            registry.insert(
                AgentCounters::from_agent(agent, counts),
                (agent.percentage_a, agent.percentage_b),
            );
        }
        registry
    }

    fn insert(&mut self, counters: AgentCounters, shares: (f64, f64)) {
        if let Some(&slot) = self.slots.get(&counters.agent_id) {
            // Duplicate rows for one agent: last row wins, queue position kept.
            log::warn!("capacity: duplicate agent row for {}", counters.agent_id);
            self.counters[slot] = counters;
            self.shares[slot] = shares;
            return;
        }
        self.slots.insert(counters.agent_id.clone(), self.counters.len());
        self.counters.push(counters);
        self.shares.push(shares);
    }

    /// Configured share of `product` for the agent in `slot`.
    pub fn share(&self, slot: usize, product: Product) -> f64 {
        match (self.shares.get(slot), product) {
            (Some((a, _)), Product::A) => *a,
            (Some((_, b)), Product::B) => *b,
            (None, _) => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn get(&self, slot: usize) -> &AgentCounters {
        &self.counters[slot]
    }

    pub fn get_mut(&mut self, slot: usize) -> &mut AgentCounters {
        &mut self.counters[slot]
    }

    pub fn by_id(&self, agent_id: &str) -> Option<&AgentCounters> {
        self.slots.get(agent_id).map(|&slot| &self.counters[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &AgentCounters)> {
        self.counters.iter().enumerate()
    }

    /// Total product slots handed out across all agents.
    pub fn total_slots(&self, product: Product) -> i64 {
        self.counters.iter().map(|c| c.remaining(product)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, capacity: i64, a: f64, b: f64) -> AgentRow {
        AgentRow {
            agent_id: id.into(),
            agent_name: None,
            capacity,
            percentage_a: a,
            percentage_b: b,
        }
    }

    #[test]
    fn slots_round_half_away_from_zero() {
        assert_eq!(product_slots(0.25, 10), 3); // 2.5
        assert_eq!(product_slots(0.24, 10), 2); // 2.4
        assert_eq!(product_slots(0.5, 5), 3); // 2.5
        assert_eq!(product_slots(0.0, 10), 0);
        assert_eq!(product_slots(1.0, 0), 0);
    }

    #[test]
    fn negative_or_nan_share_gives_no_slots() {
        assert_eq!(product_slots(-0.5, 10), 0);
        assert_eq!(product_slots(f64::NAN, 10), 0);
    }

    #[test]
    fn counters_follow_capacity_and_shares() {
        let counts = ProductCounts { a: 10, b: 4, unknown: 0 };
        let c = AgentCounters::from_agent(&agent("oa-1", 7, 0.5, 0.25), &counts);
        assert_eq!(c.remaining_overall, 7);
        assert_eq!(c.remaining_a, 5);
        assert_eq!(c.remaining_b, 1);
    }

    #[test]
    fn consume_touches_only_the_matching_product() {
        let counts = ProductCounts { a: 10, b: 10, unknown: 0 };
        let mut c = AgentCounters::from_agent(&agent("oa-1", 3, 0.2, 0.3), &counts);
        assert_eq!(c.consume(Product::B), 2);
        assert_eq!(c.remaining_overall, 2);
        assert_eq!(c.remaining_a, 2);
    }

    #[test]
    fn drift_is_not_reconciled() {
        // Three agents at 0.5 of 3 accounts: 2 + 2 + 2 = 6 slots for 3 accounts.
        let counts = ProductCounts { a: 3, b: 0, unknown: 0 };
        let agents = vec![agent("oa-1", 5, 0.5, 0.0), agent("oa-2", 5, 0.5, 0.0), agent("oa-3", 5, 0.5, 0.0)];
        let registry = CapacityRegistry::build(&agents, &counts);
        assert_eq!(registry.total_slots(Product::A), 6);
        assert_eq!(registry.total_slots(Product::B), 0);
    }

    #[test]
    fn registry_resolves_agents_by_id() {
        let counts = ProductCounts::default();
        let agents = vec![agent("oa-1", 1, 0.0, 0.0), agent("oa-2", 2, 0.0, 0.0)];
        let registry = CapacityRegistry::build(&agents, &counts);
        assert!(registry.by_id("oa-9").is_none());
        assert_eq!(registry.by_id("oa-2").unwrap().remaining_overall, 2);
    }
}
