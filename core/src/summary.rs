//! Run summary — the outcome of one run, stored as JSON on the run record.

use crate::{eligibility::ProductCounts, types::{AgentId, Product}};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub eligible: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub counts: ProductCounts,
    pub unassigned_by_product: UnassignedBreakdown,
    /// Product slots handed out before the loop started.
    pub slots_a: i64,
    pub slots_b: i64,
    /// Agents that used up their overall capacity during the run.
    pub retired_agents: usize,
    pub agent_loads: BTreeMap<AgentId, AgentLoad>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedBreakdown {
    pub a: usize,
    pub b: usize,
    pub unknown: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLoad {
    pub a: usize,
    pub b: usize,
}

impl AgentLoad {
    pub fn total(&self) -> usize {
        self.a + self.b
    }

    pub fn get(&self, product: Product) -> usize {
        match product {
            Product::A => self.a,
            Product::B => self.b,
        }
    }
}

impl RunSummary {
    /// Slots minus eligible accounts. Positive means over-allocation.
    pub fn drift(&self, product: Product) -> i64 {
        let slots = match product {
            Product::A => self.slots_a,
            Product::B => self.slots_b,
        };
        slots - self.counts.get(product) as i64
    }

    pub(crate) fn record_assigned(&mut self, agent_id: &str, product: Product) {
        self.assigned += 1;
        let load = self.agent_loads.entry(agent_id.to_string()).or_default();
        match product {
            Product::A => load.a += 1,
            Product::B => load.b += 1,
        }
    }

    pub(crate) fn record_unassigned(&mut self, product: Option<Product>) {
        self.unassigned += 1;
        match product {
            Some(Product::A) => self.unassigned_by_product.a += 1,
            Some(Product::B) => self.unassigned_by_product.b += 1,
            None => self.unassigned_by_product.unknown += 1,
        }
    }
}
