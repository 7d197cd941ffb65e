//! Synthetic portfolio generator.
//!
//! Builds a reproducible set of agents and accounts for demo stores and
//! property tests. Shares are drawn in tenths so the capacity model sees
//! realistic rounding drift.

use crate::{
    config::EngineConfig,
    error::WorklistResult,
    rng::{PortfolioRng, Stream},
    store::{AccountRow, AgentRow, AssignmentStore},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSpec {
    pub seed: u64,
    pub agents: usize,
    pub accounts: usize,
    pub max_capacity: i64,
    /// Probability that an agent handles a product at all.
    pub product_coverage: f64,
    /// Probability that an account carries an unrecognised product code.
    pub unknown_product_rate: f64,
    pub max_dpd: i64,
}

impl Default for PortfolioSpec {
    fn default() -> Self {
        Self {
            seed: 42,
            agents: 8,
            accounts: 200,
            max_capacity: 40,
            product_coverage: 0.75,
            unknown_product_rate: 0.02,
            max_dpd: 90,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Portfolio {
    pub agents: Vec<AgentRow>,
    pub accounts: Vec<AccountRow>,
}

impl Portfolio {
    /// Same spec → same portfolio. Both lists come out ascending by id.
    pub fn generate(spec: &PortfolioSpec, config: &EngineConfig) -> Self {
        let mut agent_rng = PortfolioRng::new(spec.seed, Stream::Agents);
        let agents = (0..spec.agents)
            .map(|i| {
                let share_a = draw_share(&mut agent_rng, spec.product_coverage);
                let share_b = draw_share(&mut agent_rng, spec.product_coverage);
                AgentRow {
                    agent_id: format!("oa-{i:04}"),
                    agent_name: Some(format!("Field agent {}", i + 1)),
                    capacity: agent_rng.range_inclusive(0, spec.max_capacity.max(0)),
                    percentage_a: share_a,
                    percentage_b: share_b,
                }
            })
            .collect();

        let mut account_rng = PortfolioRng::new(spec.seed, Stream::Accounts);
        let accounts = (0..spec.accounts)
            .map(|i| {
                let product = if account_rng.chance(spec.unknown_product_rate) {
                    "HP".to_string()
                } else if account_rng.chance(0.5) {
                    config.product_a_code.clone()
                } else {
                    config.product_b_code.clone()
                };
                AccountRow {
                    account_id: format!("acc-{i:06}"),
                    customer_id: Some(format!("cust-{:06}", account_rng.next_u64_below(1_000_000))),
                    product_type: Some(product),
                    outstanding_amount: Some(account_rng.range_inclusive(1_000, 500_000)),
                    days_past_due: account_rng.range_inclusive(0, spec.max_dpd.max(0)),
                }
            })
            .collect();

        Self { agents, accounts }
    }

    pub fn insert_into(&self, store: &AssignmentStore) -> WorklistResult<()> {
        for agent in &self.agents {
            store.insert_agent(agent)?;
        }
        for account in &self.accounts {
            store.insert_account(account)?;
        }
        log::info!(
            "portfolio: seeded {} agents and {} accounts",
            self.agents.len(),
            self.accounts.len()
        );
        Ok(())
    }
}

/// 0.0 with probability `1 - coverage`, otherwise a tenth in [0.1, 1.0].
fn draw_share(rng: &mut PortfolioRng, coverage: f64) -> f64 {
    if !rng.chance(coverage) {
        return 0.0;
    }
    rng.range_inclusive(1, 10) as f64 / 10.0
}
