//! Eligible-account filter.
//!
//! Selects the accounts one run must place. Output order is input order:
//! the store returns accounts ascending by account_id and that order is the
//! processing order of the round-robin loop.

use crate::{config::EngineConfig, store::AccountRow, types::Product};
use serde::{Deserialize, Serialize};

/// Inclusive days-past-due range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpdBucket {
    pub min_dpd: i64,
    pub max_dpd: i64,
}

impl DpdBucket {
    pub fn new(min_dpd: i64, max_dpd: i64) -> Self {
        Self { min_dpd, max_dpd }
    }

    pub fn contains(&self, days_past_due: i64) -> bool {
        days_past_due >= self.min_dpd && days_past_due <= self.max_dpd
    }
}

/// Keep the accounts whose days-past-due falls inside `bucket`.
pub fn filter_bucket(accounts: Vec<AccountRow>, bucket: DpdBucket) -> Vec<AccountRow> {
    accounts
        .into_iter()
        .filter(|a| bucket.contains(a.days_past_due))
        .collect()
}

/// Per-lane account counts of one eligible set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCounts {
    pub a: usize,
    pub b: usize,
    /// Accounts whose product code matches neither lane.
    pub unknown: usize,
}

impl ProductCounts {
    pub fn tally(accounts: &[AccountRow], config: &EngineConfig) -> Self {
        let mut counts = Self::default();
        for account in accounts {
            match config.product_for(account.product_type.as_deref()) {
                Some(Product::A) => counts.a += 1,
                Some(Product::B) => counts.b += 1,
                None => counts.unknown += 1,
            }
        }
        counts
    }

    pub fn get(&self, product: Product) -> usize {
        match product {
            Product::A => self.a,
            Product::B => self.b,
        }
    }

    pub fn total(&self) -> usize {
        self.a + self.b + self.unknown
    }
}
