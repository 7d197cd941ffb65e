//! Field-agent worklist assignment.
//!
//! Distributes one days-past-due bucket of collection accounts across field
//! agents (OAs) by capacity-constrained, percentage-weighted round-robin,
//! and replaces the stored worklist of that policy atomically.

pub mod capacity;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod event;
pub mod portfolio;
pub mod queue;
pub mod rng;
pub mod round_robin;
pub mod store;
pub mod summary;
pub mod types;
