//! Shared primitive types used across the engine and the store.

/// Account identifier as issued by the loan book.
pub type AccountId = String;

/// Field agent (OA) identifier.
pub type AgentId = String;

/// One engine run. Stamped on every assignment the run writes.
pub type RunId = String;

/// Label of the policy that produced an assignment. Scopes the replace.
pub type KindTag = String;

/// The two product lanes an agent can be given a share of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    A,
    B,
}

impl Product {
    pub const ALL: [Product; 2] = [Product::A, Product::B];

    pub fn name(self) -> &'static str {
        match self {
            Product::A => "a",
            Product::B => "b",
        }
    }
}
