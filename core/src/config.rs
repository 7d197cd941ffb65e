use crate::{
    eligibility::DpdBucket,
    error::{WorklistError, WorklistResult},
    types::{KindTag, Product},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUCKET_MIN_DPD: i64 = 1;
pub const DEFAULT_BUCKET_MAX_DPD: i64 = 30;
pub const DEFAULT_PRODUCT_A_CODE: &str = "C2C";
pub const DEFAULT_PRODUCT_B_CODE: &str = "CRL";
pub const DEFAULT_KIND: &str = "product_type";
pub const DEFAULT_INSERT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Injectable constants for one assignment policy.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides. `{}` is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_bucket_min_dpd")]
    pub bucket_min_dpd: i64,
    #[serde(default = "default_bucket_max_dpd")]
    pub bucket_max_dpd: i64,
    #[serde(default = "default_product_a_code")]
    pub product_a_code: String,
    #[serde(default = "default_product_b_code")]
    pub product_b_code: String,
    #[serde(default = "default_kind")]
    pub kind: KindTag,
    /// Rows per bulk-insert chunk. Chunks share one transaction.
    #[serde(default = "default_insert_chunk_size")]
    pub insert_chunk_size: usize,
    /// How long a run waits for another run's write lock.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_bucket_min_dpd() -> i64 { DEFAULT_BUCKET_MIN_DPD }
fn default_bucket_max_dpd() -> i64 { DEFAULT_BUCKET_MAX_DPD }
fn default_product_a_code() -> String { DEFAULT_PRODUCT_A_CODE.into() }
fn default_product_b_code() -> String { DEFAULT_PRODUCT_B_CODE.into() }
fn default_kind() -> KindTag { DEFAULT_KIND.into() }
fn default_insert_chunk_size() -> usize { DEFAULT_INSERT_CHUNK_SIZE }
fn default_busy_timeout_ms() -> u64 { DEFAULT_BUSY_TIMEOUT_MS }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bucket_min_dpd: DEFAULT_BUCKET_MIN_DPD,
            bucket_max_dpd: DEFAULT_BUCKET_MAX_DPD,
            product_a_code: DEFAULT_PRODUCT_A_CODE.into(),
            product_b_code: DEFAULT_PRODUCT_B_CODE.into(),
            kind: DEFAULT_KIND.into(),
            insert_chunk_size: DEFAULT_INSERT_CHUNK_SIZE,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file and validate it.
    /// In tests, use EngineConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Small chunk size so tests exercise more than one insert chunk.
    pub fn default_test() -> Self {
        Self {
            insert_chunk_size: 2,
            busy_timeout_ms: 10_000,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> WorklistResult<()> {
        let invalid = |reason: String| Err(WorklistError::InvalidConfig { reason });

        if self.bucket_min_dpd > self.bucket_max_dpd {
            return invalid(format!(
                "bucket_min_dpd ({}) is greater than bucket_max_dpd ({})",
                self.bucket_min_dpd, self.bucket_max_dpd
            ));
        }
        if self.product_a_code.trim().is_empty() || self.product_b_code.trim().is_empty() {
            return invalid("product codes must not be empty".into());
        }
        if self.product_a_code == self.product_b_code {
            return invalid(format!(
                "product codes must differ, both are '{}'",
                self.product_a_code
            ));
        }
        if self.kind.trim().is_empty() {
            return invalid("kind must not be empty".into());
        }
        if self.insert_chunk_size == 0 {
            return invalid("insert_chunk_size must be at least 1".into());
        }
        Ok(())
    }

    pub fn bucket(&self) -> DpdBucket {
        DpdBucket::new(self.bucket_min_dpd, self.bucket_max_dpd)
    }

    /// Map a stored product code onto a lane. Unknown or missing codes map to None.
    pub fn product_for(&self, code: Option<&str>) -> Option<Product> {
        match code {
            Some(c) if c == self.product_a_code => Some(Product::A),
            Some(c) if c == self.product_b_code => Some(Product::B),
            _ => None,
        }
    }

    pub fn code_for(&self, product: Product) -> &str {
        match product {
            Product::A => &self.product_a_code,
            Product::B => &self.product_b_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "bucket_max_dpd": 60, "kind": "bucket_one" }"#).unwrap();
        assert_eq!(config.bucket_max_dpd, 60);
        assert_eq!(config.bucket_min_dpd, DEFAULT_BUCKET_MIN_DPD);
        assert_eq!(config.kind, "bucket_one");
    }

    #[test]
    fn inverted_bucket_is_rejected() {
        let config = EngineConfig { bucket_min_dpd: 31, bucket_max_dpd: 30, ..EngineConfig::default() };
        assert!(matches!(config.validate(), Err(WorklistError::InvalidConfig { .. })));
    }

    #[test]
    fn identical_product_codes_are_rejected() {
        let config = EngineConfig {
            product_b_code: DEFAULT_PRODUCT_A_CODE.into(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let config = EngineConfig { insert_chunk_size: 0, ..EngineConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn product_codes_map_to_lanes() {
        let config = EngineConfig::default();
        assert_eq!(config.product_for(Some("C2C")), Some(Product::A));
        assert_eq!(config.product_for(Some("CRL")), Some(Product::B));
        assert_eq!(config.product_for(Some("HP")), None);
        assert_eq!(config.product_for(None), None);
        assert_eq!(config.code_for(Product::B), "CRL");
    }
}
