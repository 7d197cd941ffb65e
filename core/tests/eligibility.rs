//! Bucket filter and the ordered read models.

use worklist_core::{
    config::EngineConfig,
    eligibility::{filter_bucket, DpdBucket, ProductCounts},
    store::{AccountRow, AgentRow, AssignmentStore},
};

fn store() -> AssignmentStore {
    let store = AssignmentStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

/// Both bounds are inclusive.
#[test]
fn bucket_bounds_are_inclusive() {
    let bucket = DpdBucket::new(1, 30);
    assert!(!bucket.contains(0));
    assert!(bucket.contains(1));
    assert!(bucket.contains(30));
    assert!(!bucket.contains(31));
}

/// The filter keeps the input order.
#[test]
fn filter_preserves_input_order() {
    let accounts = vec![
        AccountRow::new("acc-1", "C2C", 45),
        AccountRow::new("acc-2", "CRL", 3),
        AccountRow::new("acc-3", "C2C", 0),
        AccountRow::new("acc-4", "C2C", 30),
        AccountRow::new("acc-5", "CRL", 1),
    ];

    let eligible = filter_bucket(accounts, DpdBucket::new(1, 30));

    let ids: Vec<_> = eligible.iter().map(|a| a.account_id.as_str()).collect();
    assert_eq!(ids, vec!["acc-2", "acc-4", "acc-5"]);
}

#[test]
fn product_counts_split_by_configured_codes() {
    let config = EngineConfig::default_test();
    let accounts = vec![
        AccountRow::new("acc-1", "C2C", 5),
        AccountRow::new("acc-2", "CRL", 5),
        AccountRow::new("acc-3", "C2C", 5),
        AccountRow::new("acc-4", "HP", 5),
    ];

    let counts = ProductCounts::tally(&accounts, &config);

    assert_eq!(counts, ProductCounts { a: 2, b: 1, unknown: 1 });
    assert_eq!(counts.total(), 4);
}

/// The store hands accounts back ascending by id regardless of insert order.
#[test]
fn store_reads_accounts_ascending_by_id() {
    let store = store();
    for (id, dpd) in [("acc-9", 5), ("acc-1", 5), ("acc-5", 99), ("acc-3", 12)] {
        store.insert_account(&AccountRow::new(id, "C2C", dpd)).unwrap();
    }

    let eligible = store.eligible_accounts(DpdBucket::new(1, 30)).unwrap();

    let ids: Vec<_> = eligible.iter().map(|a| a.account_id.as_str()).collect();
    assert_eq!(ids, vec!["acc-1", "acc-3", "acc-9"]);
    assert_eq!(store.account_count().unwrap(), 4);
}

/// A NULL days_past_due reads as 0 and so falls outside bucket 1.
#[test]
fn null_days_past_due_reads_as_zero() {
    let store = store();
    store
        .execute_batch(
            "INSERT INTO account (account_id, product_type, days_past_due) VALUES ('acc-1', 'C2C', NULL);",
        )
        .unwrap();

    let all = store.accounts().unwrap();
    assert_eq!(all[0].days_past_due, 0);
    assert!(store.eligible_accounts(DpdBucket::new(1, 30)).unwrap().is_empty());
}

/// Agents come back ascending by id with NULL numbers read as zero.
#[test]
fn store_reads_agents_ascending_by_id() {
    let store = store();
    store.insert_agent(&AgentRow::new("oa-2", 3, 0.5, 0.5)).unwrap();
    store.insert_agent(&AgentRow::new("oa-1", 4, 1.0, 0.0)).unwrap();
    store
        .execute_batch("INSERT INTO agent (agent_id) VALUES ('oa-0');")
        .unwrap();

    let agents = store.agents().unwrap();

    let ids: Vec<_> = agents.iter().map(|a| a.agent_id.as_str()).collect();
    assert_eq!(ids, vec!["oa-0", "oa-1", "oa-2"]);
    assert_eq!(agents[0].capacity, 0);
    assert_eq!(agents[0].percentage_a, 0.0);
}
