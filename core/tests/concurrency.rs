//! Two runs of the same kind racing on one database file.
//!
//! The IMMEDIATE run transaction serializes them: the ledger must end up
//! holding exactly one run's rows, never a mix.

use std::{
    collections::BTreeSet,
    path::PathBuf,
    sync::{Arc, Barrier},
    thread,
};
use uuid::Uuid;
use worklist_core::{
    config::EngineConfig,
    engine::{AssignmentEngine, RunReport},
    portfolio::{Portfolio, PortfolioSpec},
    store::AssignmentStore,
};

struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("worklist-{}.db", Uuid::new_v4())))
    }

    fn path(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let base = self.path();
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{base}{suffix}"));
        }
    }
}

fn run_in_thread(
    path: String,
    config: EngineConfig,
    run_id: &'static str,
    barrier: Arc<Barrier>,
) -> thread::JoinHandle<RunReport> {
    thread::spawn(move || {
        let mut store = AssignmentStore::open(&path).expect("open store");
        let engine = AssignmentEngine::new(config).expect("engine");
        barrier.wait();
        engine.run_with_id(&mut store, run_id.into()).expect("run")
    })
}

#[test]
fn concurrent_runs_leave_exactly_one_winner() {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = TempDb::new();
    let base = EngineConfig::default_test();
    {
        let store = AssignmentStore::open(&db.path()).expect("open store");
        store.migrate().expect("migration");
        let spec = PortfolioSpec { seed: 11, agents: 6, accounts: 400, ..PortfolioSpec::default() };
        Portfolio::generate(&spec, &base).insert_into(&store).expect("seed");
    }

    // Same kind, different buckets: each run would write a different set.
    let narrow = EngineConfig { bucket_max_dpd: 30, ..base.clone() };
    let wide = EngineConfig { bucket_max_dpd: 60, ..base.clone() };

    let barrier = Arc::new(Barrier::new(2));
    let left = run_in_thread(db.path(), narrow, "run-narrow", barrier.clone());
    let right = run_in_thread(db.path(), wide, "run-wide", barrier);
    let left = left.join().expect("left thread");
    let right = right.join().expect("right thread");

    let store = AssignmentStore::open(&db.path()).expect("reopen");
    let rows = store.assignments_for_kind(&base.kind).unwrap();
    let latest = store.latest_run(&base.kind).unwrap().expect("a committed run");
    let winner = if latest.run_id == left.run_id { &left } else { &right };

    // Both committed, one after the other.
    assert_eq!(store.run_count(&base.kind).unwrap(), 2);
    assert_ne!(left.seq, right.seq);
    assert_eq!(winner.seq, left.seq.max(right.seq));

    // Every row belongs to the last committer.
    let run_ids: BTreeSet<_> = rows.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(run_ids, BTreeSet::from([winner.run_id.as_str()]));

    // And the rows are exactly that run's plan.
    let stored: Vec<_> = rows
        .iter()
        .map(|r| (r.account_id.clone(), r.agent_id.clone()))
        .collect();
    let planned: Vec<_> = winner
        .assignments
        .iter()
        .map(|a| (a.account_id.clone(), a.agent_id.clone()))
        .collect();
    assert_eq!(stored, planned);
    assert_ne!(left.summary.eligible, right.summary.eligible);
}
