use crate::{
    config::EngineConfig,
    error::WorklistResult,
    round_robin::{self, Assignment, AssignmentPlan},
    store::{AssignmentRow, AssignmentStore, RunRecord},
    summary::RunSummary,
    types::{KindTag, Product, RunId},
};
use uuid::Uuid;

/// What a committed run reports back to its caller.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub kind: KindTag,
    /// Commit order among all runs in the store.
    pub seq: i64,
    pub summary: RunSummary,
    pub assignments: Vec<Assignment>,
}

pub struct AssignmentEngine {
    config: EngineConfig,
}

impl AssignmentEngine {
    pub fn new(config: EngineConfig) -> WorklistResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute and commit a fresh worklist under a generated run id.
    pub fn run(&self, store: &mut AssignmentStore) -> WorklistResult<RunReport> {
        self.run_with_id(store, format!("run-{}", Uuid::new_v4()))
    }

    /// One full run inside one IMMEDIATE transaction:
    /// read snapshot → plan → replace ledger → record run → commit.
    ///
    /// Any error drops the transaction before commit, so the prior
    /// assignments of this kind stay exactly as they were.
    pub fn run_with_id(&self, store: &mut AssignmentStore, run_id: RunId) -> WorklistResult<RunReport> {
        let config = &self.config;
        let bucket = config.bucket();
        store.set_busy_timeout(config.busy_timeout_ms)?;

        let started_at = now_rfc3339();
        let tx = store.begin_run()?;

        let eligible = tx.read_eligible_accounts(bucket)?;
        let agents = tx.read_agents()?;
        log::info!(
            "run={run_id} kind={} bucket=[{}, {}]: {} eligible accounts, {} agents",
            config.kind,
            bucket.min_dpd,
            bucket.max_dpd,
            eligible.len(),
            agents.len()
        );

        let plan = round_robin::plan(config, &eligible, &agents);
        log_drift(&run_id, &plan.summary);

        let created_at = now_rfc3339();
        let rows: Vec<AssignmentRow> = plan
            .assignments
            .iter()
            .map(|a| AssignmentRow {
                id: None,
                account_id: a.account_id.clone(),
                agent_id: a.agent_id.clone(),
                kind: config.kind.clone(),
                run_id: run_id.clone(),
                created_at: created_at.clone(),
            })
            .collect();
        tx.replace_assignments(&config.kind, &rows, config.insert_chunk_size)?;

        let record = RunRecord {
            run_id: run_id.clone(),
            kind: config.kind.clone(),
            bucket_min_dpd: bucket.min_dpd,
            bucket_max_dpd: bucket.max_dpd,
            started_at,
            finished_at: now_rfc3339(),
            summary_json: serde_json::to_string(&plan.summary)?,
            seq: 0,
        };
        let seq = tx.record_run(&record, &plan.events)?;
        tx.commit()?;

        log::info!(
            "run={run_id} committed as #{seq}: {} assigned, {} unassigned",
            plan.summary.assigned,
            plan.summary.unassigned
        );

        let AssignmentPlan { assignments, summary, .. } = plan;
        Ok(RunReport {
            run_id,
            kind: config.kind.clone(),
            seq,
            summary,
            assignments,
        })
    }

    /// Plan against the current store contents without writing anything.
    pub fn preview(&self, store: &AssignmentStore) -> WorklistResult<AssignmentPlan> {
        let eligible = store.eligible_accounts(self.config.bucket())?;
        let agents = store.agents()?;
        Ok(round_robin::plan(&self.config, &eligible, &agents))
    }
}

fn log_drift(run_id: &str, summary: &RunSummary) {
    for product in Product::ALL {
        let drift = summary.drift(product);
        if drift != 0 {
            log::debug!(
                "run={run_id} product {}: slot drift {drift:+} ({} slots for {} accounts)",
                product.name(),
                drift + summary.counts.get(product) as i64,
                summary.counts.get(product)
            );
        }
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
