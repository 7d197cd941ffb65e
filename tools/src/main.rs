//! worklist-runner: headless assignment run for the collections back office.
//!
//! Usage:
//!   worklist-runner --db worklist.db --config data/assignment_config.json
//!   worklist-runner --seed-demo --seed 7 --agents 12 --accounts 500
//!   worklist-runner --db worklist.db --dry-run --json

use anyhow::Result;
use std::env;
use worklist_core::{
    config::EngineConfig,
    engine::AssignmentEngine,
    portfolio::{Portfolio, PortfolioSpec},
    store::AssignmentStore,
    summary::RunSummary,
    types::Product,
};

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    run_id: Option<&'a str>,
    kind: &'a str,
    dry_run: bool,
    summary: &'a RunSummary,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let config_path = arg_value(&args, "--config");
    let seed_demo = args.iter().any(|a| a == "--seed-demo");
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let json = args.iter().any(|a| a == "--json");

    let config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if !json {
        println!("worklist-runner");
        println!("  db:      {db}");
        println!("  config:  {}", config_path.unwrap_or("(defaults)"));
        println!("  kind:    {}", config.kind);
        println!("  bucket:  {}..={} dpd", config.bucket_min_dpd, config.bucket_max_dpd);
        println!();
    }

    let mut store = AssignmentStore::open(db)?;
    store.migrate()?;

    if seed_demo {
        let spec = PortfolioSpec {
            seed: parse_arg(&args, "--seed", 42u64),
            agents: parse_arg(&args, "--agents", 8usize),
            accounts: parse_arg(&args, "--accounts", 200usize),
            ..PortfolioSpec::default()
        };
        Portfolio::generate(&spec, &config).insert_into(&store)?;
    }

    let engine = AssignmentEngine::new(config)?;

    if dry_run {
        let plan = engine.preview(&store)?;
        report(&engine, None, &plan.summary, json)?;
    } else {
        let run = engine.run(&mut store)?;
        report(&engine, Some(&run.run_id), &run.summary, json)?;
    }

    Ok(())
}

fn report(engine: &AssignmentEngine, run_id: Option<&str>, summary: &RunSummary, json: bool) -> Result<()> {
    let kind = engine.config().kind.as_str();
    if json {
        let out = JsonReport {
            run_id,
            kind,
            dry_run: run_id.is_none(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("=== RUN SUMMARY ===");
    println!("  run_id:      {}", run_id.unwrap_or("(dry run, nothing written)"));
    println!("  eligible:    {}", summary.eligible);
    println!("  assigned:    {}", summary.assigned);
    println!("  unassigned:  {}", summary.unassigned);
    println!("  retired:     {}", summary.retired_agents);
    for product in Product::ALL {
        println!(
            "  product {} ({}): {} accounts, {} slots, drift {:+}",
            product.name(),
            engine.config().code_for(product),
            summary.counts.get(product),
            summary.counts.get(product) as i64 + summary.drift(product),
            summary.drift(product)
        );
    }
    if summary.counts.unknown > 0 {
        log::warn!("{} accounts carry an unknown product code", summary.counts.unknown);
    }

    println!();
    println!("=== AGENT LOADS ===");
    if summary.agent_loads.is_empty() {
        println!("  (no agent received an account)");
    }
    for (agent_id, load) in &summary.agent_loads {
        println!("  {agent_id:<12} a: {:>4}  b: {:>4}  total: {:>4}", load.a, load.b, load.total());
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
