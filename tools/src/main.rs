//! nave-runner: headless harness runner for the Nave-Mãe console.
//!
//! Usage:
//!   nave-runner --data-dir ./data
//!   nave-runner --sqlite console.db --json   (file is reseeded each run)
//!   nave-runner --tenant studio_2 --role admin_estudio --home studio_1

use anyhow::Result;
use navemae_core::{
    config::NaveConfig,
    error::NaveError,
    fixture::Fixture,
    gate::AuthorizedStore,
    harness::TestHarness,
    policy::Actor,
    records::RecordSet,
    store::{MemoryStore, RecordSource, SqlStore},
    types::TenantId,
};
use std::{env, path::Path, process::ExitCode};

#[derive(serde::Serialize)]
struct Denial<'a> {
    denied: bool,
    role:   &'a str,
    target: &'a str,
    reason: String,
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let sqlite = arg_value(&args, "--sqlite");
    let tenant = arg_value(&args, "--tenant");
    let role = arg_value(&args, "--role").unwrap_or("super-admin");
    let home = arg_value(&args, "--home").unwrap_or("");
    let json = args.iter().any(|a| a == "--json");

    let config = load_config(data_dir)?;
    let records = load_records(data_dir)?;

    if !json {
        println!("Nave-Mãe - nave-runner");
        println!("  data_dir:  {data_dir}");
        println!("  store:     {}", sqlite.unwrap_or("memory"));
        println!("  started:   {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
        println!();
    }

    let source: Box<dyn RecordSource> = match sqlite {
        Some(path) => {
            let mut store = SqlStore::open(path)?;
            store.migrate()?;
            store.seed(&records)?;
            Box::new(store)
        }
        None => Box::new(MemoryStore::new(records)?),
    };

    if let Some(target) = tenant {
        let actor = Actor::from_role(role, &TenantId::from(home));
        return gated_read(source.as_ref(), actor, role, target, json);
    }

    let report = TestHarness::new(source.as_ref(), &config).run();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.summary());
        print_console(source.as_ref())?;
    }
    Ok(if report.succeeded() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn gated_read(
    source: &dyn RecordSource,
    actor: Actor,
    role: &str,
    target: &str,
    json: bool,
) -> Result<ExitCode> {
    let gate = AuthorizedStore::new(source, actor);
    match gate.tenant_report(&TenantId::from(target)) {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("=== {} ({}) ===", report.tenant_name, report.tenant_id);
                for (month, totals) in &report.months {
                    println!(
                        "  {month} | Revenue: {:.2} | Expenses: {:.2} | Profit: {:.2}",
                        totals.revenue,
                        totals.expenses,
                        totals.profit()
                    );
                }
                println!("  profit:         {:.2}", report.profit);
                println!("  average ticket: {:.2}", report.average_ticket);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ (NaveError::AccessDenied { .. } | NaveError::RoleDenied { .. })) => {
            let denial = Denial { denied: true, role, target, reason: e.to_string() };
            if json {
                println!("{}", serde_json::to_string_pretty(&denial)?);
            } else {
                println!("DENIED: {}", denial.reason);
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_console(source: &dyn RecordSource) -> Result<()> {
    let m = AuthorizedStore::new(source, Actor::SuperAdmin).consolidated_metrics()?;

    println!();
    println!("=== NAVE-MÃE CONSOLE ===");
    println!("  tenants:        {}", m.total_tenants);
    println!("  revenue:        {:.2}", m.total_revenue);
    println!("  expenses:       {:.2}", m.total_expenses);
    println!("  net profit:     {:.2}", m.net_profit);
    println!("  avg / tenant:   {:.2}", m.average_revenue_per_tenant);
    println!("  conversion:     {:.1}%", m.conversion_rate);
    println!();
    for (rank, t) in m.ranking().iter().enumerate() {
        println!(
            "  {:>2}. {:<24} | {:<10} | Revenue: {:.2} | Profit: {:.2}",
            rank + 1,
            t.tenant.name,
            t.tenant.tier.as_str(),
            t.revenue,
            t.profit
        );
    }
    for (tier, revenue) in m.revenue_by_tier() {
        println!("  tier {:<10} {:.2}", tier.as_str(), revenue);
    }
    Ok(())
}

fn load_config(data_dir: &str) -> Result<NaveConfig> {
    if Path::new(data_dir).join("config/harness.json").exists() {
        NaveConfig::load(data_dir)
    } else {
        log::warn!("No config under {data_dir}, using built-in defaults");
        Ok(NaveConfig::default_test())
    }
}

fn load_records(data_dir: &str) -> Result<RecordSet> {
    if Path::new(data_dir).join("fixtures/studios.json").exists() {
        Fixture::load(data_dir)
    } else {
        log::warn!("No fixture under {data_dir}, using the built-in studios");
        Ok(Fixture::builtin()?)
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
