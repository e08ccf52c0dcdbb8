//! Seed data for the console.
//!
//! The canonical five-studio fixture is compiled into the crate so tests
//! and the runner never depend on the working directory. A data dir may
//! override it with `{data_dir}/fixtures/studios.json`.

use crate::{error::NaveResult, records::RecordSet};

const BUILTIN_FIXTURE: &str = include_str!("../../data/fixtures/studios.json");

pub struct Fixture;

impl Fixture {
    /// The compiled-in five-studio fixture, validated.
    pub fn builtin() -> NaveResult<RecordSet> {
        let set: RecordSet = serde_json::from_str(BUILTIN_FIXTURE)?;
        set.validated()
    }

    /// Load and validate `{data_dir}/fixtures/studios.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<RecordSet> {
        let path = format!("{data_dir}/fixtures/studios.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let set: RecordSet = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        let set = set.validated()?;
        log::info!(
            "Loaded fixture {path}: {} tenants, {} appointments, {} transactions, {} clients",
            set.tenants.len(),
            set.appointments.len(),
            set.transactions.len(),
            set.clients.len()
        );
        Ok(set)
    }
}
