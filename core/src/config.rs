use serde::{Deserialize, Serialize};

/// Sizing of the seeded synthetic population used by the performance scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub seed: u64,
    /// 0 disables the synthetic run; the scenario then times the fixture only.
    pub tenants: usize,
    pub appointments_per_tenant: usize,
    pub transactions_per_tenant: usize,
    pub clients_per_tenant: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaveConfig {
    /// Soft latency budget for aggregation + per-tenant filtering.
    pub performance_budget_ms: u64,
    // Data-sufficiency thresholds.
    pub min_tenants: usize,
    pub min_appointments: usize,
    pub min_transactions: usize,
    pub min_clients: usize,
    pub synthetic: SyntheticConfig,
}

impl NaveConfig {
    /// Load the harness configuration from `{data_dir}/config/harness.json`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/config/harness.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: NaveConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        log::debug!(
            "Loaded harness config from {path} (budget {}ms)",
            config.performance_budget_ms
        );
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            performance_budget_ms: 100,
            min_tenants: 3,
            min_appointments: 5,
            min_transactions: 10,
            min_clients: 5,
            synthetic: SyntheticConfig {
                seed: 42,
                tenants: 10,
                appointments_per_tenant: 8,
                transactions_per_tenant: 12,
                clients_per_tenant: 5,
            },
        }
    }
}
