//! Scenario harness: a fixed battery of checks run against any
//! `RecordSource`.
//!
//! RULES:
//!   - Scenarios are independent; each sees the same read-only source.
//!   - A scenario that errors or panics is reported as FAIL and the
//!     remaining scenarios still run.
//!   - The performance scenario is a soft budget: over budget is a
//!     WARNING, never a FAIL.

use crate::{
    config::NaveConfig,
    error::{NaveError, NaveResult},
    gate::AuthorizedStore,
    metrics::{self, ConsolidatedMetrics},
    policy::{simulate_permission_violation, Actor},
    records::{RecordSet, TransactionKind},
    report::TenantReport,
    store::{MemoryStore, RecordSource},
    synthetic,
    types::TenantId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScenarioStatus {
    Pass,
    Fail,
    Warning,
}

impl ScenarioStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass    => "PASS",
            Self::Fail    => "FAIL",
            Self::Warning => "WARNING",
        }
    }
}

/// What a scenario reports back to the harness.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub status:  ScenarioStatus,
    pub message: String,
    pub details: serde_json::Value,
}

impl ScenarioOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self { status: ScenarioStatus::Pass, message: message.into(), details: json!({}) }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { status: ScenarioStatus::Fail, message: message.into(), details: json!({}) }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { status: ScenarioStatus::Warning, message: message.into(), details: json!({}) }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name:        String,
    pub status:      ScenarioStatus,
    pub message:     String,
    pub details:     serde_json::Value,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessReport {
    pub run_id:     String,
    pub started_at: DateTime<Utc>,
    pub results:    Vec<ScenarioResult>,
}

impl HarnessReport {
    pub fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// No scenario failed. Warnings do not count against the run.
    pub fn succeeded(&self) -> bool {
        self.count(ScenarioStatus::Fail) == 0
    }

    pub fn result(&self, name: &str) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn summary(&self) -> String {
        let mut out = format!("=== HARNESS SUMMARY ({}) ===\n", self.run_id);
        for r in &self.results {
            out.push_str(&format!(
                "  [{:<7}] {:<24} {} ({:.2}ms)\n",
                r.status.label(),
                r.name,
                r.message,
                r.duration_ms
            ));
        }
        out.push_str(&format!(
            "  passed: {}  failed: {}  warnings: {}  total: {}\n",
            self.count(ScenarioStatus::Pass),
            self.count(ScenarioStatus::Fail),
            self.count(ScenarioStatus::Warning),
            self.results.len()
        ));
        out
    }
}

pub type ScenarioFn = fn(&dyn RecordSource, &NaveConfig) -> NaveResult<ScenarioOutcome>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub run:  ScenarioFn,
}

/// The standard battery, in execution order.
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario { name: "data_sufficiency",        run: data_sufficiency },
        Scenario { name: "aggregation_correctness", run: aggregation_correctness },
        Scenario { name: "permission_enforcement",  run: permission_enforcement },
        Scenario { name: "report_sanity",           run: report_sanity },
        Scenario { name: "integration",             run: integration },
        Scenario { name: "security_rules",          run: security_rules },
        Scenario { name: "performance",             run: performance },
    ]
}

pub struct TestHarness<'a> {
    source:    &'a dyn RecordSource,
    config:    &'a NaveConfig,
    scenarios: Vec<Scenario>,
}

impl<'a> TestHarness<'a> {
    pub fn new(source: &'a dyn RecordSource, config: &'a NaveConfig) -> Self {
        Self { source, config, scenarios: default_scenarios() }
    }

    pub fn with_scenarios(mut self, scenarios: Vec<Scenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn run(&self) -> HarnessReport {
        let run_id = format!("harness-{}", uuid::Uuid::new_v4());
        log::info!("Harness {run_id}: running {} scenarios", self.scenarios.len());

        let started_at = Utc::now();
        let results: Vec<ScenarioResult> = self
            .scenarios
            .iter()
            .map(|scenario| self.run_one(scenario))
            .collect();

        let report = HarnessReport { run_id, started_at, results };
        log::info!(
            "Harness {} finished: {} passed, {} failed, {} warnings",
            report.run_id,
            report.count(ScenarioStatus::Pass),
            report.count(ScenarioStatus::Fail),
            report.count(ScenarioStatus::Warning)
        );
        report
    }

    fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            (scenario.run)(self.source, self.config)
        }));
        let outcome = match caught {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => ScenarioOutcome::fail(format!("error: {e}")),
            Err(payload) => ScenarioOutcome::fail(format!("panic: {}", panic_message(&*payload))),
        };
        if outcome.status != ScenarioStatus::Pass {
            log::warn!("Scenario {} {}: {}", scenario.name, outcome.status.label(), outcome.message);
        }
        ScenarioResult {
            name:        scenario.name.to_string(),
            status:      outcome.status,
            message:     outcome.message,
            details:     outcome.details,
            duration_ms: millis(start.elapsed()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// ── Scenarios ──────────────────────────────────────────────────────

fn data_sufficiency(source: &dyn RecordSource, cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let set = source.snapshot()?;
    let counts = [
        ("tenants", set.tenants.len(), cfg.min_tenants),
        ("appointments", set.appointments.len(), cfg.min_appointments),
        ("transactions", set.transactions.len(), cfg.min_transactions),
        ("clients", set.clients.len(), cfg.min_clients),
    ];
    let details = json!({
        "tenants": set.tenants.len(),
        "appointments": set.appointments.len(),
        "transactions": set.transactions.len(),
        "clients": set.clients.len(),
    });

    let short: Vec<String> = counts
        .iter()
        .filter(|(_, have, need)| have < need)
        .map(|(kind, have, need)| format!("{kind} {have}/{need}"))
        .collect();
    if !short.is_empty() {
        return Ok(ScenarioOutcome::fail(format!("insufficient data: {}", short.join(", ")))
            .with_details(details));
    }

    let idle: Vec<&str> = set
        .tenants
        .iter()
        .filter(|t| !set.transactions.iter().any(|x| x.tenant_id == t.id))
        .map(|t| t.id.as_str())
        .collect();
    if !idle.is_empty() {
        return Ok(ScenarioOutcome::warning(format!(
            "tenants without transactions: {}",
            idle.join(", ")
        ))
        .with_details(details));
    }

    Ok(ScenarioOutcome::pass(format!(
        "{} tenants, {} appointments, {} transactions, {} clients",
        set.tenants.len(),
        set.appointments.len(),
        set.transactions.len(),
        set.clients.len()
    ))
    .with_details(details))
}

fn aggregation_correctness(source: &dyn RecordSource, _cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let set = source.snapshot()?;
    let m = metrics::consolidate(&set);
    let problems = aggregation_problems(&set, &m);
    let details = json!({
        "total_revenue": m.total_revenue,
        "total_expenses": m.total_expenses,
        "net_profit": m.net_profit,
        "conversion_rate": m.conversion_rate,
    });
    if problems.is_empty() {
        Ok(ScenarioOutcome::pass(format!(
            "revenue {:.2}, expenses {:.2}, profit {:.2}",
            m.total_revenue, m.total_expenses, m.net_profit
        ))
        .with_details(details))
    } else {
        Ok(ScenarioOutcome::fail(problems.join("; ")).with_details(details))
    }
}

/// Cross-check the aggregator against a direct recount of `set`.
fn aggregation_problems(set: &RecordSet, m: &ConsolidatedMetrics) -> Vec<String> {
    let mut problems = Vec::new();

    let revenue: f64 = set
        .transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Revenue)
        .map(|t| t.amount)
        .sum();
    let expenses: f64 = set
        .transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .map(|t| t.amount)
        .sum();
    if !approx_eq(m.total_revenue, revenue) {
        problems.push(format!("total revenue {} != recount {}", m.total_revenue, revenue));
    }
    if !approx_eq(m.total_expenses, expenses) {
        problems.push(format!("total expenses {} != recount {}", m.total_expenses, expenses));
    }
    if !approx_eq(m.net_profit, m.total_revenue - m.total_expenses) {
        problems.push("net profit != revenue - expenses".to_string());
    }

    let tenant_revenue: f64 = m.per_tenant.iter().map(|t| t.revenue).sum();
    if !approx_eq(tenant_revenue, m.total_revenue) {
        problems.push(format!(
            "per-tenant revenue {} != total revenue {}",
            tenant_revenue, m.total_revenue
        ));
    }
    let tenant_appointments: usize = m.per_tenant.iter().map(|t| t.appointment_count).sum();
    if tenant_appointments != m.total_appointments {
        problems.push("per-tenant appointment counts do not add up".to_string());
    }
    let tenant_clients: usize = m.per_tenant.iter().map(|t| t.client_count).sum();
    if tenant_clients != m.total_clients {
        problems.push("per-tenant client counts do not add up".to_string());
    }
    if !(0.0..=100.0).contains(&m.conversion_rate) {
        problems.push(format!("conversion rate {} outside [0, 100]", m.conversion_rate));
    }
    if !m.average_revenue_per_tenant.is_finite() {
        problems.push("average revenue per tenant is not finite".to_string());
    }
    problems
}

fn permission_enforcement(source: &dyn RecordSource, _cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let ids = source.tenant_ids()?;
    let mut checks = 0usize;
    let mut violations = Vec::new();

    for home in &ids {
        for target in &ids {
            checks += 1;
            let denied = simulate_permission_violation("tenant-admin", home.as_str(), target.as_str()).is_err();
            if denied != (home != target) {
                violations.push(format!("tenant-admin {home} -> {target}: denied={denied}"));
            }
            if simulate_permission_violation("super-admin", home.as_str(), target.as_str()).is_err() {
                violations.push(format!("super-admin denied {target}"));
            }
            if simulate_permission_violation("guest", home.as_str(), target.as_str()).is_ok() {
                violations.push(format!("guest role allowed {home} -> {target}"));
            }
        }
    }

    let details = json!({ "pairs_checked": checks, "violations": violations.len() });
    if violations.is_empty() {
        Ok(ScenarioOutcome::pass(format!("{checks} tenant pairs enforced")).with_details(details))
    } else {
        Ok(ScenarioOutcome::fail(violations.join("; ")).with_details(details))
    }
}

fn report_sanity(source: &dyn RecordSource, _cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let m = metrics::consolidate(&source.snapshot()?);
    let mut problems = Vec::new();

    for tm in &m.per_tenant {
        let report = TenantReport::build(&source.studio_data(&tm.tenant.id)?);
        let id = &tm.tenant.id;
        if !approx_eq(report.revenue, tm.revenue) {
            problems.push(format!("{id}: report revenue {} != metrics {}", report.revenue, tm.revenue));
        }
        if !approx_eq(report.expenses, tm.expenses) {
            problems.push(format!("{id}: report expenses {} != metrics {}", report.expenses, tm.expenses));
        }
        let month_profit: f64 = report.months.values().map(|b| b.profit()).sum();
        if !approx_eq(month_profit, report.profit) {
            problems.push(format!("{id}: monthly profit does not add up"));
        }
        if !report.average_ticket.is_finite() || report.average_ticket < 0.0 {
            problems.push(format!("{id}: average ticket {}", report.average_ticket));
        }
        let counted: usize = report.status_counts.values().sum();
        if counted != tm.appointment_count {
            problems.push(format!("{id}: status breakdown covers {counted} of {} appointments", tm.appointment_count));
        }
    }

    if problems.is_empty() {
        Ok(ScenarioOutcome::pass(format!("{} tenant reports consistent", m.per_tenant.len())))
    } else {
        Ok(ScenarioOutcome::fail(problems.join("; ")))
    }
}

fn integration(source: &dyn RecordSource, _cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let ids = source.tenant_ids()?;
    let mut problems = Vec::new();

    let nave_mae = AuthorizedStore::new(source, Actor::SuperAdmin);
    let direct = metrics::consolidate(&source.snapshot()?);
    if nave_mae.consolidated_metrics()? != direct {
        problems.push("gated consolidated view differs from direct aggregation".to_string());
    }

    for id in &ids {
        let admin = AuthorizedStore::new(source, Actor::tenant_admin(id.clone()));
        let data = admin.studio_data(id)?;
        if !data.is_isolated() {
            problems.push(format!("{id}: own studio data contains foreign records"));
        }
        if admin.visible_tenants()? != vec![id.clone()] {
            problems.push(format!("{id}: tenant-admin sees tenants other than its own"));
        }
        if admin.consolidated_metrics().is_ok() {
            problems.push(format!("{id}: tenant-admin reached the consolidated view"));
        }
        let expected = direct.tenant(id).map(|t| t.revenue).unwrap_or(0.0);
        if !approx_eq(admin.tenant_report(id)?.revenue, expected) {
            problems.push(format!("{id}: gated report revenue differs from metrics"));
        }
    }

    if problems.is_empty() {
        Ok(ScenarioOutcome::pass(format!("gate, store, metrics and reports agree for {} tenants", ids.len())))
    } else {
        Ok(ScenarioOutcome::fail(problems.join("; ")))
    }
}

fn security_rules(source: &dyn RecordSource, _cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let set = source.snapshot()?;
    let ids = source.tenant_ids()?;
    let mut problems = Vec::new();

    // Partitions must cover every record exactly once.
    let mut seen = 0usize;
    for id in &ids {
        let data = source.studio_data(id)?;
        if !data.is_isolated() {
            problems.push(format!("{id}: partition leaks records of other tenants"));
        }
        seen += data.record_count();
    }
    let total = set.appointments.len() + set.transactions.len() + set.clients.len();
    if seen != total {
        problems.push(format!("partitions cover {seen} records, store holds {total}"));
    }

    // A denial must name both tenants so callers can report it.
    if let [first, second, ..] = ids.as_slice() {
        match simulate_permission_violation("admin_estudio", first.as_str(), second.as_str()) {
            Err(e @ NaveError::AccessDenied { .. }) => {
                let msg = e.to_string();
                if !msg.contains(first.as_str()) || !msg.contains(second.as_str()) {
                    problems.push(format!("denial message omits tenant ids: {msg}"));
                }
            }
            Err(other) => problems.push(format!("unexpected denial kind: {other}")),
            Ok(()) => problems.push(format!("cross-tenant read {first} -> {second} was allowed")),
        }
    }

    // Unregistered tenants are refused, not served empty.
    let ghost = TenantId::from("__unregistered__");
    if source.studio_data(&ghost).is_ok() {
        problems.push("unregistered tenant id returned data".to_string());
    }

    if problems.is_empty() {
        Ok(ScenarioOutcome::pass(format!("{} partitions isolated, {total} records accounted for", ids.len())))
    } else {
        Ok(ScenarioOutcome::fail(problems.join("; ")))
    }
}

/// Aggregation plus per-tenant filtering across all tenants, timed.
fn timed_sweep(source: &dyn RecordSource) -> NaveResult<Duration> {
    let start = Instant::now();
    metrics::consolidate(&source.snapshot()?);
    for id in source.tenant_ids()? {
        source.studio_data(&id)?;
    }
    Ok(start.elapsed())
}

fn performance(source: &dyn RecordSource, cfg: &NaveConfig) -> NaveResult<ScenarioOutcome> {
    let budget = Duration::from_millis(cfg.performance_budget_ms);
    let base = timed_sweep(source)?;

    let scaled = if cfg.synthetic.tenants > 0 {
        let store = MemoryStore::new(synthetic::generate(&cfg.synthetic)?)?;
        Some(timed_sweep(&store)?)
    } else {
        None
    };

    let details = json!({
        "budget_ms": cfg.performance_budget_ms,
        "source_ms": millis(base),
        "synthetic_ms": scaled.map(millis),
        "synthetic_tenants": cfg.synthetic.tenants,
    });
    let worst = scaled.map_or(base, |s| s.max(base));
    if worst > budget {
        return Ok(ScenarioOutcome::warning(format!(
            "sweep took {:.2}ms, budget {}ms",
            millis(worst),
            cfg.performance_budget_ms
        ))
        .with_details(details));
    }
    Ok(ScenarioOutcome::pass(format!(
        "sweep {:.2}ms within {}ms budget",
        millis(worst),
        cfg.performance_budget_ms
    ))
    .with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exploding(_: &dyn RecordSource, _: &NaveConfig) -> NaveResult<ScenarioOutcome> {
        panic!("scenario blew up");
    }

    fn erroring(_: &dyn RecordSource, _: &NaveConfig) -> NaveResult<ScenarioOutcome> {
        Err(NaveError::UnknownTenant { tenant_id: "studio_9".into() })
    }

    fn passing(_: &dyn RecordSource, _: &NaveConfig) -> NaveResult<ScenarioOutcome> {
        Ok(ScenarioOutcome::pass("ok"))
    }

    #[test]
    fn broken_scenarios_fail_without_aborting_the_run() {
        let store = MemoryStore::new(RecordSet::default()).unwrap();
        let cfg = NaveConfig::default_test();
        let report = TestHarness::new(&store, &cfg)
            .with_scenarios(vec![
                Scenario { name: "explodes", run: exploding },
                Scenario { name: "errors",   run: erroring },
                Scenario { name: "passes",   run: passing },
            ])
            .run();

        assert_eq!(report.results.len(), 3);
        let exploded = report.result("explodes").unwrap();
        assert_eq!(exploded.status, ScenarioStatus::Fail);
        assert!(exploded.message.contains("scenario blew up"));
        let errored = report.result("errors").unwrap();
        assert_eq!(errored.status, ScenarioStatus::Fail);
        assert!(errored.message.contains("studio_9"));
        assert_eq!(report.result("passes").unwrap().status, ScenarioStatus::Pass);
        assert!(!report.succeeded());
    }
}
