//! Metrics aggregator: consolidated cross-tenant rollups for the
//! Nave-Mãe console.
//!
//! Pure functions of a `RecordSet`. Nothing here reads global state,
//! so the record set may come from the fixture, a synthetic population
//! or a database snapshot.
//!
//! Zero denominators yield 0, never NaN.

use crate::{
    records::{Appointment, AppointmentStatus, RecordSet, SubscriptionTier, Tenant, TransactionKind},
    types::{percent_or_zero, ratio_or_zero, Money, TenantId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantMetrics {
    pub tenant:            Tenant,
    pub revenue:           Money,
    pub expenses:          Money,
    pub profit:            Money,
    pub appointment_count: usize,
    pub client_count:      usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedMetrics {
    pub total_revenue:              Money,
    pub total_expenses:             Money,
    pub net_profit:                 Money,
    pub total_appointments:         usize,
    pub completed_appointments:     usize,
    pub total_clients:              usize,
    pub total_tenants:              usize,
    pub average_revenue_per_tenant: Money,
    /// Completed ÷ total appointments × 100.
    pub conversion_rate:            f64,
    pub per_tenant:                 Vec<TenantMetrics>,
}

#[derive(Default)]
struct Accumulator {
    revenue:      Money,
    expenses:     Money,
    appointments: usize,
    clients:      usize,
}

/// Compute the consolidated view across every tenant in `records`.
pub fn consolidate(records: &RecordSet) -> ConsolidatedMetrics {
    let mut by_tenant: HashMap<&TenantId, Accumulator> = HashMap::new();

    for txn in &records.transactions {
        let acc = by_tenant.entry(&txn.tenant_id).or_default();
        match txn.kind {
            TransactionKind::Revenue => acc.revenue  += txn.amount,
            TransactionKind::Expense => acc.expenses += txn.amount,
        }
    }
    for appt in &records.appointments {
        by_tenant.entry(&appt.tenant_id).or_default().appointments += 1;
    }
    for client in &records.clients {
        by_tenant.entry(&client.tenant_id).or_default().clients += 1;
    }

    let per_tenant: Vec<TenantMetrics> = records
        .tenants
        .iter()
        .map(|tenant| {
            let acc = by_tenant.remove(&tenant.id).unwrap_or_default();
            TenantMetrics {
                tenant:            tenant.clone(),
                revenue:           acc.revenue,
                expenses:          acc.expenses,
                profit:            acc.revenue - acc.expenses,
                appointment_count: acc.appointments,
                client_count:      acc.clients,
            }
        })
        .collect();

    let total_revenue = sum_kind(records, TransactionKind::Revenue);
    let total_expenses = sum_kind(records, TransactionKind::Expense);
    let total_appointments = records.appointments.len();
    let completed_appointments = records
        .appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Completed)
        .count();
    let total_tenants = records.tenants.len();

    let metrics = ConsolidatedMetrics {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
        total_appointments,
        completed_appointments,
        total_clients: records.clients.len(),
        total_tenants,
        average_revenue_per_tenant: ratio_or_zero(total_revenue, total_tenants as f64),
        conversion_rate: percent_or_zero(
            completed_appointments as f64,
            total_appointments as f64,
        ),
        per_tenant,
    };
    log::debug!(
        "Consolidated {} tenants: revenue {:.2}, expenses {:.2}, conversion {:.1}%",
        metrics.total_tenants,
        metrics.total_revenue,
        metrics.total_expenses,
        metrics.conversion_rate
    );
    metrics
}

fn sum_kind(records: &RecordSet, kind: TransactionKind) -> Money {
    records
        .transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

impl ConsolidatedMetrics {
    pub fn tenant(&self, tenant_id: &TenantId) -> Option<&TenantMetrics> {
        self.per_tenant.iter().find(|m| &m.tenant.id == tenant_id)
    }

    /// Tenants ordered by revenue, highest first. Ties break on tenant id.
    pub fn ranking(&self) -> Vec<&TenantMetrics> {
        let mut ranked: Vec<&TenantMetrics> = self.per_tenant.iter().collect();
        ranked.sort_by(|a, b| {
            b.revenue
                .total_cmp(&a.revenue)
                .then_with(|| a.tenant.id.cmp(&b.tenant.id))
        });
        ranked
    }

    /// Revenue summed per subscription tier.
    pub fn revenue_by_tier(&self) -> BTreeMap<SubscriptionTier, Money> {
        let mut tiers = BTreeMap::new();
        for m in &self.per_tenant {
            *tiers.entry(m.tenant.tier).or_insert(0.0) += m.revenue;
        }
        tiers
    }
}

/// Appointment count per status. Every status is present.
pub fn status_counts(appointments: &[Appointment]) -> BTreeMap<AppointmentStatus, usize> {
    let mut counts: BTreeMap<AppointmentStatus, usize> =
        AppointmentStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for appt in appointments {
        *counts.entry(appt.status).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_set_yields_zero_metrics() {
        let m = consolidate(&RecordSet::default());
        assert_eq!(m.total_tenants, 0);
        assert_eq!(m.average_revenue_per_tenant, 0.0);
        assert_eq!(m.conversion_rate, 0.0);
        assert!(m.per_tenant.is_empty());
    }

    #[test]
    fn status_counts_cover_every_status() {
        let counts = status_counts(&[]);
        assert_eq!(counts.len(), AppointmentStatus::ALL.len());
        assert!(counts.values().all(|c| *c == 0));
    }
}
