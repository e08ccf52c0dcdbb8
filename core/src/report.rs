//! Per-tenant financial report.
//!
//! Built from a single tenant's `StudioData`, so a report can never mix
//! in another tenant's records.

use crate::{
    metrics,
    records::{AppointmentStatus, Client, StudioData, TransactionKind},
    types::{ratio_or_zero, Money, TenantId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub revenue:  Money,
    pub expenses: Money,
}

impl MonthlyTotals {
    pub fn profit(&self) -> Money {
        self.revenue - self.expenses
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantReport {
    pub tenant_id:      TenantId,
    pub tenant_name:    String,
    /// Keyed by `YYYY-MM`, ascending.
    pub months:         BTreeMap<String, MonthlyTotals>,
    pub revenue:        Money,
    pub expenses:       Money,
    pub profit:         Money,
    pub status_counts:  BTreeMap<AppointmentStatus, usize>,
    /// Revenue ÷ completed appointments.
    pub average_ticket: Money,
    pub top_client:     Option<Client>,
}

impl TenantReport {
    pub fn build(data: &StudioData) -> Self {
        let mut months: BTreeMap<String, MonthlyTotals> = BTreeMap::new();
        for txn in &data.transactions {
            let bucket = months.entry(txn.date.format("%Y-%m").to_string()).or_default();
            match txn.kind {
                TransactionKind::Revenue => bucket.revenue  += txn.amount,
                TransactionKind::Expense => bucket.expenses += txn.amount,
            }
        }
        let revenue: Money = months.values().map(|m| m.revenue).sum();
        let expenses: Money = months.values().map(|m| m.expenses).sum();

        let status_counts = metrics::status_counts(&data.appointments);
        let completed = status_counts
            .get(&AppointmentStatus::Completed)
            .copied()
            .unwrap_or(0);

        // Highest spend wins; ties go to the lower client id.
        let top_client = data
            .clients
            .iter()
            .max_by(|a, b| {
                a.total_spent
                    .total_cmp(&b.total_spent)
                    .then_with(|| b.id.cmp(&a.id))
            })
            .cloned();

        Self {
            tenant_id: data.tenant.id.clone(),
            tenant_name: data.tenant.name.clone(),
            months,
            revenue,
            expenses,
            profit: revenue - expenses,
            status_counts,
            average_ticket: ratio_or_zero(revenue, completed as f64),
            top_client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{SubscriptionTier, Tenant};

    #[test]
    fn empty_studio_report_has_zero_ticket() {
        let data = StudioData {
            tenant: Tenant {
                id:    "studio_x".into(),
                name:  "Empty".into(),
                owner: "admin@empty.test".into(),
                tier:  SubscriptionTier::Basic,
            },
            appointments: vec![],
            transactions: vec![],
            clients:      vec![],
        };
        let report = TenantReport::build(&data);
        assert_eq!(report.average_ticket, 0.0);
        assert!(report.months.is_empty());
        assert!(report.top_client.is_none());
    }
}
