//! Seeded synthetic population for scaled performance runs.
//!
//! Produces a validated `RecordSet` with the same shape as the fixture:
//! tenant ids `syn_<n>`, every record tagged with one of them.

use crate::{
    config::SyntheticConfig,
    error::NaveResult,
    name_generator::NameGenerator,
    records::{
        Appointment, AppointmentStatus, Client, RecordSet, SubscriptionTier, Tenant,
        Transaction, TransactionKind,
    },
    rng::{RngBank, StreamSlot},
    types::TenantId,
};
use chrono::{Days, NaiveDate};

const TIERS: [SubscriptionTier; 3] = [
    SubscriptionTier::Basic,
    SubscriptionTier::Premium,
    SubscriptionTier::Enterprise,
];

/// Records start on this date and spread over one year.
fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

pub fn generate(cfg: &SyntheticConfig) -> NaveResult<RecordSet> {
    let bank = RngBank::new(cfg.seed);
    let mut tenant_rng = bank.for_slot(StreamSlot::Tenants);
    let mut appt_rng = bank.for_slot(StreamSlot::Appointments);
    let mut txn_rng = bank.for_slot(StreamSlot::Transactions);
    let mut client_rng = bank.for_slot(StreamSlot::Clients);

    let mut set = RecordSet::default();
    for n in 0..cfg.tenants {
        let tenant_id = TenantId(format!("syn_{n}"));
        set.tenants.push(Tenant {
            id:    tenant_id.clone(),
            name:  NameGenerator::generate_studio_name(&mut tenant_rng),
            owner: format!("admin@syn{n}.test"),
            tier:  *tenant_rng.pick(&TIERS),
        });

        let client_ids: Vec<String> = (0..cfg.clients_per_tenant)
            .map(|c| format!("syn_{n}_client_{c}"))
            .collect();
        for id in &client_ids {
            let visits = client_rng.next_u64_below(6) as u32;
            set.clients.push(Client {
                id:          id.clone(),
                tenant_id:   tenant_id.clone(),
                name:        NameGenerator::generate_full_name(&mut client_rng),
                total_spent: visits as f64 * client_rng.amount(150, 900),
                visit_count: visits,
            });
        }

        for a in 0..cfg.appointments_per_tenant {
            let client_id = if client_ids.is_empty() {
                String::new()
            } else {
                appt_rng.pick(&client_ids).clone()
            };
            set.appointments.push(Appointment {
                id: format!("syn_{n}_apt_{a}"),
                tenant_id: tenant_id.clone(),
                client_id,
                date: random_day(&mut appt_rng),
                status: *appt_rng.pick(&AppointmentStatus::ALL),
                price: appt_rng.amount(150, 2500),
            });
        }

        for t in 0..cfg.transactions_per_tenant {
            let (kind, amount) = if txn_rng.chance(0.75) {
                (TransactionKind::Revenue, txn_rng.amount(150, 2500))
            } else {
                (TransactionKind::Expense, txn_rng.amount(20, 600))
            };
            set.transactions.push(Transaction {
                id: format!("syn_{n}_txn_{t}"),
                tenant_id: tenant_id.clone(),
                date: random_day(&mut txn_rng),
                kind,
                amount,
                description: String::new(),
            });
        }
    }

    log::debug!(
        "Generated synthetic population (seed {}): {} tenants, {} records",
        cfg.seed,
        set.tenants.len(),
        set.appointments.len() + set.transactions.len() + set.clients.len()
    );
    set.validated()
}

fn random_day(rng: &mut crate::rng::StreamRng) -> NaiveDate {
    let offset = rng.next_u64_below(365);
    epoch()
        .checked_add_days(Days::new(offset))
        .unwrap_or_else(epoch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NaveConfig;

    #[test]
    fn same_seed_same_population() {
        let cfg = NaveConfig::default_test().synthetic;
        let a = generate(&cfg).unwrap();
        let b = generate(&cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.tenants.len(), cfg.tenants);
        assert_eq!(a.clients.len(), cfg.tenants * cfg.clients_per_tenant);
    }
}
