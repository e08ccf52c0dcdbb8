//! Consolidated (Nave-Mãe) metrics over the five-studio fixture.

use navemae_core::{
    fixture::Fixture,
    metrics::consolidate,
    records::{
        Appointment, AppointmentStatus, RecordSet, SubscriptionTier, Tenant,
    },
};
use chrono::NaiveDate;

#[test]
fn fixture_totals_match_known_values() {
    let m = consolidate(&Fixture::builtin().unwrap());

    assert_eq!(m.total_tenants, 5);
    assert_eq!(m.total_appointments, 9);
    assert_eq!(m.total_clients, 9);
    assert_eq!(m.total_revenue, 6620.0);
    assert_eq!(m.total_expenses, 850.0);
    assert_eq!(m.net_profit, 5770.0);
    assert_eq!(m.average_revenue_per_tenant, 1324.0);
}

#[test]
fn per_tenant_revenue_sums_to_total() {
    let m = consolidate(&Fixture::builtin().unwrap());

    let sum: f64 = m.per_tenant.iter().map(|t| t.revenue).sum();
    assert_eq!(sum, m.total_revenue);
    assert_eq!(m.per_tenant.len(), 5);
    for t in &m.per_tenant {
        assert_eq!(t.profit, t.revenue - t.expenses, "profit mismatch for {}", t.tenant.id);
    }
}

#[test]
fn conversion_rate_counts_completed_appointments() {
    let m = consolidate(&Fixture::builtin().unwrap());

    assert_eq!(m.completed_appointments, 5);
    let expected = 5.0 / 9.0 * 100.0;
    assert!((m.conversion_rate - expected).abs() < 1e-9);
}

#[test]
fn studio_2_breakdown() {
    let m = consolidate(&Fixture::builtin().unwrap());
    let s2 = m.tenant(&"studio_2".into()).expect("studio_2 present");

    assert_eq!(s2.revenue, 1550.0);
    assert_eq!(s2.expenses, 150.0);
    assert_eq!(s2.profit, 1400.0);
    assert_eq!(s2.appointment_count, 2);
    assert_eq!(s2.client_count, 2);
}

#[test]
fn empty_store_yields_zero_ratios() {
    let m = consolidate(&RecordSet::default());

    assert_eq!(m.average_revenue_per_tenant, 0.0);
    assert_eq!(m.conversion_rate, 0.0);
    assert!(!m.average_revenue_per_tenant.is_nan());
}

#[test]
fn tenants_without_appointments_have_zero_conversion() {
    let set = RecordSet {
        tenants: vec![Tenant {
            id:    "solo".into(),
            name:  "Solo Ink".into(),
            owner: "admin@solo.test".into(),
            tier:  SubscriptionTier::Basic,
        }],
        ..Default::default()
    };
    let m = consolidate(&set);
    assert_eq!(m.total_tenants, 1);
    assert_eq!(m.conversion_rate, 0.0);
    assert_eq!(m.per_tenant[0].appointment_count, 0);
}

#[test]
fn all_completed_gives_exactly_one_hundred_percent() {
    let mut set = Fixture::builtin().unwrap();
    for appt in &mut set.appointments {
        appt.status = AppointmentStatus::Completed;
    }
    set.appointments.push(Appointment {
        id:        "apt_extra".into(),
        tenant_id: "studio_4".into(),
        client_id: "client_8".into(),
        date:      NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        status:    AppointmentStatus::Completed,
        price:     300.0,
    });

    assert_eq!(consolidate(&set).conversion_rate, 100.0);
}

#[test]
fn ranking_orders_by_revenue_then_id() {
    let m = consolidate(&Fixture::builtin().unwrap());
    let order: Vec<&str> = m.ranking().iter().map(|t| t.tenant.id.as_str()).collect();

    assert_eq!(order, vec!["studio_1", "studio_2", "studio_3", "studio_5", "studio_4"]);
}

#[test]
fn revenue_by_tier_partitions_total() {
    let m = consolidate(&Fixture::builtin().unwrap());
    let tiers = m.revenue_by_tier();

    assert_eq!(tiers[&SubscriptionTier::Basic], 2250.0);
    assert_eq!(tiers[&SubscriptionTier::Premium], 2870.0);
    assert_eq!(tiers[&SubscriptionTier::Enterprise], 1500.0);
    assert_eq!(tiers.values().sum::<f64>(), m.total_revenue);
}
