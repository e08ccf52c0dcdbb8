//! Per-tenant partitioning of the records store.

use navemae_core::{
    error::NaveError,
    fixture::Fixture,
    store::{MemoryStore, RecordSource},
    types::TenantId,
};

fn store() -> MemoryStore {
    MemoryStore::new(Fixture::builtin().unwrap()).unwrap()
}

#[test]
fn studio_2_gets_exactly_its_records() {
    let data = store().studio_data(&"studio_2".into()).unwrap();

    assert_eq!(data.tenant.name, "Ink Garden Studio");
    assert_eq!(data.appointments.len(), 2);
    assert_eq!(data.transactions.len(), 3);
    assert_eq!(data.clients.len(), 2);

    let mut appt_ids: Vec<&str> = data.appointments.iter().map(|a| a.id.as_str()).collect();
    appt_ids.sort();
    assert_eq!(appt_ids, vec!["apt_4", "apt_5"]);
}

#[test]
fn no_partition_contains_another_tenants_records() {
    let store = store();
    let ids = store.tenant_ids().unwrap();

    for a in &ids {
        let data = store.studio_data(a).unwrap();
        assert!(data.is_isolated(), "{a} leaked records");
        for b in ids.iter().filter(|b| *b != a) {
            assert!(data.appointments.iter().all(|x| &x.tenant_id != b));
            assert!(data.transactions.iter().all(|x| &x.tenant_id != b));
            assert!(data.clients.iter().all(|x| &x.tenant_id != b));
        }
    }
}

#[test]
fn partitions_cover_every_record_once() {
    let store = store();
    let total: usize = store
        .tenant_ids()
        .unwrap()
        .iter()
        .map(|id| store.studio_data(id).unwrap().record_count())
        .sum();

    assert_eq!(total, 9 + 12 + 9);
}

#[test]
fn tenant_id_match_is_exact() {
    let store = store();
    for lookup in ["studio", "studio_", "STUDIO_2", "studio_2 ", "studio_20"] {
        let err = store.studio_data(&TenantId::from(lookup)).unwrap_err();
        assert!(matches!(err, NaveError::UnknownTenant { .. }), "lookup {lookup:?}");
    }
}

#[test]
fn store_rejects_orphan_records() {
    let mut set = Fixture::builtin().unwrap();
    set.clients[0].tenant_id = "studio_99".into();

    let err = MemoryStore::new(set).unwrap_err();
    assert!(matches!(err, NaveError::OrphanRecord { kind: "client", .. }));
}

#[test]
fn store_rejects_appointment_with_another_tenants_client() {
    let mut set = Fixture::builtin().unwrap();
    // apt_1 is studio_1's; client_3 is studio_2's.
    set.appointments[0].client_id = "client_3".into();

    let err = MemoryStore::new(set).unwrap_err();
    match err {
        NaveError::ForeignClient { appointment_id, client_id, tenant_id } => {
            assert_eq!(appointment_id, "apt_1");
            assert_eq!(client_id, "client_3");
            assert_eq!(tenant_id, TenantId::from("studio_1"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn appointment_clients_stay_inside_their_studio() {
    let store = store();
    for id in store.tenant_ids().unwrap() {
        let data = store.studio_data(&id).unwrap();
        for appt in data.appointments.iter().filter(|a| !a.client_id.is_empty()) {
            assert!(
                data.clients.iter().any(|c| c.id == appt.client_id),
                "{} in {id} points outside the studio",
                appt.id
            );
        }
    }
}

#[test]
fn store_rejects_negative_transaction_amount() {
    let mut set = Fixture::builtin().unwrap();
    set.transactions[0].amount = -200.0;
    let txn_id = set.transactions[0].id.clone();

    let err = MemoryStore::new(set).unwrap_err();
    match err {
        NaveError::InvalidAmount { kind, record_id, amount } => {
            assert_eq!(kind, "transaction");
            assert_eq!(record_id, txn_id);
            assert_eq!(amount, -200.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}
