//! Tenant registry and operational records.
//!
//! RULE: every record carries its owning `tenant_id`, and that id must
//! name a registered tenant. An appointment's `client_id` is either empty
//! (walk-in) or names a client of the same tenant. Money amounts are
//! finite and non-negative. `RecordSet::validated` is the only way to
//! build a set that the stores accept.

use crate::{
    error::{NaveError, NaveResult},
    types::{EntityId, Money, TenantId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ── Tenant ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic      => "basic",
            Self::Premium    => "premium",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic"      => Some(Self::Basic),
            "premium"    => Some(Self::Premium),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id:    TenantId,
    pub name:  String,
    /// Identity (login e-mail) of the studio's owning admin.
    pub owner: String,
    pub tier:  SubscriptionTier,
}

// ── Appointment ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending   => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending"   => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id:        EntityId,
    pub tenant_id: TenantId,
    pub client_id: EntityId,
    pub date:      NaiveDate,
    pub status:    AppointmentStatus,
    pub price:     Money,
}

// ── Transaction ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Revenue,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id:          EntityId,
    pub tenant_id:   TenantId,
    pub date:        NaiveDate,
    pub kind:        TransactionKind,
    pub amount:      Money,
    #[serde(default)]
    pub description: String,
}

// ── Client ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id:          EntityId,
    pub tenant_id:   TenantId,
    pub name:        String,
    pub total_spent: Money,
    pub visit_count: u32,
}

// ── Record set ─────────────────────────────────────────────────────

/// The full operational record collection for every tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub tenants:      Vec<Tenant>,
    pub appointments: Vec<Appointment>,
    pub transactions: Vec<Transaction>,
    pub clients:      Vec<Client>,
}

/// One tenant's slice of the record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioData {
    pub tenant:       Tenant,
    pub appointments: Vec<Appointment>,
    pub transactions: Vec<Transaction>,
    pub clients:      Vec<Client>,
}

impl RecordSet {
    /// Check the tenant-reference invariant and return the set unchanged.
    pub fn validated(self) -> NaveResult<Self> {
        self.check_references()?;
        Ok(self)
    }

    fn check_references(&self) -> NaveResult<()> {
        let mut known: HashSet<&TenantId> = HashSet::new();
        for tenant in &self.tenants {
            if !known.insert(&tenant.id) {
                return Err(NaveError::DuplicateTenant { tenant_id: tenant.id.clone() });
            }
        }

        let orphan = |kind: &'static str, id: &str, tenant_id: &TenantId| NaveError::OrphanRecord {
            kind,
            record_id: id.to_string(),
            tenant_id: tenant_id.clone(),
        };
        if let Some(a) = self.appointments.iter().find(|a| !known.contains(&a.tenant_id)) {
            return Err(orphan("appointment", &a.id, &a.tenant_id));
        }
        if let Some(t) = self.transactions.iter().find(|t| !known.contains(&t.tenant_id)) {
            return Err(orphan("transaction", &t.id, &t.tenant_id));
        }
        if let Some(c) = self.clients.iter().find(|c| !known.contains(&c.tenant_id)) {
            return Err(orphan("client", &c.id, &c.tenant_id));
        }

        let client_owner: HashMap<&str, &TenantId> =
            self.clients.iter().map(|c| (c.id.as_str(), &c.tenant_id)).collect();
        if let Some(a) = self.appointments.iter().find(|a| {
            !a.client_id.is_empty() && client_owner.get(a.client_id.as_str()) != Some(&&a.tenant_id)
        }) {
            return Err(NaveError::ForeignClient {
                appointment_id: a.id.clone(),
                client_id:      a.client_id.clone(),
                tenant_id:      a.tenant_id.clone(),
            });
        }

        self.check_amounts()
    }

    fn check_amounts(&self) -> NaveResult<()> {
        let invalid = |kind: &'static str, id: &str, amount: Money| NaveError::InvalidAmount {
            kind,
            record_id: id.to_string(),
            amount,
        };
        let bad = |amount: Money| !amount.is_finite() || amount < 0.0;

        if let Some(t) = self.transactions.iter().find(|t| bad(t.amount)) {
            return Err(invalid("transaction", &t.id, t.amount));
        }
        if let Some(a) = self.appointments.iter().find(|a| bad(a.price)) {
            return Err(invalid("appointment", &a.id, a.price));
        }
        if let Some(c) = self.clients.iter().find(|c| bad(c.total_spent)) {
            return Err(invalid("client", &c.id, c.total_spent));
        }
        Ok(())
    }

    pub fn tenant(&self, tenant_id: &TenantId) -> Option<&Tenant> {
        self.tenants.iter().find(|t| &t.id == tenant_id)
    }

    /// Exact-match partition of every collection by `tenant_id`.
    pub fn studio_data(&self, tenant_id: &TenantId) -> NaveResult<StudioData> {
        let tenant = self
            .tenant(tenant_id)
            .cloned()
            .ok_or_else(|| NaveError::UnknownTenant { tenant_id: tenant_id.clone() })?;

        let data = StudioData {
            tenant,
            appointments: owned_by(&self.appointments, tenant_id, |a| &a.tenant_id),
            transactions: owned_by(&self.transactions, tenant_id, |t| &t.tenant_id),
            clients:      owned_by(&self.clients, tenant_id, |c| &c.tenant_id),
        };
        log::debug!(
            "studio_data({tenant_id}): {} appointments, {} transactions, {} clients",
            data.appointments.len(),
            data.transactions.len(),
            data.clients.len()
        );
        Ok(data)
    }
}

fn owned_by<T: Clone>(items: &[T], tenant_id: &TenantId, owner: impl Fn(&T) -> &TenantId) -> Vec<T> {
    items.iter().filter(|item| owner(*item) == tenant_id).cloned().collect()
}

impl StudioData {
    /// True when every record in the slice belongs to `self.tenant`.
    pub fn is_isolated(&self) -> bool {
        let id = &self.tenant.id;
        self.appointments.iter().all(|a| &a.tenant_id == id)
            && self.transactions.iter().all(|t| &t.tenant_id == id)
            && self.clients.iter().all(|c| &c.tenant_id == id)
    }

    pub fn record_count(&self) -> usize {
        self.appointments.len() + self.transactions.len() + self.clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(id: &str) -> Tenant {
        Tenant {
            id:    id.into(),
            name:  format!("Studio {id}"),
            owner: format!("admin@{id}.test"),
            tier:  SubscriptionTier::Basic,
        }
    }

    fn client(id: &str, tenant_id: &str) -> Client {
        Client {
            id:          id.into(),
            tenant_id:   tenant_id.into(),
            name:        "Ana".into(),
            total_spent: 0.0,
            visit_count: 0,
        }
    }

    #[test]
    fn orphan_record_is_rejected() {
        let set = RecordSet {
            tenants: vec![tenant("a")],
            clients: vec![client("c1", "ghost")],
            ..Default::default()
        };
        let err = set.validated().unwrap_err();
        assert!(matches!(err, NaveError::OrphanRecord { kind: "client", .. }));
    }

    fn appointment(id: &str, tenant_id: &str, client_id: &str) -> Appointment {
        Appointment {
            id:        id.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            date:      NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            status:    AppointmentStatus::Completed,
            price:     300.0,
        }
    }

    #[test]
    fn walk_in_appointment_needs_no_client() {
        let set = RecordSet {
            tenants:      vec![tenant("a")],
            appointments: vec![appointment("apt", "a", "")],
            ..Default::default()
        };
        assert!(set.validated().is_ok());
    }

    #[test]
    fn unknown_client_reference_is_rejected() {
        let set = RecordSet {
            tenants:      vec![tenant("a")],
            appointments: vec![appointment("apt", "a", "c9")],
            ..Default::default()
        };
        assert!(matches!(set.validated(), Err(NaveError::ForeignClient { .. })));
    }

    #[test]
    fn non_finite_price_is_rejected() {
        let mut appt = appointment("apt", "a", "");
        appt.price = f64::NAN;
        let set = RecordSet {
            tenants:      vec![tenant("a")],
            appointments: vec![appt],
            ..Default::default()
        };
        assert!(matches!(
            set.validated(),
            Err(NaveError::InvalidAmount { kind: "appointment", .. })
        ));
    }

    #[test]
    fn duplicate_tenant_is_rejected() {
        let set = RecordSet {
            tenants: vec![tenant("a"), tenant("a")],
            ..Default::default()
        };
        assert!(matches!(set.validated(), Err(NaveError::DuplicateTenant { .. })));
    }

    #[test]
    fn unknown_tenant_lookup_fails() {
        let set = RecordSet { tenants: vec![tenant("a")], ..Default::default() };
        assert!(matches!(
            set.studio_data(&"b".into()),
            Err(NaveError::UnknownTenant { .. })
        ));
    }

    #[test]
    fn enum_names_parse_back() {
        for status in AppointmentStatus::ALL {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubscriptionTier::parse("gold"), None);
    }
}
