//! Authorization gate in front of a records store.
//!
//! Every per-tenant read goes through `policy::check_access` before the
//! store is touched; the consolidated view goes through
//! `policy::check_consolidated_access`.

use crate::{
    error::NaveResult,
    metrics::{self, ConsolidatedMetrics},
    policy::{self, Actor},
    records::StudioData,
    report::TenantReport,
    store::RecordSource,
    types::TenantId,
};

pub struct AuthorizedStore<'a, S: RecordSource + ?Sized> {
    source: &'a S,
    actor:  Actor,
}

impl<'a, S: RecordSource + ?Sized> AuthorizedStore<'a, S> {
    pub fn new(source: &'a S, actor: Actor) -> Self {
        Self { source, actor }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn studio_data(&self, tenant_id: &TenantId) -> NaveResult<StudioData> {
        policy::check_access(&self.actor, tenant_id)?;
        self.source.studio_data(tenant_id)
    }

    pub fn tenant_report(&self, tenant_id: &TenantId) -> NaveResult<TenantReport> {
        let data = self.studio_data(tenant_id)?;
        Ok(TenantReport::build(&data))
    }

    /// Nave-Mãe rollup across all tenants. Super-admin only.
    pub fn consolidated_metrics(&self) -> NaveResult<ConsolidatedMetrics> {
        policy::check_consolidated_access(&self.actor)?;
        Ok(metrics::consolidate(&self.source.snapshot()?))
    }

    /// Tenants this actor may read: all for a super-admin, the home
    /// tenant for a tenant-admin, none otherwise.
    pub fn visible_tenants(&self) -> NaveResult<Vec<TenantId>> {
        let ids = self.source.tenant_ids()?;
        Ok(ids
            .into_iter()
            .filter(|id| match &self.actor {
                Actor::SuperAdmin => true,
                Actor::TenantAdmin { tenant_id } => tenant_id == id,
                Actor::Other { .. } => false,
            })
            .collect())
    }
}
