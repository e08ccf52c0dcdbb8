use super::RecordSource;
use crate::{
    error::NaveResult,
    records::{RecordSet, StudioData},
    types::TenantId,
};

/// A validated record set held in memory. Read-only once built.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: RecordSet,
}

impl MemoryStore {
    /// Validates the tenant-reference invariant before accepting `records`.
    pub fn new(records: RecordSet) -> NaveResult<Self> {
        Ok(Self { records: records.validated()? })
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }
}

impl RecordSource for MemoryStore {
    fn snapshot(&self) -> NaveResult<RecordSet> {
        Ok(self.records.clone())
    }

    fn studio_data(&self, tenant_id: &TenantId) -> NaveResult<StudioData> {
        self.records.studio_data(tenant_id)
    }

    fn tenant_ids(&self) -> NaveResult<Vec<TenantId>> {
        Ok(self.records.tenants.iter().map(|t| t.id.clone()).collect())
    }
}
