use crate::types::TenantId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NaveError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Access denied: tenant '{actor_tenant}' may not access data of tenant '{target_tenant}'")]
    AccessDenied {
        actor_tenant:  TenantId,
        target_tenant: TenantId,
    },

    #[error("Access denied: role '{role}' has no access to tenant '{target_tenant}'")]
    RoleDenied {
        role:          String,
        target_tenant: TenantId,
    },

    #[error("Consolidated view requires super-admin scope (actor role '{role}')")]
    ConsolidatedViewDenied { role: String },

    #[error("Tenant '{tenant_id}' not found")]
    UnknownTenant { tenant_id: TenantId },

    #[error("Tenant '{tenant_id}' registered twice")]
    DuplicateTenant { tenant_id: TenantId },

    #[error("{kind} '{record_id}' references unknown tenant '{tenant_id}'")]
    OrphanRecord {
        kind:      &'static str,
        record_id: String,
        tenant_id: TenantId,
    },

    #[error("appointment '{appointment_id}' of tenant '{tenant_id}' references client '{client_id}' outside that tenant")]
    ForeignClient {
        appointment_id: String,
        client_id:      String,
        tenant_id:      TenantId,
    },

    #[error("{kind} '{record_id}' has invalid amount {amount}")]
    InvalidAmount {
        kind:      &'static str,
        record_id: String,
        amount:    f64,
    },

    #[error("Invalid stored value in column '{column}': {value}")]
    InvalidColumn { column: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type NaveResult<T> = Result<T, NaveError>;
