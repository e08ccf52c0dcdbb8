//! Tenant access policy: the row-level-security analog.
//!
//! RULE: a tenant-admin reads and writes only its own tenant's records.
//! A super-admin (the Nave-Mãe console) may read any tenant.
//! Every other role is denied.

use crate::{
    error::{NaveError, NaveResult},
    types::TenantId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    TenantAdmin { tenant_id: TenantId },
    SuperAdmin,
    Other { role: String },
}

impl Actor {
    pub fn tenant_admin(tenant_id: impl Into<TenantId>) -> Self {
        Self::TenantAdmin { tenant_id: tenant_id.into() }
    }

    /// Parse a free-form role string into an actor.
    /// `home_tenant` is only meaningful for tenant-admin roles.
    pub fn from_role(role: &str, home_tenant: &TenantId) -> Self {
        match role {
            "tenant-admin" | "tenant_admin" | "admin_estudio" => Self::TenantAdmin {
                tenant_id: home_tenant.clone(),
            },
            "super-admin" | "super_admin" | "nave_mae" => Self::SuperAdmin,
            other => Self::Other { role: other.to_string() },
        }
    }

    pub fn role_name(&self) -> &str {
        match self {
            Self::TenantAdmin { .. } => "tenant-admin",
            Self::SuperAdmin         => "super-admin",
            Self::Other { role }     => role,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

/// Decide whether `actor` may access `target`'s data.
pub fn check_access(actor: &Actor, target: &TenantId) -> NaveResult<()> {
    let denial = match actor {
        Actor::SuperAdmin => return Ok(()),
        Actor::TenantAdmin { tenant_id } if tenant_id == target => return Ok(()),
        Actor::TenantAdmin { tenant_id } => NaveError::AccessDenied {
            actor_tenant:  tenant_id.clone(),
            target_tenant: target.clone(),
        },
        Actor::Other { role } => NaveError::RoleDenied {
            role:          role.clone(),
            target_tenant: target.clone(),
        },
    };
    log::warn!("{denial}");
    Err(denial)
}

/// String-role entry point: `Err` iff the role may not reach `target`
/// from `home`.
pub fn simulate_permission_violation(role: &str, home: &str, target: &str) -> NaveResult<()> {
    let actor = Actor::from_role(role, &TenantId::from(home));
    check_access(&actor, &TenantId::from(target))
}

/// Cross-tenant (consolidated) reads are reserved for super-admins.
pub fn check_consolidated_access(actor: &Actor) -> NaveResult<()> {
    if actor.is_super_admin() {
        return Ok(());
    }
    let denial = NaveError::ConsolidatedViewDenied { role: actor.role_name().to_string() };
    log::warn!("{denial}");
    Err(denial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_map_to_actors() {
        let home = TenantId::from("studio_1");
        assert_eq!(Actor::from_role("admin_estudio", &home), Actor::tenant_admin("studio_1"));
        assert_eq!(Actor::from_role("nave_mae", &home), Actor::SuperAdmin);
        assert_eq!(
            Actor::from_role("artist", &home),
            Actor::Other { role: "artist".into() }
        );
    }

    #[test]
    fn other_role_is_denied_even_for_home_tenant() {
        let err = simulate_permission_violation("artist", "studio_1", "studio_1").unwrap_err();
        assert!(matches!(err, NaveError::RoleDenied { .. }));
    }

    #[test]
    fn consolidated_view_requires_super_admin() {
        assert!(check_consolidated_access(&Actor::SuperAdmin).is_ok());
        assert!(check_consolidated_access(&Actor::tenant_admin("studio_1")).is_err());
    }
}
