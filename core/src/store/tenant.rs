use super::codec::decode_enum;
use crate::{
    error::{NaveError, NaveResult},
    records::{SubscriptionTier, Tenant},
    types::TenantId,
};
use rusqlite::{params, Connection, OptionalExtension};

pub(super) fn insert(conn: &Connection, t: &Tenant) -> NaveResult<()> {
    conn.execute(
        "INSERT INTO tenant (tenant_id, name, owner, tier) VALUES (?1, ?2, ?3, ?4)",
        params![t.id.as_str(), t.name, t.owner, t.tier.as_str()],
    )?;
    Ok(())
}

type TenantRow = (String, String, String, String);

fn decode((id, name, owner, tier): TenantRow) -> NaveResult<Tenant> {
    Ok(Tenant {
        id: TenantId(id),
        name,
        owner,
        tier: decode_enum("tier", &tier, SubscriptionTier::parse)?,
    })
}

/// Registry order is insertion order.
pub(super) fn all(conn: &Connection) -> NaveResult<Vec<Tenant>> {
    let mut stmt = conn.prepare(
        "SELECT tenant_id, name, owner, tier FROM tenant ORDER BY rowid ASC",
    )?;
    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))?
        .collect::<Result<Vec<TenantRow>, _>>()?;
    rows.into_iter().map(decode).collect()
}

pub(super) fn get(conn: &Connection, tenant_id: &TenantId) -> NaveResult<Tenant> {
    let row: Option<TenantRow> = conn
        .query_row(
            "SELECT tenant_id, name, owner, tier FROM tenant WHERE tenant_id = ?1",
            params![tenant_id.as_str()],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .optional()?;
    match row {
        Some(row) => decode(row),
        None => Err(NaveError::UnknownTenant { tenant_id: tenant_id.clone() }),
    }
}
