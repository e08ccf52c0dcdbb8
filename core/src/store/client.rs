use crate::{error::NaveResult, records::Client, types::TenantId};
use rusqlite::{params, Connection};

pub(super) fn insert(conn: &Connection, c: &Client) -> NaveResult<()> {
    conn.execute(
        "INSERT INTO client (client_id, tenant_id, name, total_spent, visit_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![c.id, c.tenant_id.as_str(), c.name, c.total_spent, c.visit_count],
    )?;
    Ok(())
}

/// All clients, or only those owned by `tenant_id`.
pub(super) fn select(conn: &Connection, tenant_id: Option<&TenantId>) -> NaveResult<Vec<Client>> {
    let mut stmt = conn.prepare(
        "SELECT client_id, tenant_id, name, total_spent, visit_count
         FROM client
         WHERE ?1 IS NULL OR tenant_id = ?1
         ORDER BY rowid ASC",
    )?;
    let clients = stmt
        .query_map(params![tenant_id.map(TenantId::as_str)], |r| {
            Ok(Client {
                id:          r.get(0)?,
                tenant_id:   TenantId(r.get(1)?),
                name:        r.get(2)?,
                total_spent: r.get(3)?,
                visit_count: r.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clients)
}
