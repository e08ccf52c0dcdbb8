use super::codec::{decode_date, decode_enum, encode_date};
use crate::{
    error::NaveResult,
    records::{Appointment, AppointmentStatus},
    types::TenantId,
};
use rusqlite::{params, Connection};

pub(super) fn insert(conn: &Connection, a: &Appointment) -> NaveResult<()> {
    conn.execute(
        "INSERT INTO appointment (appointment_id, tenant_id, client_id, date, status, price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            a.id,
            a.tenant_id.as_str(),
            (!a.client_id.is_empty()).then_some(a.client_id.as_str()),
            encode_date(&a.date),
            a.status.as_str(),
            a.price,
        ],
    )?;
    Ok(())
}

type AppointmentRow = (String, String, Option<String>, String, String, f64);

/// All appointments, or only those owned by `tenant_id`.
pub(super) fn select(conn: &Connection, tenant_id: Option<&TenantId>) -> NaveResult<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT appointment_id, tenant_id, client_id, date, status, price
         FROM appointment
         WHERE ?1 IS NULL OR tenant_id = ?1
         ORDER BY rowid ASC",
    )?;
    let rows = stmt
        .query_map(params![tenant_id.map(TenantId::as_str)], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
        })?
        .collect::<Result<Vec<AppointmentRow>, _>>()?;

    rows.into_iter()
        .map(|(id, tenant_id, client_id, date, status, price)| {
            Ok(Appointment {
                id,
                tenant_id: TenantId(tenant_id),
                client_id: client_id.unwrap_or_default(),
                date: decode_date("date", &date)?,
                status: decode_enum("status", &status, AppointmentStatus::parse)?,
                price,
            })
        })
        .collect()
}
