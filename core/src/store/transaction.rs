use super::codec::{decode_date, decode_enum, encode_date};
use crate::{
    error::NaveResult,
    records::{Transaction, TransactionKind},
    types::TenantId,
};
use rusqlite::{params, Connection};

pub(super) fn insert(conn: &Connection, t: &Transaction) -> NaveResult<()> {
    conn.execute(
        "INSERT INTO financial_txn (txn_id, tenant_id, date, kind, amount, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.id,
            t.tenant_id.as_str(),
            encode_date(&t.date),
            t.kind.as_str(),
            t.amount,
            t.description,
        ],
    )?;
    Ok(())
}

type TransactionRow = (String, String, String, String, f64, String);

/// All transactions, or only those owned by `tenant_id`.
pub(super) fn select(conn: &Connection, tenant_id: Option<&TenantId>) -> NaveResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT txn_id, tenant_id, date, kind, amount, description
         FROM financial_txn
         WHERE ?1 IS NULL OR tenant_id = ?1
         ORDER BY rowid ASC",
    )?;
    let rows = stmt
        .query_map(params![tenant_id.map(TenantId::as_str)], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
        })?
        .collect::<Result<Vec<TransactionRow>, _>>()?;

    rows.into_iter()
        .map(|(id, tenant_id, date, kind, amount, description)| {
            Ok(Transaction {
                id,
                tenant_id: TenantId(tenant_id),
                date: decode_date("date", &date)?,
                kind: decode_enum("kind", &kind, TransactionKind::parse)?,
                amount,
                description,
            })
        })
        .collect()
}
