//! Records store: where tenant data comes from.
//!
//! RULE: aggregation and reporting code takes a `RecordSource`, never a
//! concrete store. `MemoryStore` serves the fixture; `SqlStore` serves
//! the same records from SQLite. Only this module talks to the database.

use crate::{
    error::NaveResult,
    records::{RecordSet, StudioData},
    types::TenantId,
};
use rusqlite::Connection;

mod appointment;
mod client;
mod codec;
mod memory;
mod tenant;
mod transaction;

pub use memory::MemoryStore;

/// Raw read access to the tenant registry and operational records.
///
/// No access policy is applied here. Application code reads through
/// `gate::AuthorizedStore`, which checks the actor before delegating;
/// direct calls belong to the gate itself, the harness and store tests.
pub trait RecordSource {
    /// Every tenant and record. Used by the consolidated view.
    fn snapshot(&self) -> NaveResult<RecordSet>;

    /// One tenant's records, filtered by exact `tenant_id` match.
    /// Fails with `UnknownTenant` for an unregistered id.
    fn studio_data(&self, tenant_id: &TenantId) -> NaveResult<StudioData>;

    /// Registered tenant ids in registry order.
    fn tenant_ids(&self) -> NaveResult<Vec<TenantId>>;
}

pub struct SqlStore {
    conn: Connection,
}

impl SqlStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> NaveResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> NaveResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> NaveResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Replace the stored records with `records` in one transaction.
    /// Seeding an existing database swaps its contents, so the same file
    /// can be reseeded on every run. Foreign keys reject any record whose
    /// tenant is not registered and any appointment whose client belongs
    /// to another tenant; on error the previous contents are kept.
    pub fn seed(&mut self, records: &RecordSet) -> NaveResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM appointment;
             DELETE FROM financial_txn;
             DELETE FROM client;
             DELETE FROM tenant;",
        )?;
        for t in &records.tenants {
            tenant::insert(&tx, t)?;
        }
        for c in &records.clients {
            client::insert(&tx, c)?;
        }
        for a in &records.appointments {
            appointment::insert(&tx, a)?;
        }
        for t in &records.transactions {
            transaction::insert(&tx, t)?;
        }
        tx.commit()?;
        log::info!(
            "Seeded store: {} tenants, {} appointments, {} transactions, {} clients",
            records.tenants.len(),
            records.appointments.len(),
            records.transactions.len(),
            records.clients.len()
        );
        Ok(())
    }

    /// Open an in-memory store, migrate it and seed it in one step.
    pub fn seeded_in_memory(records: &RecordSet) -> NaveResult<Self> {
        let mut store = Self::in_memory()?;
        store.migrate()?;
        store.seed(records)?;
        Ok(store)
    }
}

impl RecordSource for SqlStore {
    fn snapshot(&self) -> NaveResult<RecordSet> {
        Ok(RecordSet {
            tenants:      tenant::all(&self.conn)?,
            appointments: appointment::select(&self.conn, None)?,
            transactions: transaction::select(&self.conn, None)?,
            clients:      client::select(&self.conn, None)?,
        })
    }

    fn studio_data(&self, tenant_id: &TenantId) -> NaveResult<StudioData> {
        let tenant = tenant::get(&self.conn, tenant_id)?;
        let data = StudioData {
            tenant,
            appointments: appointment::select(&self.conn, Some(tenant_id))?,
            transactions: transaction::select(&self.conn, Some(tenant_id))?,
            clients:      client::select(&self.conn, Some(tenant_id))?,
        };
        log::debug!("studio_data({tenant_id}) from sqlite: {} records", data.record_count());
        Ok(data)
    }

    fn tenant_ids(&self) -> NaveResult<Vec<TenantId>> {
        Ok(tenant::all(&self.conn)?.into_iter().map(|t| t.id).collect())
    }
}
