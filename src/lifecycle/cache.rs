use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::lifecycle::error::CacheError;
use crate::lifecycle::types::{EOL_DATE_FORMAT, LifecycleCycle, parse_eol_date};

#[cfg(test)]
use mockall::automock;

/// Trait for storing and retrieving lifecycle cycles per product
#[cfg_attr(test, automock)]
pub trait CycleStorer: Send + Sync + 'static {
    /// Cycles stored for a product, if they are younger than the refresh interval
    fn get_fresh_cycles(&self, product: &str) -> Result<Option<Vec<LifecycleCycle>>, CacheError>;

    /// Replace all cycles for a product, preserving their order
    fn replace_cycles(&self, product: &str, cycles: &[LifecycleCycle]) -> Result<(), CacheError>;

    /// Remember that the source does not know the product
    fn mark_not_found(&self, product: &str) -> Result<(), CacheError>;

    /// True if the product was recently reported as unknown by the source
    fn is_known_not_found(&self, product: &str) -> Result<bool, CacheError>;

    /// Remove every cached product, returning how many were removed
    fn clear(&self) -> Result<usize, CacheError>;
}

pub struct Cache {
    conn: Mutex<Connection>,
    refresh_interval: i64,
}

impl Cache {
    pub fn new(db_path: &Path, refresh_interval: i64) -> Result<Self, CacheError> {
        info!("Initializing lifecycle cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
            refresh_interval,
        };

        cache.create_schema()?;
        debug!("Lifecycle cache ready");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn is_fresh(&self, updated_at: i64) -> bool {
        Self::current_timestamp_ms() - updated_at <= self.refresh_interval
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product TEXT NOT NULL UNIQUE,
                updated_at INTEGER NOT NULL,
                not_found INTEGER NOT NULL DEFAULT 0
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS cycles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                label TEXT NOT NULL,
                eol TEXT,
                FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
                UNIQUE(product_id, position)
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_cycles_product_id ON cycles(product_id)",
            [],
        )?;

        Ok(())
    }

    /// Returns `(id, updated_at, not_found)` for a product
    fn product_row(
        conn: &Connection,
        product: &str,
    ) -> Result<Option<(i64, i64, bool)>, CacheError> {
        let row = conn
            .query_row(
                "SELECT id, updated_at, not_found FROM products WHERE product = ?1",
                [product],
                |row| Ok((row.get(0)?, row.get(1)?, row.get::<_, i64>(2)? != 0)),
            )
            .optional()?;
        Ok(row)
    }

    fn upsert_product(
        conn: &Connection,
        product: &str,
        not_found: bool,
    ) -> Result<i64, CacheError> {
        conn.execute(
            r#"
            INSERT INTO products (product, updated_at, not_found)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(product) DO UPDATE SET
                updated_at = excluded.updated_at,
                not_found = excluded.not_found
            "#,
            (product, Self::current_timestamp_ms(), not_found as i64),
        )?;

        let id = conn.query_row(
            "SELECT id FROM products WHERE product = ?1",
            [product],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    #[cfg(test)]
    fn set_updated_at(&self, product: &str, updated_at: i64) {
        let conn = self.lock_conn().unwrap();
        conn.execute(
            "UPDATE products SET updated_at = ?1 WHERE product = ?2",
            (updated_at, product),
        )
        .unwrap();
    }
}

impl CycleStorer for Cache {
    fn get_fresh_cycles(&self, product: &str) -> Result<Option<Vec<LifecycleCycle>>, CacheError> {
        let conn = self.lock_conn()?;

        let Some((product_id, updated_at, not_found)) = Self::product_row(&conn, product)? else {
            return Ok(None);
        };

        if not_found || !self.is_fresh(updated_at) {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT label, eol FROM cycles WHERE product_id = ?1 ORDER BY position",
        )?;

        let cycles = stmt
            .query_map([product_id], |row| {
                let label: String = row.get(0)?;
                let eol: Option<String> = row.get(1)?;
                Ok(LifecycleCycle::new(
                    label,
                    eol.as_deref().and_then(parse_eol_date),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(cycles))
    }

    fn replace_cycles(&self, product: &str, cycles: &[LifecycleCycle]) -> Result<(), CacheError> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let product_id = Self::upsert_product(&tx, product, false)?;
        tx.execute("DELETE FROM cycles WHERE product_id = ?1", [product_id])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO cycles (product_id, position, label, eol) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (position, cycle) in cycles.iter().enumerate() {
                let eol = cycle
                    .eol_date
                    .map(|date| date.format(EOL_DATE_FORMAT).to_string());
                stmt.execute((product_id, position as i64, &cycle.label, eol))?;
            }
        }

        tx.commit()?;
        debug!("Cached {} cycles for {}", cycles.len(), product);
        Ok(())
    }

    fn mark_not_found(&self, product: &str) -> Result<(), CacheError> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let product_id = Self::upsert_product(&tx, product, true)?;
        tx.execute("DELETE FROM cycles WHERE product_id = ?1", [product_id])?;

        tx.commit()?;
        Ok(())
    }

    fn is_known_not_found(&self, product: &str) -> Result<bool, CacheError> {
        let conn = self.lock_conn()?;
        let known = Self::product_row(&conn, product)?
            .is_some_and(|(_, updated_at, not_found)| not_found && self.is_fresh(updated_at));
        Ok(known)
    }

    fn clear(&self) -> Result<usize, CacheError> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM cycles", [])?;
        let removed = tx.execute("DELETE FROM products", [])?;

        tx.commit()?;
        info!("Removed {} products from the lifecycle cache", removed);
        Ok(removed)
    }
}
