use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use std::time::Duration;

use keeper_core::{Error, KeyValueStore, Result};

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const POOL_SIZE: u32 = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Key-value store in a SQLite file, one row per key.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `database_url` and make sure the table exists.
    pub fn open(database_url: &str) -> Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(POOL_SIZE)
            .connection_customizer(Box::new(Pragmas {
                busy_timeout: BUSY_TIMEOUT,
            }))
            .build(manager)
            .map_err(|e| Error::PersistenceError(format!("cannot open {}: {}", database_url, e)))?;

        let store = Self { pool };
        store.create_tables()?;
        tracing::info!("Opened key-value store at {}", database_url);
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        let mut conn = self.connection()?;
        conn.batch_execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub(crate) fn connection(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|e| Error::PersistenceError(e.to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        use keeper_core::schema::kv_store;
        let mut conn = self.connection()?;
        let value = kv_store::table
            .find(key)
            .select(kv_store::value)
            .first::<String>(&mut *conn)
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        use keeper_core::schema::kv_store;
        let mut conn = self.connection()?;
        diesel::replace_into(kv_store::table)
            .values((kv_store::key.eq(key), kv_store::value.eq(value)))
            .execute(&mut *conn)?;
        Ok(())
    }
}

// MARK: Connection

/// Applied to every pooled connection.
#[derive(Debug)]
struct Pragmas {
    busy_timeout: Duration,
}

impl Pragmas {
    fn statements(&self) -> String {
        format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout.as_millis()
        )
    }
}

impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for Pragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.statements())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}
