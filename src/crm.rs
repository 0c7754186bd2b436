// 🗄️ CRM - where migrated customers end up
// ConsoleCrm reports records to a writer, SqliteCrm commits them to SQLite + audit trail

use crate::config::DataConfig;
use crate::error::StoreError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// CUSTOMER RECORD
// ============================================================================

/// Customer data handed to a store, consumed by the save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub name: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

impl CustomerRecord {
    pub fn new(name: String, postal_code: String, city: String, state: String) -> Self {
        CustomerRecord {
            name,
            postal_code,
            city,
            state,
        }
    }
}

/// A customer row as committed by `SqliteCrm`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCustomer {
    /// Row id (monotonic, one per save)
    pub id: i64,

    /// Identity assigned at save time
    pub customer_id: String,

    pub record: CustomerRecord,
    pub saved_at: DateTime<Utc>,
}

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// CustomerStore - persistence side of the migration
///
/// Every call is a new write. No deduplication, no collision detection.
pub trait CustomerStore: Send + Sync {
    fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError>;
}

impl<T: CustomerStore + ?Sized> CustomerStore for &T {
    fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError> {
        (**self).save_customer(record)
    }
}

impl<T: CustomerStore + ?Sized> CustomerStore for Box<T> {
    fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError> {
        (**self).save_customer(record)
    }
}

impl<T: CustomerStore + ?Sized> CustomerStore for Arc<T> {
    fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError> {
        (**self).save_customer(record)
    }
}

// ============================================================================
// CONSOLE CRM (report-only stub)
// ============================================================================

/// Stub CRM: writes a short report per saved customer
pub struct ConsoleCrm<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleCrm<Stdout> {
    pub fn stdout() -> Self {
        ConsoleCrm::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleCrm<W> {
    pub fn new(out: W) -> Self {
        ConsoleCrm {
            out: Mutex::new(out),
        }
    }

    /// Give back the writer (tests read the report from it)
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> CustomerStore for ConsoleCrm<W> {
    fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| StoreError::Unavailable("console writer lock poisoned".to_string()))?;

        writeln!(out, "Customer Saved on CRM System..")?;
        writeln!(out, "Name: {}", record.name)?;
        writeln!(out, "CEP: {}", record.postal_code)?;
        writeln!(out, "State: {}", record.state)?;
        writeln!(out, "City: {}", record.city)?;
        out.flush()?;

        tracing::info!(name = %record.name, postal_code = %record.postal_code, "customer reported");
        Ok(())
    }
}

// ============================================================================
// DATABASE (schema + row functions)
// ============================================================================

/// Schema, in creation order. No unique key on name/postal_code: every save is a row.
const SCHEMA_SQL: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        customer_id TEXT UNIQUE NOT NULL,
        name TEXT NOT NULL,
        postal_code TEXT NOT NULL,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        saved_at TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS customer_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id TEXT UNIQUE NOT NULL,
        customer_id TEXT NOT NULL REFERENCES customers(customer_id),
        kind TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        payload TEXT NOT NULL,
        actor TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_customers_postal_code ON customers(postal_code)",
    "CREATE INDEX IF NOT EXISTS idx_customer_events_customer ON customer_events(customer_id)",
];

const INSERT_CUSTOMER_SQL: &str = "INSERT INTO customers (
        customer_id, name, postal_code, city, state, saved_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const INSERT_EVENT_SQL: &str = "INSERT INTO customer_events (
        event_id, customer_id, kind, recorded_at, payload, actor
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const SELECT_CUSTOMERS_SQL: &str = "SELECT id, customer_id, name, postal_code, city, state, saved_at
    FROM customers
    ORDER BY id ASC";

const COUNT_CUSTOMERS_SQL: &str = "SELECT COUNT(*) FROM customers";

const SELECT_EVENTS_SQL: &str = "SELECT event_id, customer_id, kind, recorded_at, payload, actor
    FROM customer_events
    WHERE customer_id = ?1
    ORDER BY id DESC";

/// Who writes migration events
pub const MIGRATION_ACTOR: &str = "customer_migration";

/// Audit entry stored next to a customer row
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomerEvent {
    pub event_id: String,
    pub customer_id: String,
    pub kind: String,
    pub recorded_at: DateTime<Utc>,
    pub payload: serde_json::Value,
    pub actor: String,
}

impl CustomerEvent {
    pub const SAVED: &'static str = "customer_saved";

    /// The event appended when `record` is committed as `customer_id`
    pub fn saved(customer_id: &str, record: &CustomerRecord, recorded_at: DateTime<Utc>) -> Self {
        CustomerEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            kind: Self::SAVED.to_string(),
            recorded_at,
            payload: serde_json::json!({
                "name": record.name,
                "postal_code": record.postal_code,
                "city": record.city,
                "state": record.state,
            }),
            actor: MIGRATION_ACTOR.to_string(),
        }
    }
}

pub fn setup_database(conn: &Connection) -> rusqlite::Result<()> {
    for sql in SCHEMA_SQL {
        conn.execute(sql, [])?;
    }

    Ok(())
}

/// Insert one customer row plus its `customer_saved` event
pub fn insert_customer(conn: &Connection, record: CustomerRecord) -> Result<StoredCustomer, StoreError> {
    let customer_id = uuid::Uuid::new_v4().to_string();
    let saved_at = Utc::now();

    conn.execute(
        INSERT_CUSTOMER_SQL,
        params![
            customer_id,
            record.name,
            record.postal_code,
            record.city,
            record.state,
            saved_at.to_rfc3339(),
        ],
    )?;
    let id = conn.last_insert_rowid();

    append_event(conn, &CustomerEvent::saved(&customer_id, &record, saved_at))?;

    Ok(StoredCustomer {
        id,
        customer_id,
        record,
        saved_at,
    })
}

pub fn append_event(conn: &Connection, event: &CustomerEvent) -> Result<(), StoreError> {
    conn.execute(
        INSERT_EVENT_SQL,
        params![
            event.event_id,
            event.customer_id,
            event.kind,
            event.recorded_at.to_rfc3339(),
            serde_json::to_string(&event.payload)?,
            event.actor,
        ],
    )?;

    Ok(())
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

pub fn get_all_customers(conn: &Connection) -> Result<Vec<StoredCustomer>, StoreError> {
    let mut stmt = conn.prepare(SELECT_CUSTOMERS_SQL)?;

    let customers = stmt
        .query_map([], |row| {
            let saved_at: String = row.get(6)?;

            Ok(StoredCustomer {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                record: CustomerRecord {
                    name: row.get(2)?,
                    postal_code: row.get(3)?,
                    city: row.get(4)?,
                    state: row.get(5)?,
                },
                saved_at: parse_timestamp(6, &saved_at)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(customers)
}

pub fn count_customers(conn: &Connection) -> Result<i64, StoreError> {
    let count: i64 = conn.query_row(COUNT_CUSTOMERS_SQL, [], |row| row.get(0))?;

    Ok(count)
}

/// Audit events for one customer, newest first
pub fn get_events_for_customer(conn: &Connection, customer_id: &str) -> Result<Vec<CustomerEvent>, StoreError> {
    let mut stmt = conn.prepare(SELECT_EVENTS_SQL)?;

    let events = stmt
        .query_map(params![customer_id], |row| {
            let recorded_at: String = row.get(3)?;
            let payload: String = row.get(4)?;

            Ok(CustomerEvent {
                event_id: row.get(0)?,
                customer_id: row.get(1)?,
                kind: row.get(2)?,
                recorded_at: parse_timestamp(3, &recorded_at)?,
                payload: serde_json::from_str(&payload).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
                })?,
                actor: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

// ============================================================================
// SQLITE CRM
// ============================================================================

/// CRM backed by SQLite
///
/// One connection behind a mutex; concurrent saves are serialized.
pub struct SqliteCrm {
    conn: Mutex<Connection>,
    show_sql: bool,
}

impl SqliteCrm {
    /// Open the database named in `config` (in-memory when no path is set)
    pub fn open(config: &DataConfig) -> Result<Self> {
        let conn = match &config.database_path {
            Some(path) => {
                let conn = Connection::open(path)
                    .with_context(|| format!("Failed to open customer database: {}", path.display()))?;
                let mode: String = conn
                    .pragma_update_and_check(None, "journal_mode", &config.journal_mode, |row| {
                        row.get(0)
                    })
                    .context("Failed to set journal mode")?;
                tracing::debug!(path = %path.display(), journal_mode = %mode, "customer database opened");
                conn
            }
            None => Connection::open_in_memory().context("Failed to open in-memory database")?,
        };

        Self::from_connection(conn, config)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(&DataConfig::default())
    }

    /// Wrap an existing connection, creating tables if `generate_ddl` is set
    pub fn from_connection(conn: Connection, config: &DataConfig) -> Result<Self> {
        let crm = SqliteCrm {
            conn: Mutex::new(conn),
            show_sql: config.show_sql,
        };

        if config.generate_ddl {
            SCHEMA_SQL.iter().for_each(|sql| crm.log_sql(sql));
            setup_database(&*crm.lock()?).context("Failed to create customer schema")?;
        }

        Ok(crm)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("database connection lock poisoned".to_string()))
    }

    fn log_sql(&self, sql: &str) {
        if self.show_sql {
            tracing::debug!(target: "sql", "{}", sql);
        }
    }

    /// Same as `save_customer`, but hands back the committed row
    pub fn insert(&self, record: CustomerRecord) -> Result<StoredCustomer, StoreError> {
        let mut conn = self.lock()?;
        self.log_sql(INSERT_CUSTOMER_SQL);
        self.log_sql(INSERT_EVENT_SQL);

        // Customer row and its event commit together
        let tx = conn.transaction()?;
        let stored = insert_customer(&tx, record)?;
        tx.commit()?;

        tracing::info!(
            customer_id = %stored.customer_id,
            name = %stored.record.name,
            postal_code = %stored.record.postal_code,
            "customer saved"
        );
        Ok(stored)
    }

    pub fn get_all_customers(&self) -> Result<Vec<StoredCustomer>, StoreError> {
        let conn = self.lock()?;
        self.log_sql(SELECT_CUSTOMERS_SQL);
        get_all_customers(&conn)
    }

    pub fn count_customers(&self) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        self.log_sql(COUNT_CUSTOMERS_SQL);
        count_customers(&conn)
    }

    pub fn get_events_for_customer(&self, customer_id: &str) -> Result<Vec<CustomerEvent>, StoreError> {
        let conn = self.lock()?;
        self.log_sql(SELECT_EVENTS_SQL);
        get_events_for_customer(&conn, customer_id)
    }
}

impl CustomerStore for SqliteCrm {
    fn save_customer(&self, record: CustomerRecord) -> Result<(), StoreError> {
        self.insert(record).map(|_| ())
    }
}
