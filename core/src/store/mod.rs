//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The reset driver, fixture and seed loader call store methods; raw SQL
//! elsewhere goes through `execute`/`query`.

mod account;
mod instrument;
mod position;
mod user;

use crate::{error::AlexResult, types::Row};
use bigdecimal::BigDecimal;
use rusqlite::{types::ValueRef, Connection, OpenFlags};
use serde_json::{Number, Value};
use std::str::FromStr;

pub use account::AccountRow;
pub use instrument::InstrumentRow;
pub use position::PositionRow;
pub use user::UserRow;

/// Schema files, applied in order by `migrate()`.
pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_portfolio",
    include_str!("../../../migrations/001_portfolio.sql"),
)];

pub struct AlexStore {
    conn: Connection,
}

impl AlexStore {
    /// Open (or create) the database at `path`. `file:` URIs are accepted,
    /// which lets tests share one in-memory database between connections.
    pub fn open(path: &str) -> AlexResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        // The migration and seed processes write this file while this
        // connection stays open. In-memory databases report "memory" and
        // keep working without WAL.
        let journal: String = conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .unwrap_or_else(|_| "unknown".to_string());
        let store = Self::configure(conn)?;
        log::debug!("opened {path} (journal_mode={journal})");
        Ok(store)
    }

    /// Open a private in-memory database (used in tests).
    pub fn in_memory() -> AlexResult<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> AlexResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Safe to re-run.
    pub fn migrate(&self) -> AlexResult<usize> {
        for (name, sql) in MIGRATIONS {
            log::info!("applying migration {name}");
            self.conn.execute_batch(sql)?;
        }
        Ok(MIGRATIONS.len())
    }

    // ── Raw client ─────────────────────────────────────────────

    /// Execute one or more statements that return no rows.
    pub fn execute(&self, sql: &str) -> AlexResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a query and return every row as a column-name keyed map.
    pub fn query(&self, sql: &str) -> AlexResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
            .query_map([], |row| {
                let mut map = Row::new();
                for (i, name) in columns.iter().enumerate() {
                    map.insert(name.clone(), json_value(row.get_ref(i)?));
                }
                Ok(map)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// `SELECT COUNT(*)` for `table`. The name is quoted as an identifier.
    pub fn count_rows(&self, table: &str) -> AlexResult<i64> {
        let rows = self.query(&format!(
            "SELECT COUNT(*) AS count FROM {}",
            quote_ident(table)
        ))?;
        Ok(rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .unwrap_or(0))
    }

    pub fn table_exists(&self, table: &str) -> AlexResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn trigger_exists(&self, trigger: &str) -> AlexResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'trigger' AND name = ?1",
            [trigger],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Current time as RFC 3339 text, the format of every `*_at` column.
fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Read a decimal stored as text.
fn decimal_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<BigDecimal> {
    let text: String = row.get(idx)?;
    BigDecimal::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
    }
}
