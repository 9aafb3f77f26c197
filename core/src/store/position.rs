use super::{decimal_column, now, AlexStore};
use crate::{
    error::{AlexError, AlexResult},
    schema::NewPosition,
    types::PositionId,
};
use bigdecimal::BigDecimal;
use rusqlite::params;

#[derive(Debug, Clone, PartialEq)]
pub struct PositionRow {
    pub id: PositionId,
    pub account_id: String,
    pub symbol: String,
    pub quantity: BigDecimal,
    pub as_of_date: String,
}

impl AlexStore {
    // ── Position ──────────────────────────────────────────────────

    pub fn find_positions_by_account(&self, account_id: &str) -> AlexResult<Vec<PositionRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, symbol, quantity, as_of_date
             FROM positions WHERE account_id = ?1
             ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![account_id], |row| {
            Ok(PositionRow {
                id: row.get(0)?,
                account_id: row.get(1)?,
                symbol: row.get(2)?,
                quantity: decimal_column(row, 3)?,
                as_of_date: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Add a holding to an existing account. A second call for the same
    /// (account, symbol) pair replaces the quantity and keeps the id.
    pub fn add_position(&self, position: &NewPosition) -> AlexResult<PositionId> {
        if !self.account_exists(&position.account_id)? {
            return Err(AlexError::NotFound {
                entity: "account",
                key: position.account_id.clone(),
            });
        }

        let ts = now();
        let as_of_date = chrono::Utc::now().date_naive().to_string();
        let id: PositionId = self.conn.query_row(
            "INSERT INTO positions (id, account_id, symbol, quantity, as_of_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT (account_id, symbol) DO UPDATE SET
                 quantity   = excluded.quantity,
                 as_of_date = excluded.as_of_date,
                 updated_at = excluded.updated_at
             RETURNING id",
            params![
                uuid::Uuid::new_v4().to_string(),
                position.account_id,
                position.symbol,
                position.quantity.to_string(),
                as_of_date,
                ts,
            ],
            |row| row.get(0),
        )?;
        log::debug!(
            "position {id}: {} {} in account {}",
            position.quantity,
            position.symbol,
            position.account_id
        );
        Ok(id)
    }
}
