use super::{decimal_column, now, AlexStore};
use crate::{
    error::{AlexError, AlexResult},
    schema::NewAccount,
    types::AccountId,
};
use bigdecimal::BigDecimal;
use rusqlite::params;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRow {
    pub id: AccountId,
    pub clerk_user_id: String,
    pub account_name: String,
    pub account_purpose: String,
    pub cash_balance: BigDecimal,
    pub cash_interest: BigDecimal,
}

impl AlexStore {
    // ── Account ───────────────────────────────────────────────────

    /// All accounts owned by `clerk_user_id`, oldest first.
    pub fn find_accounts_by_user(&self, clerk_user_id: &str) -> AlexResult<Vec<AccountRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, clerk_user_id, account_name, account_purpose, cash_balance, cash_interest
             FROM accounts WHERE clerk_user_id = ?1
             ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![clerk_user_id], |row| {
            Ok(AccountRow {
                id: row.get(0)?,
                clerk_user_id: row.get(1)?,
                account_name: row.get(2)?,
                account_purpose: row.get(3)?,
                cash_balance: decimal_column(row, 4)?,
                cash_interest: decimal_column(row, 5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Create an account for an existing user and return its id.
    pub fn create_account(&self, clerk_user_id: &str, account: &NewAccount) -> AlexResult<AccountId> {
        if self.find_user_by_clerk_id(clerk_user_id)?.is_none() {
            return Err(AlexError::NotFound {
                entity: "user",
                key: clerk_user_id.to_string(),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        let ts = now();
        self.conn.execute(
            "INSERT INTO accounts (id, clerk_user_id, account_name, account_purpose,
                                   cash_balance, cash_interest, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                id,
                clerk_user_id,
                account.account_name,
                account.account_purpose,
                account.cash_balance.to_string(),
                account.cash_interest.to_string(),
                ts,
            ],
        )?;
        log::debug!("created account {id} ({}) for {clerk_user_id}", account.account_name);
        Ok(id)
    }

    pub fn account_exists(&self, account_id: &str) -> AlexResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM accounts WHERE id = ?1",
            params![account_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
