use super::{decimal_column, now, AlexStore};
use crate::{error::AlexResult, schema::NewUser};
use bigdecimal::BigDecimal;
use rusqlite::{params, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub clerk_user_id: String,
    pub display_name: String,
    pub years_until_retirement: i32,
    pub target_retirement_income: BigDecimal,
    pub created_at: String,
}

impl AlexStore {
    // ── User ──────────────────────────────────────────────────────

    pub fn find_user_by_clerk_id(&self, clerk_user_id: &str) -> AlexResult<Option<UserRow>> {
        let user = self
            .conn
            .query_row(
                "SELECT clerk_user_id, display_name, years_until_retirement,
                        target_retirement_income, created_at
                 FROM users WHERE clerk_user_id = ?1",
                params![clerk_user_id],
                |row| {
                    Ok(UserRow {
                        clerk_user_id: row.get(0)?,
                        display_name: row.get(1)?,
                        years_until_retirement: row.get(2)?,
                        target_retirement_income: decimal_column(row, 3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn create_user(&self, user: &NewUser) -> AlexResult<()> {
        let ts = now();
        self.conn.execute(
            "INSERT INTO users (clerk_user_id, display_name, years_until_retirement,
                                target_retirement_income, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                user.clerk_user_id,
                user.display_name,
                user.years_until_retirement,
                user.target_retirement_income.to_string(),
                ts,
            ],
        )?;
        log::debug!("created user {}", user.clerk_user_id);
        Ok(())
    }
}
