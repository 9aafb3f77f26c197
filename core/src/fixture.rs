//! Deterministic demo portfolio: one user, three accounts, five positions.
//!
//! Every level is idempotent on its own, but coarsely: if the user already
//! has *any* accounts they are reused as-is, and if the first account holds
//! *any* positions none are added. A set left half-created by an interrupted
//! run is not completed.

use crate::{
    console::{Console, Status},
    error::AlexResult,
    schema::{AccountCreate, PositionCreate, UserCreate},
    store::AlexStore,
    types::AccountId,
};
use bigdecimal::BigDecimal;
use std::io::Write;

pub const TEST_USER_ID: &str = "test_user_001";

/// Holdings placed in the first account: (symbol, whole shares).
pub const TEST_POSITIONS: [(&str, i64); 5] = [
    ("SPY", 100),
    ("QQQ", 50),
    ("BND", 200),
    ("VEA", 150),
    ("GLD", 25),
];

/// `units * 10^-scale`, e.g. `amount(45, 3)` is 0.045.
fn amount(units: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(units.into(), scale)
}

pub fn test_user() -> UserCreate {
    UserCreate {
        clerk_user_id: TEST_USER_ID.to_string(),
        display_name: "Test User".to_string(),
        years_until_retirement: 25,
        target_retirement_income: amount(100_000, 0),
    }
}

pub fn test_accounts() -> Vec<AccountCreate> {
    vec![
        AccountCreate {
            account_name: "401(k)".to_string(),
            account_purpose: "Primary retirement savings".to_string(),
            cash_balance: amount(5000, 0),
            cash_interest: amount(45, 3),
        },
        AccountCreate {
            account_name: "Roth IRA".to_string(),
            account_purpose: "Tax-free retirement savings".to_string(),
            cash_balance: amount(1000, 0),
            cash_interest: amount(4, 2),
        },
        AccountCreate {
            account_name: "Taxable Brokerage".to_string(),
            account_purpose: "General investment account".to_string(),
            cash_balance: amount(2500, 0),
            cash_interest: amount(35, 3),
        },
    ]
}

/// What one fixture run created and what it found already present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureReport {
    pub user_created: bool,
    pub existing_accounts: usize,
    pub accounts_created: usize,
    pub existing_positions: usize,
    pub positions_created: usize,
    /// Accounts used for positions, oldest first.
    pub account_ids: Vec<AccountId>,
}

pub fn create_test_data<W: Write>(
    store: &AlexStore,
    console: &mut Console<W>,
) -> AlexResult<FixtureReport> {
    console.section(Status::Fixture, "Creating test user and portfolio...")?;
    let mut report = FixtureReport::default();

    // Validate before the lookup so a broken fixture fails even on re-runs.
    let user = test_user().validate()?;
    if store.find_user_by_clerk_id(TEST_USER_ID)?.is_some() {
        console.detail(Status::Info, "Test user already exists")?;
    } else {
        store.create_user(&user)?;
        report.user_created = true;
        console.detail(Status::Ok, "Created test user")?;
    }

    let existing = store.find_accounts_by_user(TEST_USER_ID)?;
    if existing.is_empty() {
        for raw in test_accounts() {
            let account = raw.validate()?;
            let id = store.create_account(TEST_USER_ID, &account)?;
            report.account_ids.push(id);
            report.accounts_created += 1;
            console.detail(
                Status::Ok,
                &format!("Created account: {}", account.account_name),
            )?;
        }
    } else {
        report.existing_accounts = existing.len();
        console.detail(
            Status::Info,
            &format!("User already has {} accounts", existing.len()),
        )?;
        report.account_ids = existing.into_iter().map(|a| a.id).collect();
    }

    let Some(first_account) = report.account_ids.first().cloned() else {
        return Ok(report);
    };

    let positions = store.find_positions_by_account(&first_account)?;
    if !positions.is_empty() {
        report.existing_positions = positions.len();
        console.detail(
            Status::Info,
            &format!("Account already has {} positions", positions.len()),
        )?;
        return Ok(report);
    }

    for (symbol, shares) in TEST_POSITIONS {
        let position = PositionCreate {
            account_id: first_account.clone(),
            symbol: symbol.to_string(),
            quantity: BigDecimal::from(shares),
        }
        .validate()?;
        store.add_position(&position)?;
        report.positions_created += 1;
        console.detail(
            Status::Ok,
            &format!("Added position: {shares} shares of {}", position.symbol),
        )?;
    }

    log::info!(
        "fixture: user_created={} accounts_created={} positions_created={}",
        report.user_created,
        report.accounts_created,
        report.positions_created
    );
    Ok(report)
}
