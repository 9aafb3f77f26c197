//! Input payloads and their validation.
//!
//! Every `*Create` payload is checked and normalized by `validate()` before
//! it reaches the store. The store only accepts the normalized `New*`
//! structs, so unvalidated input cannot be persisted.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const MONEY_SCALE: i64 = 2;
pub const RATE_SCALE: i64 = 4;
pub const QUANTITY_SCALE: i64 = 8;

const MAX_ACCOUNT_NAME_LEN: usize = 100;
const MAX_SYMBOL_LEN: usize = 20;
const MAX_YEARS_UNTIL_RETIREMENT: i32 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// ── User ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub clerk_user_id: String,
    pub display_name: String,
    pub years_until_retirement: i32,
    pub target_retirement_income: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub clerk_user_id: String,
    pub display_name: String,
    pub years_until_retirement: i32,
    pub target_retirement_income: BigDecimal,
}

impl UserCreate {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let clerk_user_id = required("clerk_user_id", &self.clerk_user_id)?;
        let display_name = required("display_name", &self.display_name)?;
        if !(0..=MAX_YEARS_UNTIL_RETIREMENT).contains(&self.years_until_retirement) {
            return Err(ValidationError::new(
                "years_until_retirement",
                format!(
                    "must be between 0 and {MAX_YEARS_UNTIL_RETIREMENT}, got {}",
                    self.years_until_retirement
                ),
            ));
        }
        let target_retirement_income =
            non_negative("target_retirement_income", self.target_retirement_income)?;

        Ok(NewUser {
            clerk_user_id,
            display_name,
            years_until_retirement: self.years_until_retirement,
            target_retirement_income: target_retirement_income
                .with_scale_round(MONEY_SCALE, RoundingMode::HalfEven),
        })
    }
}

// ── Account ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AccountCreate {
    pub account_name: String,
    #[serde(default)]
    pub account_purpose: String,
    pub cash_balance: BigDecimal,
    pub cash_interest: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub account_name: String,
    pub account_purpose: String,
    pub cash_balance: BigDecimal,
    pub cash_interest: BigDecimal,
}

impl AccountCreate {
    pub fn validate(self) -> Result<NewAccount, ValidationError> {
        let account_name = required("account_name", &self.account_name)?;
        if account_name.chars().count() > MAX_ACCOUNT_NAME_LEN {
            return Err(ValidationError::new(
                "account_name",
                format!("must be at most {MAX_ACCOUNT_NAME_LEN} characters"),
            ));
        }
        let cash_balance = non_negative("cash_balance", self.cash_balance)?;
        let cash_interest = non_negative("cash_interest", self.cash_interest)?;
        if cash_interest > BigDecimal::from(1) {
            return Err(ValidationError::new(
                "cash_interest",
                format!("must be a fraction between 0 and 1, got {cash_interest}"),
            ));
        }

        Ok(NewAccount {
            account_name,
            account_purpose: self.account_purpose.trim().to_string(),
            cash_balance: cash_balance.with_scale_round(MONEY_SCALE, RoundingMode::HalfEven),
            cash_interest: cash_interest.with_scale_round(RATE_SCALE, RoundingMode::HalfEven),
        })
    }
}

// ── Position ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct PositionCreate {
    pub account_id: String,
    pub symbol: String,
    pub quantity: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPosition {
    pub account_id: String,
    pub symbol: String,
    pub quantity: BigDecimal,
}

impl PositionCreate {
    pub fn validate(self) -> Result<NewPosition, ValidationError> {
        let account_id = required("account_id", &self.account_id)?;
        let symbol = ticker("symbol", &self.symbol)?;
        if self.quantity <= BigDecimal::from(0) {
            return Err(ValidationError::new(
                "quantity",
                format!("must be greater than 0, got {}", self.quantity),
            ));
        }

        Ok(NewPosition {
            account_id,
            symbol,
            quantity: self
                .quantity
                .with_scale_round(QUANTITY_SCALE, RoundingMode::HalfEven),
        })
    }
}

// ── Instrument ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentCreate {
    pub symbol: String,
    pub name: String,
    pub instrument_type: String,
    pub current_price: BigDecimal,
    /// Percentage per asset class. Must sum to 100.
    #[serde(default)]
    pub allocation_asset_class: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInstrument {
    pub symbol: String,
    pub name: String,
    pub instrument_type: String,
    pub current_price: BigDecimal,
    pub allocation_asset_class: BTreeMap<String, f64>,
}

impl InstrumentCreate {
    pub fn validate(self) -> Result<NewInstrument, ValidationError> {
        let symbol = ticker("symbol", &self.symbol)?;
        let name = required("name", &self.name)?;
        let instrument_type = required("instrument_type", &self.instrument_type)?.to_lowercase();
        let current_price = non_negative("current_price", self.current_price)?;

        if let Some((class, pct)) = self
            .allocation_asset_class
            .iter()
            .find(|(_, pct)| !pct.is_finite() || **pct < 0.0)
        {
            return Err(ValidationError::new(
                "allocation_asset_class",
                format!("'{class}' has invalid percentage {pct}"),
            ));
        }
        let total: f64 = self.allocation_asset_class.values().sum();
        if (total - 100.0).abs() > 0.01 {
            return Err(ValidationError::new(
                "allocation_asset_class",
                format!("percentages must sum to 100, got {total}"),
            ));
        }

        Ok(NewInstrument {
            symbol,
            name,
            instrument_type,
            current_price: current_price.with_scale_round(MONEY_SCALE, RoundingMode::HalfEven),
            allocation_asset_class: self.allocation_asset_class,
        })
    }
}

// ── Field rules ───────────────────────────────────────────────────

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &'static str, value: BigDecimal) -> Result<BigDecimal, ValidationError> {
    if value < BigDecimal::from(0) {
        return Err(ValidationError::new(
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(value)
}

fn ticker(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let symbol = required(field, value)?.to_uppercase();
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_SYMBOL_LEN} characters"),
        ));
    }
    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ValidationError::new(
            field,
            format!("'{symbol}' contains characters outside [A-Z0-9.-]"),
        ));
    }
    Ok(symbol)
}
