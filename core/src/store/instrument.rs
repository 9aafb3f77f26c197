use super::{decimal_column, now, AlexStore};
use crate::{error::AlexResult, schema::NewInstrument};
use bigdecimal::BigDecimal;
use rusqlite::{params, OptionalExtension};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRow {
    pub symbol: String,
    pub name: String,
    pub instrument_type: String,
    pub current_price: BigDecimal,
    pub allocation_asset_class: BTreeMap<String, f64>,
}

impl AlexStore {
    // ── Instrument ────────────────────────────────────────────────

    /// Insert or refresh a catalog instrument, keyed by symbol.
    pub fn upsert_instrument(&self, instrument: &NewInstrument) -> AlexResult<()> {
        let allocation = serde_json::to_string(&instrument.allocation_asset_class)?;
        let ts = now();
        self.conn.execute(
            "INSERT INTO instruments (symbol, name, instrument_type, current_price,
                                      allocation_asset_class, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT (symbol) DO UPDATE SET
                 name                   = excluded.name,
                 instrument_type        = excluded.instrument_type,
                 current_price          = excluded.current_price,
                 allocation_asset_class = excluded.allocation_asset_class,
                 updated_at             = excluded.updated_at",
            params![
                instrument.symbol,
                instrument.name,
                instrument.instrument_type,
                instrument.current_price.to_string(),
                allocation,
                ts,
            ],
        )?;
        Ok(())
    }

    pub fn find_instrument(&self, symbol: &str) -> AlexResult<Option<InstrumentRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT symbol, name, instrument_type, current_price, allocation_asset_class
                 FROM instruments WHERE symbol = ?1",
                params![symbol],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        decimal_column(row, 3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((symbol, name, instrument_type, current_price, allocation)) => {
                Ok(Some(InstrumentRow {
                    symbol,
                    name,
                    instrument_type,
                    current_price,
                    allocation_asset_class: serde_json::from_str(&allocation)?,
                }))
            }
        }
    }
}
