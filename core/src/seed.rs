//! Reference instrument catalog and its loader.

use crate::{
    error::AlexResult,
    schema::{InstrumentCreate, ValidationError},
    store::AlexStore,
};
use serde::Deserialize;

const CATALOG_JSON: &str = include_str!("../../data/instruments.json");

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    instruments: Vec<InstrumentCreate>,
}

/// The embedded instrument catalog, unvalidated.
pub fn catalog() -> AlexResult<Vec<InstrumentCreate>> {
    let file: CatalogFile = serde_json::from_str(CATALOG_JSON)?;
    Ok(file.instruments)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    Loaded { symbol: String, name: String },
    Rejected { symbol: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedSummary {
    pub total: usize,
    pub outcomes: Vec<SeedOutcome>,
}

impl SeedSummary {
    pub fn loaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SeedOutcome::Loaded { .. }))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.loaded() == self.total
    }

    /// `<loaded>/<total> instruments loaded`. The reset tool looks for this
    /// exact text in the seed process output.
    pub fn progress_line(&self) -> String {
        format!("{}/{} instruments loaded", self.loaded(), self.total)
    }
}

/// Validate and upsert every catalog instrument. Validation failures are
/// recorded per instrument; database errors abort the load.
pub fn load_instruments(store: &AlexStore) -> AlexResult<SeedSummary> {
    load_from(store, catalog()?)
}

pub fn load_from(store: &AlexStore, instruments: Vec<InstrumentCreate>) -> AlexResult<SeedSummary> {
    let mut summary = SeedSummary {
        total: instruments.len(),
        outcomes: Vec::with_capacity(instruments.len()),
    };

    for raw in instruments {
        let symbol = raw.symbol.clone();
        match raw.validate() {
            Ok(instrument) => {
                store.upsert_instrument(&instrument)?;
                summary.outcomes.push(SeedOutcome::Loaded {
                    symbol: instrument.symbol,
                    name: instrument.name,
                });
            }
            Err(ValidationError { field, message }) => {
                log::warn!("skipping instrument {symbol}: {field}: {message}");
                summary.outcomes.push(SeedOutcome::Rejected {
                    symbol,
                    reason: format!("{field}: {message}"),
                });
            }
        }
    }

    log::info!("{}", summary.progress_line());
    Ok(summary)
}
