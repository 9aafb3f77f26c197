//! Instrument catalog loading tests.

use alex_core::{
    schema::InstrumentCreate,
    seed::{self, SeedOutcome},
    store::AlexStore,
};
use bigdecimal::BigDecimal;
use std::collections::BTreeMap;

fn migrated_store() -> AlexStore {
    let store = AlexStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn embedded_catalog_loads_all_twenty_two_instruments() {
    let store = migrated_store();
    let summary = seed::load_instruments(&store).expect("seed");

    assert_eq!(summary.total, 22);
    assert!(summary.is_complete(), "rejected: {:?}", summary.outcomes);
    assert_eq!(summary.progress_line(), "22/22 instruments loaded");
    assert_eq!(store.count_rows("instruments").unwrap(), 22);
}

#[test]
fn catalog_covers_every_fixture_symbol() {
    let store = migrated_store();
    seed::load_instruments(&store).expect("seed");

    for symbol in ["SPY", "QQQ", "BND", "VEA", "GLD"] {
        assert!(
            store.find_instrument(symbol).unwrap().is_some(),
            "catalog is missing {symbol}"
        );
    }
}

#[test]
fn reloading_the_catalog_does_not_duplicate_rows() {
    let store = migrated_store();
    seed::load_instruments(&store).expect("first load");
    seed::load_instruments(&store).expect("second load");
    assert_eq!(store.count_rows("instruments").unwrap(), 22);
}

#[test]
fn allocation_round_trips_through_json_column() {
    let store = migrated_store();
    seed::load_instruments(&store).expect("seed");

    let aor = store.find_instrument("AOR").unwrap().expect("AOR");
    assert_eq!(aor.allocation_asset_class.get("equity"), Some(&60.0));
    assert_eq!(aor.allocation_asset_class.get("fixed_income"), Some(&40.0));
}

#[test]
fn invalid_instrument_is_reported_and_the_rest_still_load() {
    let store = migrated_store();
    let good = InstrumentCreate {
        symbol: "SPY".into(),
        name: "SPDR S&P 500 ETF".into(),
        instrument_type: "etf".into(),
        current_price: BigDecimal::from(500),
        allocation_asset_class: BTreeMap::from([("equity".to_string(), 100.0)]),
    };
    let bad = InstrumentCreate {
        symbol: "BAD".into(),
        name: String::new(),
        ..good.clone()
    };

    let summary = seed::load_from(&store, vec![bad, good]).expect("load");

    assert_eq!(summary.loaded(), 1);
    assert!(!summary.is_complete());
    assert_eq!(summary.progress_line(), "1/2 instruments loaded");
    assert!(matches!(
        &summary.outcomes[0],
        SeedOutcome::Rejected { symbol, .. } if symbol == "BAD"
    ));
    assert_eq!(store.count_rows("instruments").unwrap(), 1);
}
