//! Table-reset step tests.

mod common;

use alex_core::reset::Resetter;
use alex_core::types::TABLES_TO_DROP;
use common::{FakeRunner, Harness};

#[test]
fn dropping_absent_tables_is_a_no_op() {
    let h = Harness::new("drop-absent");
    let mut resetter = Resetter::new(&h.store, &h.config, FakeRunner::new(&h.uri), Harness::console());

    let report = resetter.drop_all_tables().expect("drop");

    assert!(report.failures.is_empty(), "failures: {:?}", report.failures);
    assert_eq!(report.dropped.len(), TABLES_TO_DROP.len());
}

#[test]
fn drop_removes_tables_and_timestamp_triggers() {
    let h = Harness::new("drop-migrated");
    h.store.migrate().unwrap();
    assert!(h.store.trigger_exists("update_accounts_updated_at").unwrap());

    let mut resetter = Resetter::new(&h.store, &h.config, FakeRunner::new(&h.uri), Harness::console());
    resetter.drop_all_tables().expect("drop");

    for table in TABLES_TO_DROP {
        assert!(!h.store.table_exists(table).unwrap(), "{table} survived");
    }
    assert!(!h.store.trigger_exists("update_accounts_updated_at").unwrap());
}

#[test]
fn one_failing_drop_does_not_stop_the_others() {
    let h = Harness::new("drop-one-fails");
    h.store.migrate().unwrap();
    // A view named like a table makes DROP TABLE fail for that one name.
    h.store.execute("DROP TABLE jobs; CREATE VIEW jobs AS SELECT 1 AS id;").unwrap();

    let mut resetter = Resetter::new(&h.store, &h.config, FakeRunner::new(&h.uri), Harness::console());
    let report = resetter.drop_all_tables().expect("drop never errors");
    let (_, console) = resetter.into_parts();
    let out = String::from_utf8(console.into_inner()).unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, "jobs");
    assert_eq!(report.dropped, vec!["positions", "accounts", "instruments", "users"]);
    assert!(out.contains("⚠️  Error dropping jobs"));
    assert!(out.contains("✅ Dropped users"));
    assert!(!h.store.table_exists("users").unwrap());
}
