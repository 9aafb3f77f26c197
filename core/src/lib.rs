//! Maintenance library for the Alex portfolio database: schema store,
//! input validation, reference data and the reset driver used by the
//! `alex-tools` binaries.

pub mod config;
pub mod console;
pub mod error;
pub mod fixture;
pub mod process;
pub mod reset;
pub mod schema;
pub mod seed;
pub mod store;
pub mod types;
