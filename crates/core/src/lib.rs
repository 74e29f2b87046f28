//! Domain types and pure logic shared across the Monument Atlas crates.
//!
//! Everything here is synchronous and free of I/O: validation rules,
//! coordinate handling, map-pin grouping, and the data-URI codec used for
//! image payloads.

pub mod creation;
pub mod data_uri;
pub mod error;
pub mod geo;
pub mod types;
