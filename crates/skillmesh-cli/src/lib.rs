//! Command-line front end for the skillmesh engine.
//!
//! Loads candidate records (demo data, a JSON file, or seeded synthetic
//! records), turns subcommands and batch lines into [`commands::Request`]s,
//! and prints JSON responses carrying the engine's traces.

pub mod batch;
pub mod commands;
pub mod config;
pub mod error;
pub mod records;
pub mod seed;
