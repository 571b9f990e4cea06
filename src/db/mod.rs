//! Database layer
//!
//! This module provides database access for the Gazette site.
//! SQLite is the only supported backend, which keeps the site deployable
//! as a single binary with a single data file.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DbPool};
