//! # wp-context core
//!
//! Shared, I/O-free logic for wp-context: the configuration data model,
//! the `wp-config.php` extractor, question classification rules, the
//! ad-hoc option query translator, serialized-value heuristics, the
//! completion catalogue and the database transport trait.
//!
//! This crate contains no tokio, sqlx, or filesystem access. Everything
//! that touches a live installation lives in the `wp-context` crate.

pub mod classify;
pub mod completion;
pub mod config_parser;
pub mod error;
pub mod models;
pub mod nl_sql;
pub mod serialized;
pub mod store;
pub mod theme;

pub use error::{WpError, WpResult};
pub use models::{Configuration, Intent, QueryResponse, ResponseData, ThemeInfo};
