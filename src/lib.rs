//! # wp-context
//!
//! **Answer questions about a WordPress installation from its own files.**
//!
//! wp-context finds `wp-config.php` by walking up from a workspace folder,
//! recovers the database credentials from it, connects to the installation's
//! MySQL database and answers free-text questions about it: database
//! settings, the active theme and its templates, active plugins, custom post
//! types and the WordPress version.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐
//! │  CLI / HTTP  │──▶│ QueryRouter  │──▶│ InstallationState  │
//! │  (wpctx)     │   │ rules+render │   │ config + connection│
//! └──────────────┘   └──────────────┘   └─────────┬──────────┘
//!                                                 │
//!                              ┌──────────────────┼──────────────┐
//!                              ▼                  ▼              ▼
//!                        ┌──────────┐      ┌────────────┐  ┌──────────┐
//!                        │ locate   │      │ wp-config  │  │  MySQL   │
//!                        │ ancestors│      │ extraction │  │ (sqlx)   │
//!                        └──────────┘      └────────────┘  └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! wpctx locate                              # where is wp-config.php?
//! wpctx ask "what is the database name"     # database_info
//! wpctx ask "which plugins are active"      # plugin_info
//! wpctx query "find options like mailer"    # ad-hoc option search
//! wpctx serve                               # HTTP chat adapter
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML tool configuration with defaults and validation |
//! | [`locate`] | Upward search for `wp-config.php` |
//! | [`db`] | MySQL connect options and single-connection pool |
//! | [`mysql_store`] | `Driver` implementation over sqlx |
//! | [`installation`] | Session context: configuration, connection, typed lookups |
//! | [`router`] | Question classification and intent handlers |
//! | [`render`] | Plain, markdown and JSON rendering |
//! | [`query`] | Ad-hoc option search command |
//! | [`completions`] | Completion suggestions |
//! | [`inspect`] | Direct inspection commands |
//! | [`server`] | HTTP chat adapter (Axum) |
//!
//! Pure logic (parsing, classification rules, translation, the driver
//! trait) lives in the `wp-context-core` crate.

pub mod completions;
pub mod config;
pub mod db;
pub mod inspect;
pub mod installation;
pub mod locate;
pub mod mysql_store;
pub mod query;
pub mod render;
pub mod router;
pub mod server;

pub use installation::{InstallationState, Readiness};
pub use router::QueryRouter;
