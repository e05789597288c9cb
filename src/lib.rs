//! WiFi profile editor.
//!
//! Loads every profile file in a directory, serves an HTML form per profile,
//! and writes edits back in the directory's file format.
//!
//! # Modules
//!
//! - [`config`] - Service settings (format, listen address)
//! - [`error`] - Error types for the library
//! - [`format`] - The on-disk profile formats
//! - [`profile`] - A single profile record
//! - [`render`] - HTML escaping and page rendering
//! - [`server`] - HTTP routes over the profile store
//! - [`store`] - Directory loading and the edit reconciler
//!
//! # Example Usage
//!
//! ```no_run
//! use wifi_conf::{FormatKind, ProfileStore};
//!
//! let mut store = ProfileStore::open("/etc/netctl", FormatKind::Netctl.build());
//! store.submit("home", "My Wifi", "secret123").expect("write failed");
//! ```

/// Settings module for the service's format and listen address.
/// Reads an optional TOML file and falls back to defaults.
pub mod config;

/// Error module with the `WifiConfError` type and `Result` alias.
/// Uses `thiserror`; application code wraps these with `anyhow`.
pub mod error;

/// Format module for the on-disk profile syntaxes.
/// Implements the dotfile and netctl formats behind `ConfigFormat`.
pub mod format;

/// Profile module holding the `ConfigRecord` type.
/// Loads a single profile file and writes it back.
pub mod profile;

/// Render module for the profile listing page.
/// Escapes values and fills the embedded Tera template.
pub mod render;

/// Server module exposing the profile form over HTTP.
/// Uses Axum with the store shared behind a mutex.
pub mod server;

/// Store module owning the profile collection.
/// Scans the profile directory and applies submitted edits.
pub mod store;

pub use error::WifiConfError;
pub use format::{ConfigFormat, DotfileFormat, FormatKind, NetctlFormat};
pub use profile::ConfigRecord;
pub use store::{scan_dir, ProfileStore, ScanOutcome, Submission};
