//! # webform-core
//!
//! Core types shared by the webform-rs crates. This crate knows nothing about
//! forms or requests and provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Engine settings
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Text helpers (HTML escaping, plaintext to HTML)

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use error::{FieldError, FormError, FormResult, ValidationError};
pub use settings::Settings;
