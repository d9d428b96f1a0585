//! Utility functions.
//!
//! - [`text`]: HTML escaping and plaintext to HTML conversion.

pub mod text;
