//! # webform-forms
//!
//! The field classifier and coercion engine. Given the writable fields of a
//! target model and a raw submission, [`extract`](extract::extract) sorts every
//! submitted entry into typed record values, attachments, or free-form custom
//! text, and reports every invalid or missing field at once.
//!
//! - [`value`] - Coerced record values
//! - [`fields`] - Field definitions and per-type coercion rules
//! - [`target`] - The target model and its optional capabilities
//! - [`legacy`] - Per-model compatibility carve-outs
//! - [`extract`] - The classification pipeline

pub mod extract;
pub mod fields;
pub mod legacy;
pub mod target;
pub mod value;

pub use extract::{extract, ExtractionConfig, ExtractionResult, Extractor, RequiredPolicy};
pub use fields::{FieldDefinition, FieldRegistry, FieldType};
pub use target::{FilenameSidecar, InputFilter, Record, StaticModel, TargetModel};
pub use value::Value;
