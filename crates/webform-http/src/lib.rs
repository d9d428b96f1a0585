//! # webform-http
//!
//! Request-side input types for webform-rs. A request handler decodes the
//! HTTP body into a [`RawSubmission`] and the headers into a
//! [`RequestContext`]; both are then handed to the extraction engine.
//!
//! - [`submission`] - Ordered submitted field values
//! - [`upload`] - Uploaded files with a re-readable byte stream
//! - [`request`] - Client request metadata

pub mod request;
pub mod submission;
pub mod upload;

pub use request::RequestContext;
pub use submission::{base_field_name, RawSubmission, SubmittedValue};
pub use upload::UploadedFile;
