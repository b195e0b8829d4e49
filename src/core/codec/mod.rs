//! Blob payload encoding.
//!
//! A service blob is a flat JSON object of string values. One reserved key
//! holds a nested JSON document (itself stored as a string) with the per-key
//! version, author, and creation time:
//!
//! ```text
//! {
//!   "api_key": "abc",
//!   "db_password": "s3cr3t",
//!   "_coffer_metadata": "{\"api_key\":{...},\"db_password\":{...}}"
//! }
//! ```

mod container;
mod metadata;

pub use container::Container;
pub use metadata::{MetadataDocument, MetadataRecord};
