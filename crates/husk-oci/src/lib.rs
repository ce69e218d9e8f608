//! # husk-oci
//!
//! OCI Runtime Specification (`config.json`) types for the Husk launcher,
//! plus the reader that decodes a bundle config into them.
//!
//! Only the fields the launcher consumes are modeled with intent; the rest
//! deserialize to zero-value defaults so that real-world configs load
//! without validation errors.

#![warn(missing_docs)]

pub mod reader;
pub mod runtime;

pub use reader::{read_config, read_config_file};
pub use runtime::Spec;
