//! # husk-common
//!
//! Shared pieces of the Husk launcher:
//! - Error taxonomy for the whole workspace
//! - Default filesystem locations of the nspawn binary and machine images

#![warn(missing_docs)]

pub mod error;
pub mod paths;

pub use error::{HuskError, HuskResult};
pub use paths::HuskPaths;
