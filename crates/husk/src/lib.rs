//! # Husk
//!
//! Husk launches OCI bundles with systemd-nspawn. It reads a bundle's
//! `config.json`, derives the matching nspawn command-line flags
//! (directory, machine name, bind mounts, environment, personality) and
//! hands back a ready-to-run command. The container itself is entirely
//! nspawn's business.
//!
//! ## Usage
//!
//! ```no_run
//! use husk::bundle::{TranslateConfig, bundle_to_container};
//!
//! # fn example() -> husk_common::HuskResult<()> {
//! let wrapper = bundle_to_container("/srv/bundles/shell".as_ref(), &TranslateConfig::default())?;
//!
//! // Caller wires stdio and waits for the workload.
//! let status = wrapper.command().status()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod bundle;
pub mod cli;
pub mod nspawn;

pub use bundle::{TranslateConfig, Wrapper, bundle_to_container};
pub use nspawn::{BindMount, Container, Nspawn};
