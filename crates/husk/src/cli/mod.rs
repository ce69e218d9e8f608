//! CLI definition and handler.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use husk_common::HuskError;
use husk_common::paths::{DEFAULT_MACHINES_DIR, DEFAULT_NSPAWN_PATH};

use crate::bundle::{TranslateConfig, bundle_to_container};
use crate::nspawn::machines_available;

/// Husk - launch OCI bundles with systemd-nspawn
#[derive(Parser)]
#[command(name = "husk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the OCI bundle directory
    #[arg(required_unless_present = "list_machines")]
    pub bundle: Option<PathBuf>,

    /// systemd-nspawn binary to invoke
    #[arg(long, env = "HUSK_NSPAWN", default_value = DEFAULT_NSPAWN_PATH)]
    pub nspawn: PathBuf,

    /// Machine image directory consulted by --list-machines
    #[arg(long, env = "HUSK_MACHINES_DIR", default_value = DEFAULT_MACHINES_DIR)]
    pub machines_dir: PathBuf,

    /// List available machine root filesystems and exit
    #[arg(long)]
    pub list_machines: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Any read, lookup, unsupported-platform or child-process error; all
    /// terminate the invocation with a non-zero exit status.
    pub fn execute(self) -> Result<()> {
        if self.list_machines {
            for machine in machines_available(&self.machines_dir)? {
                println!("{}", machine.display());
            }
            return Ok(());
        }

        let Some(bundle) = self.bundle else {
            // clap enforces this already; belt and suspenders for API callers
            return Err(eyre!("provide the path to an OpenContainer bundle"));
        };

        let config = TranslateConfig {
            nspawn_path: self.nspawn,
            ..TranslateConfig::default()
        };
        let wrapper = bundle_to_container(&bundle, &config)
            .wrap_err_with(|| format!("failed to prepare bundle {}", bundle.display()))?;

        let mut command = wrapper.command();
        let status = command
            .status()
            .map_err(|e| HuskError::ChildProcess {
                message: e.to_string(),
            })?;

        if !status.success() {
            tracing::debug!(container = ?wrapper.container, "descriptor at failure");
            let rendered: Vec<String> = std::iter::once(command.get_program())
                .chain(command.get_args())
                .map(|a| a.to_string_lossy().into_owned())
                .collect();
            tracing::debug!(command = %rendered.join(" "), "rendered command line");
            return Err(HuskError::ChildProcess {
                message: format!("nspawn exited with {status}"),
            }
            .into());
        }

        Ok(())
    }
}
