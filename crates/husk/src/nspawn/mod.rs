//! systemd-nspawn launcher plumbing.
//!
//! [`Nspawn`] locates the nspawn binary and produces [`Container`]
//! descriptors; the descriptor renders itself into the ordered flag list
//! nspawn is invoked with. See systemd-nspawn(1) for the flags involved.

mod container;
mod mount;
mod version;

use std::path::{Path, PathBuf};

use husk_common::{HuskError, HuskResult};

pub use container::Container;
pub use mount::BindMount;
pub use version::{FixedVersion, NspawnVersion, VersionProbe};

/// Handle on a resolved systemd-nspawn binary.
///
/// Producer of [`Container`] descriptors. Carries the version probe so
/// that version-gated flags can be decided at render time; the probe runs
/// the binary at most once per handle.
#[derive(Debug)]
pub struct Nspawn {
    path: PathBuf,
    probe: Box<dyn VersionProbe>,
}

impl Nspawn {
    /// Use the binary at `path` without consulting the search path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let probe = Box::new(NspawnVersion::new(&path));
        Self { path, probe }
    }

    /// Resolve `path` to an executable, falling back to a search of
    /// `PATH` for its file name.
    ///
    /// # Errors
    ///
    /// [`HuskError::Lookup`] when no matching executable exists.
    pub fn resolve(path: &Path) -> HuskResult<Self> {
        if path.is_file() {
            return Ok(Self::at(path));
        }
        let name = path.file_name().unwrap_or(path.as_os_str());
        let resolved = which::which(name).map_err(|_| HuskError::Lookup {
            binary: path.display().to_string(),
        })?;
        Ok(Self::at(resolved))
    }

    /// Swap in a different version probe (tests inject fixed versions).
    #[must_use]
    pub fn with_probe(mut self, probe: Box<dyn VersionProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Path of the nspawn binary this handle invokes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probed nspawn version, or `None` when detection failed.
    #[must_use]
    pub fn version(&self) -> Option<u32> {
        self.probe.version()
    }

    /// Produce a customizable container descriptor rooted at `dir`.
    #[must_use]
    pub fn container(self, dir: impl Into<PathBuf>) -> Container {
        Container::new(self, dir)
    }
}

/// List the machine root filesystem paths below `dir`.
///
/// Enumeration helper over the machinectl image directory; not part of the
/// launch flow.
///
/// # Errors
///
/// [`HuskError::Config`] for an unusable directory pattern,
/// [`HuskError::Io`] when a matched entry cannot be read.
pub fn machines_available(dir: &Path) -> HuskResult<Vec<PathBuf>> {
    let pattern = dir.join("*").to_string_lossy().into_owned();
    let entries = glob::glob(&pattern).map_err(|e| HuskError::Config {
        message: format!("bad machines directory {}: {e}", dir.display()),
    })?;

    let mut machines = Vec::new();
    for entry in entries {
        machines.push(entry.map_err(glob::GlobError::into_error)?);
    }
    Ok(machines)
}
