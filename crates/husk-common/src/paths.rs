//! Default filesystem paths for Husk.
//!
//! These are plain constants folded into [`HuskPaths`]; callers pass the
//! resolved values into the builder explicitly. There is no mutable
//! package-level state.

use std::path::PathBuf;

/// Standard location of the systemd-nspawn binary.
pub const DEFAULT_NSPAWN_PATH: &str = "/usr/bin/systemd-nspawn";

/// Where machinectl keeps machine root filesystems by default.
pub const DEFAULT_MACHINES_DIR: &str = "/var/lib/machines";

/// Resolved filesystem locations used by the launcher.
#[derive(Debug, Clone)]
pub struct HuskPaths {
    /// The nspawn binary to invoke (default: /usr/bin/systemd-nspawn).
    pub nspawn: PathBuf,
    /// Machine image directory (default: /var/lib/machines).
    pub machines: PathBuf,
}

impl HuskPaths {
    /// Create paths with default locations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the nspawn binary location.
    #[must_use]
    pub fn with_nspawn(mut self, nspawn: impl Into<PathBuf>) -> Self {
        self.nspawn = nspawn.into();
        self
    }

    /// Replace the machine image directory.
    #[must_use]
    pub fn with_machines(mut self, machines: impl Into<PathBuf>) -> Self {
        self.machines = machines.into();
        self
    }
}

impl Default for HuskPaths {
    fn default() -> Self {
        Self {
            nspawn: PathBuf::from(DEFAULT_NSPAWN_PATH),
            machines: PathBuf::from(DEFAULT_MACHINES_DIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let paths = HuskPaths::new();
        assert_eq!(paths.nspawn, PathBuf::from("/usr/bin/systemd-nspawn"));
        assert_eq!(paths.machines, PathBuf::from("/var/lib/machines"));
    }

    #[test]
    fn custom_locations() {
        let paths = HuskPaths::new()
            .with_nspawn("/opt/systemd/nspawn")
            .with_machines("/srv/machines");
        assert_eq!(paths.nspawn, PathBuf::from("/opt/systemd/nspawn"));
        assert_eq!(paths.machines, PathBuf::from("/srv/machines"));
    }
}
