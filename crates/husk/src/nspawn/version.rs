//! nspawn version detection.
//!
//! Some flags only exist from a certain systemd release on; the descriptor
//! asks a [`VersionProbe`] at render time and omits a gated flag when the
//! version is unknown or too old. Detection failure is never an error.

use std::path::PathBuf;
use std::process::Command;

use once_cell::sync::OnceCell;

/// Source of the nspawn version number.
///
/// Abstracts the version subprocess away so tests can inject a fixed
/// version instead of running a real binary.
pub trait VersionProbe: std::fmt::Debug {
    /// The detected version, or `None` when detection failed.
    fn version(&self) -> Option<u32>;
}

/// Probes a binary by running it once with `--version`.
///
/// The first line of output looks like `systemd 239 (239-1)`; the second
/// whitespace-delimited field is the version number. The outcome, failure
/// included, is cached for the lifetime of the probe.
#[derive(Debug)]
pub struct NspawnVersion {
    path: PathBuf,
    cached: OnceCell<Option<u32>>,
}

impl NspawnVersion {
    /// Probe the binary at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    fn run(&self) -> Option<u32> {
        let output = Command::new(&self.path).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        parse_version(&String::from_utf8_lossy(&output.stdout))
    }
}

impl VersionProbe for NspawnVersion {
    fn version(&self) -> Option<u32> {
        *self.cached.get_or_init(|| self.run())
    }
}

/// A probe that always reports the given version. Meant for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedVersion(pub Option<u32>);

impl VersionProbe for FixedVersion {
    fn version(&self) -> Option<u32> {
        self.0
    }
}

fn parse_version(output: &str) -> Option<u32> {
    output.lines().next()?.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::os::unix::fs::PermissionsExt;

    #[test]
    fn parse_release_line() {
        assert_eq!(parse_version("systemd 239 (239-1.el8)\n+PAM +AUDIT\n"), Some(239));
        assert_eq!(parse_version("systemd 229\n"), Some(229));
    }

    #[test]
    fn parse_garbage() {
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("nonsense"), None);
        assert_eq!(parse_version("systemd abc (abc)"), None);
    }

    #[test]
    fn fixed_probe() {
        assert_eq!(FixedVersion(Some(231)).version(), Some(231));
        assert_eq!(FixedVersion(None).version(), None);
    }

    #[test]
    fn binary_probe_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let calls = dir.path().join("calls");
        let script = dir.path().join("fake-nspawn");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho probed >> {}\necho 'systemd 231 (231)'\n", calls.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = NspawnVersion::new(&script);
        assert_eq!(probe.version(), Some(231));
        assert_eq!(probe.version(), Some(231));

        let log = std::fs::read_to_string(&calls).unwrap();
        assert_eq!(log.lines().count(), 1);
    }

    #[test]
    fn missing_binary_probe_is_none() {
        let probe = NspawnVersion::new("/no/such/nspawn-binary");
        assert_eq!(probe.version(), None);
        // failure outcome is cached too
        assert_eq!(probe.version(), None);
    }
}
