//! OCI bundle to container translation.
//!
//! The single outward-facing operation: point it at a bundle directory and
//! get back a [`Wrapper`] holding the parsed spec and a fully populated
//! container descriptor.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use husk_common::paths::DEFAULT_NSPAWN_PATH;
use husk_common::{HuskError, HuskResult};
use husk_oci::Spec;

use crate::nspawn::{BindMount, Container, Nspawn};

/// Mount option that reclassifies a bind mount as read-only.
const RO_OPTION: &str = "ro";

/// Knobs for the translation, with the historical defaults.
#[derive(Debug, Clone)]
pub struct TranslateConfig {
    /// The nspawn binary to resolve and invoke.
    pub nspawn_path: PathBuf,
    /// Reject bundles that declare a platform OS other than "linux".
    /// Bundles declaring no OS at all are never rejected.
    pub enforce_linux_only: bool,
    /// Platform architecture to nspawn personality table. Architectures
    /// missing from the table get no personality flag.
    pub personalities: HashMap<String, String>,
}

impl TranslateConfig {
    /// The stock architecture table: the amd64 family maps to `x86-64`,
    /// the i386 family to `x86`.
    #[must_use]
    pub fn default_personalities() -> HashMap<String, String> {
        [
            ("amd64", "x86-64"),
            ("x86_64", "x86-64"),
            ("x86", "x86"),
            ("i386", "x86"),
            ("i586", "x86"),
            ("i686", "x86"),
            ("ix86", "x86"),
        ]
        .iter()
        .map(|(arch, personality)| ((*arch).to_string(), (*personality).to_string()))
        .collect()
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            nspawn_path: PathBuf::from(DEFAULT_NSPAWN_PATH),
            enforce_linux_only: true,
            personalities: Self::default_personalities(),
        }
    }
}

/// A parsed bundle spec together with the descriptor built from it.
#[derive(Debug)]
pub struct Wrapper {
    /// The bundle's runtime spec as read from `config.json`.
    pub spec: Spec,
    /// The descriptor derived from the spec.
    pub container: Container,
}

impl Wrapper {
    /// Assemble the launch command: rendered flags followed by the
    /// bundle's declared process arguments. The caller wires up stdio and
    /// runs it to completion.
    #[must_use]
    pub fn command(&self) -> Command {
        self.container.command(&self.spec.process.args)
    }
}

/// Translate the OCI bundle at `bundle` into an nspawn container.
///
/// Reads `<bundle>/config.json`, roots the container at the bundle's
/// declared rootfs, then copies hostname, read-only flag, environment,
/// working directory and bind mounts onto the descriptor. Bind mounts
/// carrying the `ro` option land in the read-only list with `ro` removed
/// from the retained options. Mount types other than "bind" are ignored.
///
/// # Errors
///
/// [`HuskError::Io`]/[`HuskError::Decode`] for an unreadable or malformed
/// config, [`HuskError::UnsupportedPlatform`] for a declared non-Linux OS
/// (when enforced), [`HuskError::Lookup`] when the nspawn binary is
/// missing.
pub fn bundle_to_container(bundle: &Path, config: &TranslateConfig) -> HuskResult<Wrapper> {
    let spec = husk_oci::read_config_file(bundle.join("config.json"))?;

    if config.enforce_linux_only {
        let os = spec.platform.os.trim();
        if !os.is_empty() && !os.eq_ignore_ascii_case("linux") {
            return Err(HuskError::UnsupportedPlatform { os: os.to_string() });
        }
    }

    let root = std::path::absolute(bundle.join(&spec.root.path))?;

    let nspawn = Nspawn::resolve(&config.nspawn_path)?;
    let mut container = nspawn.container(root);
    container.read_only = spec.root.readonly;
    container.machine = spec.hostname.clone();
    container.env = spec.process.env.clone();
    if !spec.process.cwd.is_empty() {
        container.cwd = spec.process.cwd.clone();
    }

    for mount in spec.mounts.iter().filter(|m| m.mount_type == "bind") {
        let (ro, retained): (Vec<&String>, Vec<&String>) =
            mount.options.iter().partition(|opt| opt.as_str() == RO_OPTION);
        let param = BindMount::new(
            mount.source.clone(),
            mount.destination.clone(),
            retained.into_iter().cloned().collect(),
        );
        if ro.is_empty() {
            container.bind_mounts.push(param);
        } else {
            container.bind_ro_mounts.push(param);
        }
    }

    if let Some(personality) = config.personalities.get(spec.platform.arch.as_str()) {
        container.personality = personality.clone();
    }

    Ok(Wrapper { spec, container })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    /// A config whose translation needs no real nspawn on the host.
    fn config() -> TranslateConfig {
        TranslateConfig {
            nspawn_path: PathBuf::from("/bin/sh"),
            ..TranslateConfig::default()
        }
    }

    fn write_bundle(body: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), body).unwrap();
        dir
    }

    #[test]
    fn minimal_bundle() {
        let bundle = write_bundle(
            r#"{
                "platform": { "os": "linux", "arch": "amd64" },
                "root": { "path": "rootfs", "readonly": true },
                "hostname": "shell",
                "process": {
                    "args": ["sh"],
                    "env": ["PATH=/usr/bin:/bin"],
                    "cwd": "/srv"
                }
            }"#,
        );

        let wrapper = bundle_to_container(bundle.path(), &config()).unwrap();
        let c = &wrapper.container;

        assert_eq!(c.dir, std::path::absolute(bundle.path().join("rootfs")).unwrap());
        assert!(c.read_only);
        assert_eq!(c.machine, "shell");
        assert_eq!(c.env, vec!["PATH=/usr/bin:/bin"]);
        assert_eq!(c.cwd, "/srv");
        assert_eq!(c.personality, "x86-64");
    }

    #[test]
    fn empty_spec_renders_directory_and_register_only() {
        let bundle = write_bundle(r#"{ "root": { "path": "rootfs" } }"#);

        let wrapper = bundle_to_container(bundle.path(), &config()).unwrap();
        let args = wrapper.container.args();

        assert_eq!(args.iter().filter(|a| *a == "-D").count(), 1);
        assert_eq!(args.iter().filter(|a| *a == "--register=false").count(), 1);
        assert!(!args.iter().any(|a| a.starts_with("--bind")));
        assert!(!args.iter().any(|a| a.starts_with("--setenv")));
    }

    #[test]
    fn bind_mounts_classified_by_ro_option() {
        let bundle = write_bundle(
            r#"{
                "root": { "path": "rootfs" },
                "mounts": [
                    {
                        "destination": "/data",
                        "type": "bind",
                        "source": "/srv/data",
                        "options": ["ro", "nosuid"]
                    },
                    {
                        "destination": "/cache",
                        "type": "bind",
                        "source": "/srv/cache"
                    },
                    {
                        "destination": "/proc",
                        "type": "proc",
                        "source": "proc"
                    }
                ]
            }"#,
        );

        let wrapper = bundle_to_container(bundle.path(), &config()).unwrap();
        let c = &wrapper.container;

        assert_eq!(c.bind_ro_mounts.len(), 1);
        assert_eq!(c.bind_ro_mounts[0].source, "/srv/data");
        assert_eq!(c.bind_ro_mounts[0].options, vec!["nosuid"]);

        assert_eq!(c.bind_mounts.len(), 1);
        assert_eq!(c.bind_mounts[0].source, "/srv/cache");

        // the proc mount is nobody's business here
        let args = c.args();
        assert!(args.contains(&"--bind-ro=/srv/data:/data:nosuid".to_string()));
        assert!(args.contains(&"--bind=/srv/cache:/cache".to_string()));
        assert!(!args.iter().any(|a| a.contains("proc")));
    }

    #[test]
    fn unknown_arch_gets_no_personality() {
        let bundle = write_bundle(
            r#"{
                "platform": { "os": "linux", "arch": "riscv64" },
                "root": { "path": "rootfs" }
            }"#,
        );

        let wrapper = bundle_to_container(bundle.path(), &config()).unwrap();
        assert!(wrapper.container.personality.is_empty());
        assert!(!wrapper.container.args().contains(&"--personality".to_string()));
    }

    #[test]
    fn i386_family_maps_to_x86() {
        for arch in ["x86", "i386", "i586", "i686", "ix86"] {
            let bundle = write_bundle(&format!(
                r#"{{ "platform": {{ "os": "linux", "arch": "{arch}" }}, "root": {{ "path": "rootfs" }} }}"#,
            ));
            let wrapper = bundle_to_container(bundle.path(), &config()).unwrap();
            assert_eq!(wrapper.container.personality, "x86", "arch {arch}");
        }
    }

    #[test]
    fn non_linux_platform_rejected() {
        let bundle = write_bundle(
            r#"{ "platform": { "os": "windows", "arch": "amd64" }, "root": { "path": "rootfs" } }"#,
        );

        let err = bundle_to_container(bundle.path(), &config()).unwrap_err();
        assert!(matches!(err, HuskError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn non_linux_platform_allowed_when_not_enforced() {
        let bundle = write_bundle(
            r#"{ "platform": { "os": "windows", "arch": "amd64" }, "root": { "path": "rootfs" } }"#,
        );

        let lax = TranslateConfig {
            enforce_linux_only: false,
            ..config()
        };
        assert!(bundle_to_container(bundle.path(), &lax).is_ok());
    }

    #[test]
    fn undeclared_platform_is_unconstrained() {
        let bundle = write_bundle(r#"{ "root": { "path": "rootfs" } }"#);
        assert!(bundle_to_container(bundle.path(), &config()).is_ok());
    }

    #[test]
    fn missing_config_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = bundle_to_container(dir.path(), &config()).unwrap_err();
        assert!(matches!(err, HuskError::Io(_)));
    }

    #[test]
    fn missing_nspawn_is_lookup_error() {
        let bundle = write_bundle(r#"{ "root": { "path": "rootfs" } }"#);

        let bad = TranslateConfig {
            nspawn_path: PathBuf::from("/no/such/dir/nspawn-missing-xyz"),
            ..TranslateConfig::default()
        };
        let err = bundle_to_container(bundle.path(), &bad).unwrap_err();
        assert!(matches!(err, HuskError::Lookup { .. }));
    }

    #[test]
    fn command_appends_process_args() {
        let bundle = write_bundle(
            r#"{
                "root": { "path": "rootfs" },
                "process": { "args": ["/bin/echo", "hello"] }
            }"#,
        );

        let wrapper = bundle_to_container(bundle.path(), &config()).unwrap();
        let cmd = wrapper.command();

        assert_eq!(cmd.get_program(), "/bin/sh");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.ends_with(&["/bin/echo".to_string(), "hello".to_string()]));
        assert!(args.contains(&"--register=false".to_string()));
    }
}
