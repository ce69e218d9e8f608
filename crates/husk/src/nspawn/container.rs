//! Container descriptor and flag rendering.

use std::path::PathBuf;
use std::process::Command;

use super::{BindMount, Nspawn};

/// `--chdir=` exists since this systemd release.
const CHDIR_MIN_VERSION: u32 = 229;

/// Personality values nspawn accepts; anything else is dropped.
const PERSONALITIES: &[&str] = &["x86", "x86-64"];

/// One flag rule: a pure function from descriptor to zero or more tokens.
type FlagRule = fn(&Container) -> Vec<String>;

/// Fixed emission order. Rendering walks this slice front to back, so the
/// argument list is deterministic for a given descriptor.
const FLAG_RULES: &[FlagRule] = &[
    flag_boot,
    flag_bind_mounts,
    flag_chdir,
    flag_tmpfs,
    flag_machine,
    flag_template,
    flag_selinux_context,
    flag_selinux_apifs_context,
    flag_personality,
    flag_uuid,
    flag_read_only,
    flag_quiet,
    flag_directory,
    flag_setenv,
    flag_ephemeral,
    flag_additional_args,
    flag_register_machine,
];

/// A customizable instance for constructing a kernel container with
/// systemd-nspawn.
///
/// Semantic settings map one-to-one onto nspawn flags; [`Container::args`]
/// renders them in a fixed order. For the flags themselves see the man
/// page systemd-nspawn(1).
#[derive(Debug)]
pub struct Container {
    nspawn: Nspawn,
    /// Directory of the rootfs for this container.
    pub dir: PathBuf,
    /// Raw flags not covered by the fields below, passed through verbatim.
    pub additional_args: Vec<String>,
    /// Environment entries, each "KEY=VALUE".
    pub env: Vec<String>,
    /// Paths to mount a tmpfs on.
    pub tmpfs: Vec<String>,
    /// Template directory to snapshot the rootfs from.
    pub template: String,
    /// Working directory inside the container.
    pub cwd: String,
    /// Machine name (nspawn defaults it to the rootfs directory name).
    pub machine: String,
    /// Mount the rootfs read-only.
    pub read_only: bool,
    /// Run with a temporary snapshot of the rootfs.
    pub ephemeral: bool,
    /// Suppress nspawn status output.
    pub quiet: bool,
    /// Boot the container's init instead of running a command.
    pub boot: bool,
    /// Machine ID to assign.
    pub uuid: String,
    /// Emulated architecture mode.
    pub personality: String,
    /// SELinux context for container processes.
    pub selinux_context: String,
    /// SELinux context for the container's API filesystems.
    pub selinux_apifs_context: String,
    /// Register the container with systemd-machined. Off by default.
    pub register_machine: bool,
    /// Read-write bind mounts.
    pub bind_mounts: Vec<BindMount>,
    /// Read-only bind mounts.
    pub bind_ro_mounts: Vec<BindMount>,
}

impl Container {
    /// Build an empty descriptor for `nspawn`, rooted at `dir`.
    #[must_use]
    pub fn new(nspawn: Nspawn, dir: impl Into<PathBuf>) -> Self {
        Self {
            nspawn,
            dir: dir.into(),
            additional_args: Vec::new(),
            env: Vec::new(),
            tmpfs: Vec::new(),
            template: String::new(),
            cwd: String::new(),
            machine: String::new(),
            read_only: false,
            ephemeral: false,
            quiet: false,
            boot: false,
            uuid: String::new(),
            personality: String::new(),
            selinux_context: String::new(),
            selinux_apifs_context: String::new(),
            register_machine: false,
            bind_mounts: Vec::new(),
            bind_ro_mounts: Vec::new(),
        }
    }

    /// The launcher handle this descriptor renders against.
    #[must_use]
    pub fn nspawn(&self) -> &Nspawn {
        &self.nspawn
    }

    /// Render the ordered nspawn argument list for this descriptor.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        FLAG_RULES.iter().flat_map(|rule| rule(self)).collect()
    }

    /// Assemble the ready-to-call command for this container.
    ///
    /// `workload` is appended after the rendered flags. From here the
    /// caller handles stdin, stdout and stderr as well as running the
    /// command.
    #[must_use]
    pub fn command(&self, workload: &[String]) -> Command {
        let mut cmd = Command::new(self.nspawn.path());
        cmd.args(self.args()).args(workload);
        cmd
    }
}

fn flag_boot(c: &Container) -> Vec<String> {
    if c.boot {
        return vec!["-b".to_string()];
    }
    Vec::new()
}

fn flag_bind_mounts(c: &Container) -> Vec<String> {
    let mut args = Vec::new();
    for (flag, mounts) in [("--bind", &c.bind_mounts), ("--bind-ro", &c.bind_ro_mounts)] {
        for mount in mounts {
            if mount.source.is_empty() {
                tracing::warn!(
                    destination = %mount.destination,
                    "skipping bind mount with empty source"
                );
                continue;
            }
            args.push(format!("{flag}={mount}"));
        }
    }
    args
}

fn flag_chdir(c: &Container) -> Vec<String> {
    if c.cwd.is_empty() {
        return Vec::new();
    }
    match c.nspawn.version() {
        Some(v) if v >= CHDIR_MIN_VERSION => vec![format!("--chdir={}", c.cwd)],
        _ => Vec::new(),
    }
}

fn flag_tmpfs(c: &Container) -> Vec<String> {
    c.tmpfs.iter().map(|path| format!("--tmpfs={path}")).collect()
}

fn flag_machine(c: &Container) -> Vec<String> {
    if c.machine.is_empty() {
        return Vec::new();
    }
    vec!["--machine".to_string(), c.machine.clone()]
}

fn flag_template(c: &Container) -> Vec<String> {
    if c.template.is_empty() {
        return Vec::new();
    }
    vec!["--template".to_string(), c.template.clone()]
}

fn flag_selinux_context(c: &Container) -> Vec<String> {
    if c.selinux_context.is_empty() {
        return Vec::new();
    }
    vec!["--selinux-context".to_string(), c.selinux_context.clone()]
}

fn flag_selinux_apifs_context(c: &Container) -> Vec<String> {
    if c.selinux_apifs_context.is_empty() {
        return Vec::new();
    }
    vec![
        "--selinux-apifs-context".to_string(),
        c.selinux_apifs_context.clone(),
    ]
}

fn flag_personality(c: &Container) -> Vec<String> {
    if PERSONALITIES.contains(&c.personality.as_str()) {
        return vec!["--personality".to_string(), c.personality.clone()];
    }
    Vec::new()
}

fn flag_uuid(c: &Container) -> Vec<String> {
    if c.uuid.is_empty() {
        return Vec::new();
    }
    vec!["--uuid".to_string(), c.uuid.clone()]
}

fn flag_read_only(c: &Container) -> Vec<String> {
    if c.read_only {
        return vec!["--read-only".to_string()];
    }
    Vec::new()
}

fn flag_quiet(c: &Container) -> Vec<String> {
    if c.quiet {
        return vec!["-q".to_string()];
    }
    Vec::new()
}

fn flag_directory(c: &Container) -> Vec<String> {
    vec!["-D".to_string(), c.dir.to_string_lossy().into_owned()]
}

fn flag_setenv(c: &Container) -> Vec<String> {
    c.env.iter().map(|entry| format!("--setenv={entry}")).collect()
}

fn flag_ephemeral(c: &Container) -> Vec<String> {
    if c.ephemeral {
        return vec!["--ephemeral".to_string()];
    }
    Vec::new()
}

fn flag_additional_args(c: &Container) -> Vec<String> {
    c.additional_args.clone()
}

// Containers are not registered with systemd-machined unless asked for.
fn flag_register_machine(c: &Container) -> Vec<String> {
    if c.register_machine {
        return vec!["--register=true".to_string()];
    }
    vec!["--register=false".to_string()]
}
