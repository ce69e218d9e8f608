//! OCI Runtime Specification types.
//!
//! Shapes follow the OCI Runtime Specification config document:
//! <https://github.com/opencontainers/runtime-spec/blob/main/config.md>
//!
//! Every field carries `#[serde(default)]` semantics: missing or unknown
//! fields come back as zero values, and no semantic validation happens at
//! decode time. That matches the launcher's contract of consuming a config
//! it assumes to be valid.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// OCI Runtime Specification (config.json).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spec {
    /// OCI version the bundle was written against.
    pub oci_version: String,

    /// Host platform the bundle targets.
    pub platform: Platform,

    /// Container's root filesystem.
    pub root: Root,

    /// Container process configuration.
    pub process: Process,

    /// Container hostname.
    pub hostname: String,

    /// Additional mounts, beyond the root filesystem.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<Mount>,

    /// Annotations (key-value pairs).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
}

/// Platform the bundle declares itself for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    /// Operating system (e.g. "linux").
    pub os: String,
    /// CPU architecture (e.g. "amd64").
    pub arch: String,
}

/// Root filesystem configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Root {
    /// Path to the root filesystem, relative to the bundle directory.
    pub path: PathBuf,
    /// Whether the root filesystem is read-only.
    pub readonly: bool,
}

/// Process configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Process {
    /// Whether to run with a terminal.
    pub terminal: bool,

    /// User to run as.
    pub user: User,

    /// Command and arguments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Environment variables, each "KEY=VALUE".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,

    /// Working directory inside the container.
    pub cwd: String,
}

/// User and group IDs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// User ID.
    pub uid: u32,
    /// Group ID.
    pub gid: u32,
    /// Additional group IDs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_gids: Vec<u32>,
}

/// Mount configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mount {
    /// Mount destination path (inside the container).
    pub destination: String,
    /// Mount type (e.g. "bind", "tmpfs", "proc").
    #[serde(rename = "type")]
    pub mount_type: String,
    /// Mount source path (on the host).
    pub source: String,
    /// Mount options.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}
