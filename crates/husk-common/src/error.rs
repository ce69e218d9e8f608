//! Common error types for the Husk launcher.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`HuskError`].
pub type HuskResult<T> = Result<T, HuskError>;

/// Errors surfaced by bundle reading, flag construction and launching.
///
/// Every variant terminates the invocation; nothing is retried. The one
/// failure that does not appear here is the nspawn version probe, which
/// degrades to omitting version-gated flags instead of erroring.
#[derive(Error, Diagnostic, Debug)]
pub enum HuskError {
    /// Bundle config missing or unreadable.
    #[error("I/O error: {0}")]
    #[diagnostic(code(husk::io))]
    Io(#[from] std::io::Error),

    /// Bundle config is not well-formed JSON or does not match the
    /// runtime spec shape.
    #[error("malformed bundle config: {0}")]
    #[diagnostic(code(husk::decode))]
    Decode(#[from] serde_json::Error),

    /// The bundle declares an OS that nspawn cannot launch.
    #[error("unsupported platform OS: {os}")]
    #[diagnostic(
        code(husk::unsupported_platform),
        help("only bundles declaring platform.os = \"linux\" can be launched")
    )]
    UnsupportedPlatform {
        /// The declared OS.
        os: String,
    },

    /// The nspawn binary was not found on the search path.
    #[error("launcher binary not found: {binary}")]
    #[diagnostic(
        code(husk::lookup),
        help("install systemd-container or point --nspawn at the binary")
    )]
    Lookup {
        /// Name or path of the missing binary.
        binary: String,
    },

    /// The workload failed to spawn or exited non-zero.
    #[error("container process failed: {message}")]
    #[diagnostic(code(husk::child))]
    ChildProcess {
        /// Description of the failure.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("configuration error: {message}")]
    #[diagnostic(code(husk::config))]
    Config {
        /// The error message.
        message: String,
    },
}
