//! Bind mount parameters.

use std::fmt;

/// Parameter for `--bind=` and `--bind-ro=`.
///
/// Renders as `PATH[:PATH[:OPTIONS]]` (see systemd-nspawn(1)). An empty
/// source renders to an empty token; the flag pipeline refuses to emit
/// such a token and warns instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindMount {
    /// Host path.
    pub source: String,
    /// Path inside the container; defaults to the source path when empty.
    pub destination: String,
    /// Mount options, joined with `,` when rendered.
    pub options: Vec<String>,
}

impl BindMount {
    /// Build a bind mount parameter.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            options,
        }
    }
}

impl fmt::Display for BindMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.is_empty() {
            return Ok(());
        }
        if self.destination.is_empty() {
            return write!(f, "{}", self.source);
        }
        if self.options.is_empty() {
            return write!(f, "{}:{}", self.source, self.destination);
        }
        write!(
            f,
            "{}:{}:{}",
            self.source,
            self.destination,
            self.options.join(",")
        )
    }
}
