// ─────────────────────────────────────────────────────────────────────
// Universal Projection Field — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all projection field failures.
///
/// The field itself clamps every numeric input, so these only surface at
/// construction, on state restore, or from a domain adapter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpfError {
    /// Invalid configuration parameter.
    #[error("config error: {0}")]
    Config(String),

    /// Per-layer array does not match the configured layer count.
    #[error("shape mismatch: expected {expected} layers, got {got}")]
    Shape { expected: usize, got: usize },

    /// Domain adapter failed to normalize or interpret.
    #[error("adapter error: {0}")]
    Adapter(String),

    /// A raw input field required by an adapter is absent.
    #[error("missing raw input: {0}")]
    MissingInput(String),

    /// Numerical error (NaN/Inf where a finite value is required).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type UpfResult<T> = Result<T, UpfError>;
