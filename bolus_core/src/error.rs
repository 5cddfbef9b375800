use thiserror::Error;

/// Why a dosing computation was refused.
///
/// No variant ever carries a fallback dose; a refused request yields nothing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DoseError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("collaborator failed: {0}")]
    Source(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing safety limits")]
    MissingSafety,
    #[error("missing patient profile")]
    MissingProfile,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

impl From<BuildError> for DoseError {
    fn from(e: BuildError) -> Self {
        match e {
            BuildError::InvalidConfig(msg) => DoseError::InvalidConfiguration(msg.to_string()),
            other => DoseError::InvalidConfiguration(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DoseError>;

/// Reject NaN and infinities before they reach any arithmetic.
#[inline]
pub(crate) fn ensure_finite(name: &str, v: f64) -> Result<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DoseError::InvalidInput(format!("{name} must be finite, got {v}")))
    }
}
