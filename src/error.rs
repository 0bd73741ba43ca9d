use thiserror::Error;

/// Errors raised by the numerical core.
///
/// Module and I/O code wraps these in [`anyhow::Error`]; callers that need to
/// distinguish bad input from a broken invariant can `downcast_ref::<SimError>()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A caller-supplied numeric input is non-finite or outside its accepted range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: String,
    },
    /// Internal state is inconsistent (e.g. grid shape mismatch). Should be unreachable.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
}

impl SimError {
    pub fn invalid(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariantViolation(message.into())
    }
}

/// Rejects non-finite values and values outside `[min, max]`.
pub fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<f64, SimError> {
    if !value.is_finite() {
        return Err(SimError::invalid(name, value, "value must be finite"));
    }
    if value < min || value > max {
        return Err(SimError::invalid(
            name,
            value,
            format!("expected a value in [{min}, {max}]"),
        ));
    }
    Ok(value)
}

/// Rejects non-finite and non-positive values.
pub fn check_positive(name: &'static str, value: f64) -> Result<f64, SimError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::invalid(name, value, "expected a finite positive value"));
    }
    Ok(value)
}
