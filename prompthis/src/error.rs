use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("parameter '{param}' out of range [{min}, {max}], got {got}")]
    OutOfRange { param: &'static str, min: f64, max: f64, got: f64 },
    #[error("parameter '{0}' must be finite")]
    NonFinite(&'static str),
    #[error("unknown image id '{0}'")]
    UnknownImage(String),
    #[error("length mismatch: expected {expected} {what}, got {got}")]
    Mismatch { what: &'static str, expected: usize, got: usize },
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code, used by the wasm result envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::OutOfRange { .. } => "out_of_range",
            Error::NonFinite(_) => "non_finite",
            Error::UnknownImage(_) => "unknown_image",
            Error::Mismatch { .. } => "mismatch",
            Error::Json(_) => "json_parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Range check shared by config validation and the wasm bindings.
pub fn check_range(param: &'static str, v: f64, min: f64, max: f64) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::NonFinite(param));
    }
    if v < min || v > max {
        return Err(Error::OutOfRange { param, min, max, got: v });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(Error::InvalidArgument("x".into()).code(), "invalid_argument");
        assert_eq!(Error::NonFinite("t").code(), "non_finite");
        assert_eq!(check_range("t", 1.5, 0.0, 1.0).unwrap_err().code(), "out_of_range");
        assert_eq!(check_range("t", f64::NAN, 0.0, 1.0).unwrap_err().code(), "non_finite");
        assert!(check_range("t", 0.5, 0.0, 1.0).is_ok());
    }
}
