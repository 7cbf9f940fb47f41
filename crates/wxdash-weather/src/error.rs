//! Weather client and location error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),
}

impl WeatherError {
    /// Whether the provider rejected the location itself rather than the request.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Location service errors
#[derive(Error, Debug)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location service unavailable on this system")]
    Unsupported,

    #[error("Location request timed out")]
    Timeout,

    #[error("Location error: {0}")]
    Other(String),
}

impl From<LocationError> for wxdash_core::LocationError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => Self::PermissionDenied,
            LocationError::Unsupported => Self::Unsupported,
            LocationError::Timeout => Self::Timeout,
            LocationError::Other(msg) => Self::Failed(msg),
        }
    }
}

impl From<LocationError> for wxdash_core::AppError {
    fn from(err: LocationError) -> Self {
        Self::Location(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_error_maps_to_core() {
        let core: wxdash_core::LocationError = LocationError::Timeout.into();
        assert!(matches!(core, wxdash_core::LocationError::Timeout));

        let core: wxdash_core::LocationError = LocationError::Other("dbus".into()).into();
        assert!(matches!(core, wxdash_core::LocationError::Failed(ref m) if m == "dbus"));
    }

    #[test]
    fn test_api_error_display() {
        let err = WeatherError::Api {
            status: 500,
            message: "internal".into(),
        };
        assert_eq!(err.to_string(), "API error 500: internal");
        assert!(!err.is_not_found());
        assert!(WeatherError::NotFound("x".into()).is_not_found());
    }
}
