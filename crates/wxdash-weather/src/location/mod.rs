//! Device location.
//!
//! Linux asks GeoClue2 over the system bus, Windows asks the platform
//! geolocator. Other targets report the capability as unsupported.

#[cfg(target_os = "linux")]
mod geoclue;
#[cfg(windows)]
mod winrt;

use std::time::Duration;

use wxdash_core::LocationConfig;

use crate::error::LocationError;
use crate::types::{Coordinates, Location};

/// Where the device location comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Platform location service, bounded by `timeout`.
    System { desktop_id: String, timeout: Duration },
    /// Coordinates pinned in the config file.
    Fixed(Coordinates),
    /// Auto-location switched off.
    Disabled,
}

impl LocationSource {
    pub fn from_config(config: &LocationConfig) -> Self {
        if let Some((latitude, longitude)) = config.fixed_coordinates() {
            return Self::Fixed(Coordinates::new(latitude, longitude));
        }
        if !config.enabled {
            return Self::Disabled;
        }
        Self::System {
            desktop_id: config.desktop_id.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Resolve the device location once. No retries.
    pub async fn resolve(&self) -> Result<Location, LocationError> {
        match self {
            Self::Fixed(coordinates) => Ok(Location::from(*coordinates)),
            Self::Disabled => Err(LocationError::Unsupported),
            Self::System {
                desktop_id,
                timeout,
            } => {
                tracing::info!("Requesting device location");
                let location = tokio::time::timeout(*timeout, current_location(desktop_id))
                    .await
                    .map_err(|_| LocationError::Timeout)??;
                tracing::debug!(
                    "Location resolved to {:.4}, {:.4}",
                    location.coordinates.latitude,
                    location.coordinates.longitude
                );
                Ok(location)
            }
        }
    }
}

#[cfg(target_os = "linux")]
async fn current_location(desktop_id: &str) -> Result<Location, LocationError> {
    geoclue::current_location(desktop_id).await
}

#[cfg(windows)]
async fn current_location(_desktop_id: &str) -> Result<Location, LocationError> {
    winrt::current_location().await
}

#[cfg(not(any(target_os = "linux", windows)))]
async fn current_location(_desktop_id: &str) -> Result<Location, LocationError> {
    Err(LocationError::Unsupported)
}
