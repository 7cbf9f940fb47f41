//! Windows.Devices.Geolocation backend.

use windows::Devices::Geolocation::{GeolocationAccessStatus, Geolocator};

use crate::error::LocationError;
use crate::types::{Coordinates, Location};

pub(super) async fn current_location() -> Result<Location, LocationError> {
    // The WinRT async operations are driven with blocking `get()`.
    tokio::task::spawn_blocking(locate)
        .await
        .map_err(|e| LocationError::Other(e.to_string()))?
}

fn locate() -> Result<Location, LocationError> {
    let access = Geolocator::RequestAccessAsync()
        .and_then(|op| op.get())
        .map_err(other)?;
    if access != GeolocationAccessStatus::Allowed {
        return Err(LocationError::PermissionDenied);
    }

    let locator = Geolocator::new().map_err(other)?;
    let position = locator
        .GetGeopositionAsync()
        .and_then(|op| op.get())
        .map_err(other)?;
    let coordinate = position.Coordinate().map_err(other)?;
    let point = coordinate
        .Point()
        .and_then(|p| p.Position())
        .map_err(other)?;

    Ok(Location {
        coordinates: Coordinates::new(point.Latitude, point.Longitude),
        accuracy_meters: coordinate.Accuracy().ok(),
    })
}

fn other(err: windows::core::Error) -> LocationError {
    LocationError::Other(err.message().to_string())
}
