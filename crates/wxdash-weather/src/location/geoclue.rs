//! GeoClue2 client over the D-Bus system bus.

use futures_util::StreamExt;
use zbus::zvariant::OwnedObjectPath;
use zbus::Connection;

use crate::error::LocationError;
use crate::types::{Coordinates, Location};

/// GClueAccuracyLevel: city is enough for weather.
const ACCURACY_CITY: u32 = 4;

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Manager",
    default_service = "org.freedesktop.GeoClue2",
    default_path = "/org/freedesktop/GeoClue2/Manager"
)]
trait Manager {
    fn get_client(&self) -> zbus::Result<OwnedObjectPath>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Client",
    default_service = "org.freedesktop.GeoClue2"
)]
trait Client {
    fn start(&self) -> zbus::Result<()>;

    fn stop(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_desktop_id(&self, id: &str) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_requested_accuracy_level(&self, level: u32) -> zbus::Result<()>;

    #[zbus(signal)]
    fn location_updated(
        &self,
        old_location: OwnedObjectPath,
        new_location: OwnedObjectPath,
    ) -> zbus::Result<()>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Location",
    default_service = "org.freedesktop.GeoClue2"
)]
trait GeoLocation {
    #[zbus(property)]
    fn latitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn longitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn accuracy(&self) -> zbus::Result<f64>;
}

pub(super) async fn current_location(desktop_id: &str) -> Result<Location, LocationError> {
    let connection = Connection::system().await.map_err(|e| {
        tracing::debug!("System bus unavailable: {}", e);
        LocationError::Unsupported
    })?;

    let manager = ManagerProxy::new(&connection).await.map_err(map_dbus_error)?;
    let client_path = manager.get_client().await.map_err(map_dbus_error)?;

    let client = ClientProxy::builder(&connection)
        .path(client_path)
        .map_err(map_dbus_error)?
        .build()
        .await
        .map_err(map_dbus_error)?;

    client
        .set_desktop_id(desktop_id)
        .await
        .map_err(map_dbus_error)?;
    client
        .set_requested_accuracy_level(ACCURACY_CITY)
        .await
        .map_err(map_dbus_error)?;

    // Subscribe before starting so the first fix cannot be missed.
    let mut updates = client
        .receive_location_updated()
        .await
        .map_err(map_dbus_error)?;
    client.start().await.map_err(map_dbus_error)?;

    let signal = updates
        .next()
        .await
        .ok_or_else(|| LocationError::Other("location update stream closed".into()))?;
    let args = signal.args().map_err(map_dbus_error)?;

    let location = GeoLocationProxy::builder(&connection)
        .path(args.new_location().clone())
        .map_err(map_dbus_error)?
        .build()
        .await
        .map_err(map_dbus_error)?;

    let latitude = location.latitude().await.map_err(map_dbus_error)?;
    let longitude = location.longitude().await.map_err(map_dbus_error)?;
    let accuracy = location.accuracy().await.ok();

    if let Err(e) = client.stop().await {
        tracing::debug!("Failed to stop GeoClue client: {}", e);
    }

    Ok(Location {
        coordinates: Coordinates::new(latitude, longitude),
        accuracy_meters: accuracy,
    })
}

fn map_dbus_error(err: zbus::Error) -> LocationError {
    let text = err.to_string();
    if text.contains("AccessDenied") || text.contains("not allowed") {
        LocationError::PermissionDenied
    } else if text.contains("ServiceUnknown") || text.contains("NameHasNoOwner") {
        LocationError::Unsupported
    } else {
        LocationError::Other(text)
    }
}
