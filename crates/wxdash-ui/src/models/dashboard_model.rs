//! Session state: status machine, published snapshot and recent searches.
//!
//! Every fetch or locate attempt gets a generation number. Results whose
//! generation is not the latest are dropped, so a slow older request can
//! never overwrite a newer one.

use std::collections::VecDeque;
use std::sync::Arc;

use wxdash_weather::{Location, LocationError, TemperatureUnit};

use crate::error_mapping::status_message;
use crate::services::{FetchError, Snapshot};

pub const MAX_RECENT_SEARCHES: usize = 5;

/// Session status. Loading and error are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    ResolvingLocation,
    Fetching,
    Ready,
    Error(String),
}

impl SessionStatus {
    /// True while an attempt is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::ResolvingLocation | Self::Fetching)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Most-recent-first city names, deduplicated, at most five.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSearches {
    names: VecDeque<String>,
}

impl RecentSearches {
    /// Move `name` to the front, dropping the oldest entry past the limit.
    pub fn push(&mut self, name: &str) {
        self.names.retain(|n| n != name);
        self.names.push_front(name.to_string());
        self.names.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct DashboardModel {
    status: SessionStatus,
    snapshot: Option<Arc<Snapshot>>,
    recent: RecentSearches,
    unit: TemperatureUnit,
    resolved_name: Option<String>,
    generation: u64,
    /// Set when the unit changed while an attempt was in flight.
    unit_refresh_pending: bool,
}

impl DashboardModel {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            unit,
            ..Self::default()
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref()
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Display name of the last published snapshot.
    pub fn resolved_name(&self) -> Option<&str> {
        self.resolved_name.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Start a device-location attempt. Returns its generation.
    pub fn begin_locate(&mut self) -> u64 {
        self.generation += 1;
        self.status = SessionStatus::ResolvingLocation;
        self.generation
    }

    /// Start a weather fetch attempt. Returns its generation.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.status = SessionStatus::Fetching;
        self.generation
    }

    /// Apply a location result. Returns the location when the caller should
    /// go on to fetch weather for it under the same generation.
    pub fn on_location_done(
        &mut self,
        generation: u64,
        result: Result<Location, LocationError>,
    ) -> Option<Location> {
        if !self.is_current(generation) {
            tracing::debug!("Dropping stale location result #{}", generation);
            return None;
        }

        match result {
            Ok(location) => {
                self.status = SessionStatus::Fetching;
                Some(location)
            }
            Err(e) => {
                // No fallback search and no retry: the user picks a city.
                self.unit_refresh_pending = false;
                self.status = SessionStatus::Error(status_message(e));
                None
            }
        }
    }

    /// Apply a fetch result. Returns whether it was applied.
    pub fn on_fetch_done(&mut self, generation: u64, result: Result<Snapshot, FetchError>) -> bool {
        if !self.is_current(generation) {
            tracing::debug!(
                "Dropping stale fetch result #{} (latest #{})",
                generation,
                self.generation
            );
            return false;
        }

        match result {
            Ok(snapshot) => {
                let name = snapshot.resolved_name().to_string();
                self.recent.push(&name);
                self.resolved_name = Some(name);
                self.snapshot = Some(Arc::new(snapshot));
                self.status = SessionStatus::Ready;
            }
            Err(e) => {
                // The previous snapshot stays on screen.
                self.unit_refresh_pending = false;
                self.status = SessionStatus::Error(status_message(e));
            }
        }
        true
    }

    /// Change the unit preference. Returns the city to re-fetch, if any.
    ///
    /// While an attempt is in flight only the preference changes; the
    /// re-fetch is deferred to [`Self::take_unit_refresh`].
    pub fn set_unit(&mut self, unit: TemperatureUnit) -> Option<String> {
        self.unit = unit;
        if self.status.is_busy() {
            self.unit_refresh_pending = true;
            return None;
        }
        self.stale_unit_name()
    }

    /// The city to re-fetch once a deferred unit change meets a successful
    /// result. Fires at most once per change; a failed attempt cancels it.
    pub fn take_unit_refresh(&mut self) -> Option<String> {
        if self.status != SessionStatus::Ready {
            return None;
        }
        if !std::mem::take(&mut self.unit_refresh_pending) {
            return None;
        }
        self.stale_unit_name()
    }

    fn stale_unit_name(&self) -> Option<String> {
        let snapshot = self.snapshot.as_ref()?;
        if snapshot.unit == self.unit {
            return None;
        }
        self.resolved_name.clone()
    }
}
