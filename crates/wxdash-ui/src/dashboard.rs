//! Session controller: turns user intents into fetch attempts and applies
//! their results to the model.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use wxdash_weather::{LocationSource, TemperatureUnit, WeatherProvider};

use crate::input::Command;
use crate::models::DashboardModel;
use crate::services::{request_locate, request_weather_fetch, Query, WeatherServiceMessage};
use crate::view::DashboardView;

pub struct Dashboard {
    provider: Arc<WeatherProvider>,
    location: LocationSource,
    model: DashboardModel,
    tx: UnboundedSender<WeatherServiceMessage>,
    show_backdrop_url: bool,
}

impl Dashboard {
    /// Create a dashboard and the receiver its fetch results arrive on.
    pub fn new(
        provider: WeatherProvider,
        location: LocationSource,
        unit: TemperatureUnit,
    ) -> (Self, UnboundedReceiver<WeatherServiceMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dashboard = Self {
            provider: Arc::new(provider),
            location,
            model: DashboardModel::new(unit),
            tx,
            show_backdrop_url: false,
        };
        (dashboard, rx)
    }

    pub fn with_backdrop_url(mut self, show: bool) -> Self {
        self.show_backdrop_url = show;
        self
    }

    pub fn model(&self) -> &DashboardModel {
        &self.model
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView::from_model(&self.model, self.show_backdrop_url)
    }

    /// First action of a session: search `city` if given, otherwise try the
    /// device location once.
    pub fn start(&mut self, city: Option<&str>) {
        match city {
            Some(city) => {
                self.search(city);
            }
            None if self.location.is_enabled() => self.locate(),
            None => tracing::info!("Auto-location disabled; waiting for a search"),
        }
    }

    /// Search by city name. Blank input is ignored.
    pub fn search(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.fetch(Query::City(name.to_string()));
        true
    }

    pub fn locate(&mut self) {
        let generation = self.model.begin_locate();
        tracing::info!("Locate #{}", generation);
        request_locate(&self.tx, self.location.clone(), generation);
    }

    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        if let Some(name) = self.model.set_unit(unit) {
            tracing::info!("Unit changed to {:?}, refreshing {}", unit, name);
            self.fetch(Query::City(name));
        }
    }

    pub fn toggle_unit(&mut self) {
        self.set_unit(self.model.unit().toggled());
    }

    /// Search the `index`-th recent city (0-based).
    pub fn select_recent(&mut self, index: usize) -> bool {
        match self.model.recent().get(index).map(str::to_string) {
            Some(name) => self.search(&name),
            None => false,
        }
    }

    /// Apply a parsed command. Returns false when the session should end.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Search(name) => {
                self.search(&name);
            }
            Command::Locate => self.locate(),
            Command::ToggleUnits => self.toggle_unit(),
            Command::Recent(n) => {
                if !self.select_recent(n.saturating_sub(1)) {
                    tracing::debug!("No recent search at position {}", n);
                }
            }
            Command::Help => {}
            Command::Quit => return false,
        }
        true
    }

    /// Apply a message from a finished background task.
    pub fn handle(&mut self, msg: WeatherServiceMessage) {
        match msg {
            WeatherServiceMessage::LocationDone { generation, result } => {
                if let Some(location) = self.model.on_location_done(generation, result) {
                    request_weather_fetch(
                        &self.tx,
                        self.provider.clone(),
                        generation,
                        Query::Coords(location.coordinates),
                        self.model.unit(),
                    );
                }
            }
            WeatherServiceMessage::FetchDone {
                generation,
                query,
                result,
            } => {
                if self.model.on_fetch_done(generation, result) {
                    tracing::debug!("Applied fetch #{} for {:?}", generation, query);
                    if let Some(name) = self.model.take_unit_refresh() {
                        self.fetch(Query::City(name));
                    }
                }
            }
        }
    }

    /// Wait for background results until nothing is in flight.
    pub async fn settle(&mut self, rx: &mut UnboundedReceiver<WeatherServiceMessage>) {
        while self.model.status().is_busy() {
            match rx.recv().await {
                Some(msg) => self.handle(msg),
                None => break,
            }
        }
    }

    fn fetch(&mut self, query: Query) {
        let generation = self.model.begin_fetch();
        tracing::info!("Fetch #{} for {:?}", generation, query);
        request_weather_fetch(
            &self.tx,
            self.provider.clone(),
            generation,
            query,
            self.model.unit(),
        );
    }
}
