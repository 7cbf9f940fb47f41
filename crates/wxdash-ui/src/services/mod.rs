pub mod weather_service;

pub use weather_service::{
    assemble, assemble_by_coords, assemble_by_name, request_fetch as request_weather_fetch,
    request_locate, Addressing, FetchError, Query, Snapshot, WeatherServiceMessage,
};
