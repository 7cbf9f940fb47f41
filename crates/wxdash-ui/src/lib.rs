//! Terminal front-end for wxdash: session orchestration and rendering.
//!
//! `Dashboard` owns the session. User commands start fetch attempts through
//! `services`, results come back over a channel and are applied to the
//! `DashboardModel`, and `view::render` turns the model into text.

pub mod dashboard;
pub mod error_mapping;
pub mod input;
pub mod models;
pub mod services;
pub mod view;

pub use dashboard::Dashboard;
pub use input::Command;
pub use models::{DashboardModel, RecentSearches, SessionStatus};
pub use services::{FetchError, Query, Snapshot, WeatherServiceMessage};
pub use view::{render, DashboardView};
