pub mod dashboard_model;

pub use dashboard_model::{DashboardModel, RecentSearches, SessionStatus, MAX_RECENT_SEARCHES};
