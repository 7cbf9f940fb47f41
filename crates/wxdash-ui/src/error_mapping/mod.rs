//! Maps service errors to wxdash_core::AppError for consistent user-facing messages.

mod weather;

use wxdash_core::AppError;

/// The message shown on the dashboard's status line for an error.
pub fn status_message(err: impl Into<AppError>) -> String {
    let err = err.into();
    tracing::debug!("Reporting error to user: {}", err);
    err.user_message().to_string()
}
