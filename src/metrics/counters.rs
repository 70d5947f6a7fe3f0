//! Counter helpers

use super::labels;

/// Record a successfully opened session
pub fn connection_opened(driver: &'static str) {
    metrics::counter!(labels::CONNECTIONS_OPENED, labels::DRIVER => driver).increment(1);
}

/// Record a failed connection attempt
pub fn connection_failed(driver: &'static str, sql_state: &str) {
    metrics::counter!(
        labels::CONNECTIONS_FAILED,
        labels::DRIVER => driver,
        labels::SQL_STATE => sql_state.to_string()
    )
    .increment(1);
}

/// Record a released session
pub fn connection_closed(driver: &'static str) {
    metrics::counter!(labels::CONNECTIONS_CLOSED, labels::DRIVER => driver).increment(1);
}
