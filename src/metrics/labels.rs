//! Metric names and label keys

/// Sessions opened successfully
pub const CONNECTIONS_OPENED: &str = "taos_connect_connections_opened_total";

/// Connection attempts that failed
pub const CONNECTIONS_FAILED: &str = "taos_connect_connections_failed_total";

/// Sessions released
pub const CONNECTIONS_CLOSED: &str = "taos_connect_connections_closed_total";

/// Driver name label
pub const DRIVER: &str = "driver";

/// SQLSTATE label
pub const SQL_STATE: &str = "sql_state";
