//! Error types
//!
//! Every failure surfaces the same three fields a caller prints when a
//! connection attempt fails: a SQLSTATE class, a non-zero numeric code and a
//! message. Errors reported by the server keep the server's code and message;
//! errors raised on the client side use the codes in [`codes`].

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// SQLSTATE values produced by this crate
pub mod sql_state {
    /// Client unable to establish connection
    pub const UNABLE_TO_CONNECT: &str = "08001";

    /// Connection does not exist (closed)
    pub const CONNECTION_DOES_NOT_EXIST: &str = "08003";

    /// Connection failure after it was established, or a garbled response
    pub const CONNECTION_FAILURE: &str = "08006";

    /// Invalid authorization specification
    pub const INVALID_AUTHORIZATION: &str = "28000";

    /// Function sequence error
    pub const FUNCTION_SEQUENCE: &str = "HY010";

    /// General error
    pub const GENERAL: &str = "HY000";
}

/// Numeric error codes
pub mod codes {
    /// Server unreachable (refused, unresolved, timed out)
    pub const NETWORK_UNAVAILABLE: i32 = 0x000B;

    /// Server-side authentication failure (rpc layer)
    pub const RPC_AUTH_FAILURE: i32 = 0x0003;

    /// Server-side authentication failure (mnode)
    pub const MND_AUTH_FAILURE: i32 = 0x0357;

    /// Operation on a closed connection
    pub const CONNECTION_CLOSED: i32 = 0x2301;

    /// Malformed URL or option value
    pub const INVALID_VARIABLE: i32 = 0x2303;

    /// No registered driver accepts the URL
    pub const NO_SUITABLE_DRIVER: i32 = 0x2311;

    /// Unexpected response from the server
    pub const PROTOCOL: i32 = 0x2318;

    /// Local I/O failure
    pub const IO: i32 = 0x2319;

    /// Invalid connection state transition
    pub const INVALID_STATE: i32 = 0x2320;
}

/// Structured error fields exposed on failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// SQLSTATE classification
    pub sql_state: String,
    /// Numeric error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
}

impl ErrorRecord {
    /// Create a record from its three fields
    pub fn new(sql_state: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            sql_state: sql_state.into(),
            code,
            message: message.into(),
        }
    }

    /// Record for an error code reported by the server.
    ///
    /// Authentication failures are classified as `28000`, anything else as
    /// `HY000`.
    pub fn from_server(code: i32, message: impl Into<String>) -> Self {
        let state = match code {
            codes::RPC_AUTH_FAILURE | codes::MND_AUTH_FAILURE => sql_state::INVALID_AUTHORIZATION,
            _ => sql_state::GENERAL,
        };
        Self::new(state, code, message)
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[0x{:04X}] {} (SQLSTATE {})",
            self.code, self.message, self.sql_state
        )
    }
}

/// Crate error type
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed URL, option or descriptor
    #[error("invalid connection configuration: {0}")]
    Config(String),

    /// No registered driver accepts the URL (password redacted)
    #[error("No suitable driver found for {0}")]
    NoSuitableDriver(String),

    /// Error reported by the server
    #[error("{0}")]
    Server(ErrorRecord),

    /// Server could not be reached
    #[error("network unavailable: {0}")]
    Network(String),

    /// Server answered with something the driver does not understand
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Invalid state transition
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Connection already closed
    #[error("connection already closed")]
    ConnectionClosed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// SQLSTATE classification of this error
    pub fn sql_state(&self) -> &str {
        match self {
            Error::Config(_) | Error::NoSuitableDriver(_) | Error::Network(_) => {
                sql_state::UNABLE_TO_CONNECT
            }
            Error::Server(record) => record.sql_state.as_str(),
            Error::Protocol(_) => sql_state::CONNECTION_FAILURE,
            Error::InvalidState { .. } => sql_state::FUNCTION_SEQUENCE,
            Error::ConnectionClosed => sql_state::CONNECTION_DOES_NOT_EXIST,
            Error::Io(_) => sql_state::GENERAL,
        }
    }

    /// Numeric error code, never zero
    pub fn error_code(&self) -> i32 {
        match self {
            Error::Config(_) => codes::INVALID_VARIABLE,
            Error::NoSuitableDriver(_) => codes::NO_SUITABLE_DRIVER,
            Error::Server(record) => record.code,
            Error::Network(_) => codes::NETWORK_UNAVAILABLE,
            Error::Protocol(_) => codes::PROTOCOL,
            Error::InvalidState { .. } => codes::INVALID_STATE,
            Error::ConnectionClosed => codes::CONNECTION_CLOSED,
            Error::Io(_) => codes::IO,
        }
    }

    /// Human-readable message
    pub fn message(&self) -> String {
        match self {
            Error::Server(record) => record.message.clone(),
            other => other.to_string(),
        }
    }

    /// Render as an [`ErrorRecord`]
    pub fn record(&self) -> ErrorRecord {
        ErrorRecord::new(self.sql_state(), self.error_code(), self.message())
    }

    /// Returns true if the server rejected the credentials
    pub fn is_auth_error(&self) -> bool {
        self.sql_state() == sql_state::INVALID_AUTHORIZATION
    }
}

impl From<ErrorRecord> for Error {
    fn from(record: ErrorRecord) -> Self {
        Error::Server(record)
    }
}
