//! Client entry points
//!
//! * Connection string parsing
//! * Driver registry and `get_connection`

mod connection_string;
mod driver_manager;

pub use connection_string::ConnectionInfo;
pub use driver_manager::{DriverManager, DriverRegistry};
