//! Open a connection and report the outcome
//!
//! Run with:
//! ```bash
//! TAOS_URL="jdbc:TAOS-RS://localhost:6041/power?user=root&password=taosdata" \
//!     cargo run --example connect
//! ```
//!
//! `RUST_LOG=taos_connect=debug` shows the driver's view of the attempt.

use taos_connect::{DriverManager, Properties};
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "jdbc:TAOS-RS://localhost:6041?user=root&password=taosdata";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let url = std::env::var("TAOS_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());

    let mut props = Properties::new();
    props.set(Properties::CHARSET, "UTF-8");
    props.set(Properties::LOCALE, "en_US.UTF-8");
    props.set(Properties::TIME_ZONE, "UTC-8");

    match DriverManager::get_connection(&url, props) {
        Ok(_conn) => {
            println!("Connected");

            // the connection is released when `_conn` goes out of scope
        }
        Err(err) => {
            println!("SQLState: {}", err.sql_state());
            println!("Error Code: {}", err.error_code());
            println!("Message: {}", err.message());
        }
    }
}
