//! Driver registry scenarios
//!
//! Uses an in-process driver for the `db` scheme that records what it was
//! given and counts opened and released sessions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use taos_connect::client::DriverRegistry;
use taos_connect::error::{codes, ErrorRecord};
use taos_connect::{
    ConnectionConfig, ConnectionState, Driver, DriverManager, Error, Properties, Result, Session,
};

#[derive(Default)]
struct Recorder {
    opened: AtomicUsize,
    closed: AtomicUsize,
    last_config: Mutex<Option<ConnectionConfig>>,
}

struct RecordingDriver {
    recorder: Arc<Recorder>,
}

struct RecordingSession {
    recorder: Arc<Recorder>,
}

impl Session for RecordingSession {
    fn server_version(&mut self) -> Result<String> {
        Ok("3.3.2.0".into())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.recorder.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Driver for RecordingDriver {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn schemes(&self) -> &[&'static str] {
        &["db"]
    }

    fn default_port(&self) -> u16 {
        6030
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Session>> {
        *self.recorder.last_config.lock().unwrap() = Some(config.clone());

        if config.endpoint().host() == "unreachable" {
            return Err(Error::Network(format!(
                "Unable to establish connection to {}:{}",
                config.endpoint().host(),
                config.endpoint().port().unwrap_or(self.default_port())
            )));
        }
        if config.credentials().password() != Some("secret") {
            return Err(ErrorRecord::from_server(codes::MND_AUTH_FAILURE, "Authentication failure").into());
        }

        self.recorder.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingSession {
            recorder: self.recorder.clone(),
        }))
    }
}

fn registry() -> (DriverRegistry, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let registry = DriverRegistry::with_defaults();
    registry.register(Arc::new(RecordingDriver {
        recorder: recorder.clone(),
    }));
    (registry, recorder)
}

#[test]
fn test_reachable_endpoint_connects() {
    let (registry, recorder) = registry();
    let props = Properties::new().with(Properties::CHARSET, "UTF-8");

    let conn = registry
        .get_connection("db://localhost:6030?user=root&password=secret", props)
        .expect("connect");

    assert_eq!(conn.state(), ConnectionState::Open);
    assert_eq!(conn.driver_name(), "recording");
    assert_eq!(conn.config().options().charset(), Some("UTF-8"));
    assert_eq!(recorder.opened.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unreachable_endpoint_reports_record() {
    let (registry, recorder) = registry();

    let err = registry
        .get_connection(
            "db://unreachable:1/?user=root&password=wrong",
            Properties::new(),
        )
        .unwrap_err();

    let record = err.record();
    assert_eq!(record.sql_state, "08001");
    assert_ne!(record.code, 0);
    assert!(record.message.contains("unreachable:1"));
    assert_eq!(recorder.opened.load(Ordering::SeqCst), 0);
    assert_eq!(recorder.closed.load(Ordering::SeqCst), 0);
}

#[test]
fn test_invalid_credentials_report_record() {
    let (registry, _) = registry();

    let err = registry
        .get_connection("db://localhost:6030?user=root&password=wrong", Properties::new())
        .unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(err.sql_state(), "28000");
    assert_eq!(err.error_code(), codes::MND_AUTH_FAILURE);
    assert_eq!(err.message(), "Authentication failure");
}

#[test]
fn test_released_exactly_once_on_scope_exit() {
    let (registry, recorder) = registry();

    {
        let _conn = registry
            .get_connection("db://localhost?password=secret", Properties::new())
            .unwrap();
        assert_eq!(recorder.closed.load(Ordering::SeqCst), 0);
    }
    assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_released_exactly_once_after_explicit_close() {
    let (registry, recorder) = registry();

    let mut conn = registry
        .get_connection("db://localhost?password=secret", Properties::new())
        .unwrap();
    conn.close().unwrap();
    conn.close().unwrap();
    assert!(conn.is_closed());
    drop(conn);

    assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_released_when_body_fails() {
    fn use_connection(registry: &DriverRegistry) -> Result<()> {
        let mut conn = registry.get_connection("db://localhost?password=secret", Properties::new())?;
        conn.close()?;
        // using the connection after close fails and unwinds the scope
        conn.server_version()?;
        Ok(())
    }

    let (registry, recorder) = registry();
    let err = use_connection(&registry).unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));
    assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unrecognized_options_are_forwarded() {
    let (registry, recorder) = registry();
    let props = Properties::new()
        .with(Properties::LOCALE, "en_US.UTF-8")
        .with("batchfetch", "true");

    let _conn = registry
        .get_connection("db://localhost?password=secret&msgType=json", props)
        .unwrap();

    let guard = recorder.last_config.lock().unwrap();
    let config = guard.as_ref().unwrap();
    assert_eq!(config.options().get("batchfetch"), Some("true"));
    assert_eq!(config.options().get("msgType"), Some("json"));
    assert_eq!(config.options().locale(), Some("en_US.UTF-8"));
}

#[test]
fn test_options_fixed_at_connect() {
    let (registry, _) = registry();
    let mut props = Properties::new().with(Properties::TIME_ZONE, "UTC-8");

    let conn = registry
        .get_connection("db://localhost?password=secret", props.clone())
        .unwrap();
    props.set(Properties::TIME_ZONE, "UTC");

    assert_eq!(conn.config().options().timezone(), Some("UTC-8"));
}

#[test]
fn test_database_segment_optional() {
    let (registry, _) = registry();

    let with_db = registry
        .get_connection("db://localhost:6030/power?password=secret", Properties::new())
        .unwrap();
    let without_db = registry
        .get_connection("db://localhost:6030?password=secret", Properties::new())
        .unwrap();

    assert_eq!(with_db.config().endpoint().database(), Some("power"));
    assert_eq!(without_db.config().endpoint().database(), None);
}

#[test]
fn test_global_manager_scenario() {
    let recorder = Arc::new(Recorder::default());
    DriverManager::register(Arc::new(RecordingDriver {
        recorder: recorder.clone(),
    }));
    assert!(DriverManager::driver_names().contains(&"taos-rs"));

    let props = Properties::new().with(Properties::CHARSET, "UTF-8");
    let conn = DriverManager::get_connection("db://localhost:6030?user=root&password=secret", props);
    assert!(conn.is_ok());
    drop(conn);
    assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);

    let err = DriverManager::get_connection(
        "db://unreachable:1/?user=root&password=wrong",
        Properties::new(),
    )
    .unwrap_err();
    assert_eq!(err.sql_state(), "08001");
    assert!(!err.message().is_empty());

    assert!(DriverManager::deregister("recording"));
    assert!(matches!(
        DriverManager::driver("db://localhost").err(),
        Some(Error::NoSuitableDriver(_))
    ));
}
