//! REST driver (`TAOS-RS`)
//!
//! Talks to the taosAdapter HTTP endpoint:
//! * `POST http(s)://host:port/rest/sql[/db][?tz=...]`
//! * HTTP basic auth, SQL text as the request body
//! * JSON response `{"code": 0, "data": [[...]], ...}`, non-zero `code`
//!   carrying the server error in `desc`
//!
//! Opening a session issues `SELECT SERVER_VERSION()` so that unreachable
//! servers and bad credentials fail at connect time.

use super::{Driver, Session};
use crate::connection::{ConnectionConfig, Properties};
use crate::error::ErrorRecord;
use crate::runtime::Runtime;
use crate::{Error, Result};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

const VERSION_QUERY: &str = "SELECT SERVER_VERSION()";

/// Driver option: use `https` instead of `http`
pub const USE_SSL: &str = "useSSL";

/// Driver option: TCP connect timeout in milliseconds
pub const HTTP_CONNECT_TIMEOUT: &str = "httpConnectTimeout";

/// REST driver for taosAdapter
#[derive(Debug, Default, Clone, Copy)]
pub struct RestDriver;

impl RestDriver {
    /// taosAdapter default port
    pub const DEFAULT_PORT: u16 = 6041;
}

impl Driver for RestDriver {
    fn name(&self) -> &'static str {
        "taos-rs"
    }

    fn schemes(&self) -> &[&'static str] {
        &["taos-rs"]
    }

    fn default_port(&self) -> u16 {
        Self::DEFAULT_PORT
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Session>> {
        let options = RestOptions::from_properties(config.options())?;
        let url = sql_url(config, self.default_port(), &options)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        let credentials = config.credentials();
        let mut session = RestSession {
            rt: Runtime::shared()?,
            client,
            url,
            user: credentials.user().to_string(),
            password: credentials.password().map(str::to_string),
        };

        let version = session.server_version()?;
        tracing::debug!(server_version = %version, "session validated");
        Ok(Box::new(session))
    }
}

/// Options the REST driver interprets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RestOptions {
    use_ssl: bool,
    connect_timeout: Option<Duration>,
    timezone: Option<String>,
}

impl RestOptions {
    fn from_properties(props: &Properties) -> Result<Self> {
        let mut options = RestOptions::default();

        for (key, value) in props.iter() {
            match key {
                USE_SSL => {
                    options.use_ssl = match value.to_ascii_lowercase().as_str() {
                        "true" => true,
                        "false" => false,
                        _ => {
                            return Err(Error::Config(format!(
                                "invalid {} '{}': expected true or false",
                                USE_SSL, value
                            )))
                        }
                    };
                }
                HTTP_CONNECT_TIMEOUT => {
                    let millis: u64 = value.parse().map_err(|_| {
                        Error::Config(format!(
                            "invalid {} '{}': expected milliseconds",
                            HTTP_CONNECT_TIMEOUT, value
                        ))
                    })?;
                    options.connect_timeout = Some(Duration::from_millis(millis));
                }
                Properties::TIME_ZONE => options.timezone = Some(value.to_string()),
                Properties::CHARSET => {
                    if !is_utf8(value) {
                        tracing::debug!(charset = value, "charset ignored, REST payloads are UTF-8");
                    }
                }
                Properties::USER | Properties::PASSWORD | Properties::DBNAME => {}
                other => tracing::debug!(option = other, "option not used by REST driver"),
            }
        }

        Ok(options)
    }
}

fn is_utf8(charset: &str) -> bool {
    charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8")
}

/// Build the SQL endpoint URL for `config`
fn sql_url(config: &ConnectionConfig, default_port: u16, options: &RestOptions) -> Result<Url> {
    let endpoint = config.endpoint();
    let protocol = if options.use_ssl { "https" } else { "http" };
    let host = if endpoint.host().contains(':') && !endpoint.host().starts_with('[') {
        format!("[{}]", endpoint.host())
    } else {
        endpoint.host().to_string()
    };
    let port = endpoint.port().unwrap_or(default_port);

    let mut url = Url::parse(&format!("{}://{}:{}/rest/sql", protocol, host, port))
        .map_err(|e| Error::Config(format!("invalid endpoint '{}': {}", endpoint.host(), e)))?;

    if let Some(database) = endpoint.database() {
        url.path_segments_mut()
            .map_err(|_| Error::Config("endpoint cannot carry a path".into()))?
            .push(database);
    }
    if let Some(tz) = &options.timezone {
        url.query_pairs_mut().append_pair("tz", tz);
    }

    Ok(url)
}

/// Body of a `/rest/sql` response
#[derive(Debug, Deserialize)]
struct RestResponse {
    code: i32,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    data: Vec<Vec<serde_json::Value>>,
}

/// Interpret a `/rest/sql` reply
fn parse_response(status: StatusCode, body: &str) -> Result<RestResponse> {
    match serde_json::from_str::<RestResponse>(body) {
        Ok(resp) if resp.code != 0 => {
            let desc = resp
                .desc
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| format!("server error 0x{:04X}", resp.code));
            Err(ErrorRecord::from_server(resp.code, desc).into())
        }
        Ok(resp) => Ok(resp),
        Err(_) if !status.is_success() => Err(Error::Protocol(format!(
            "HTTP {}: {}",
            status,
            truncate(body, 200)
        ))),
        Err(e) => Err(Error::Protocol(format!("invalid response body: {}", e))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Map a transport failure, keeping the root cause in the message
fn transport_error(err: reqwest::Error) -> Error {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    if err.is_decode() || err.is_body() {
        Error::Protocol(message)
    } else {
        Error::Network(message)
    }
}

struct RestSession {
    rt: Runtime,
    client: reqwest::Client,
    url: Url,
    user: String,
    password: Option<String>,
}

impl RestSession {
    fn execute(&self, sql: &str) -> Result<RestResponse> {
        let request = self
            .client
            .post(self.url.clone())
            .basic_auth(&self.user, self.password.as_ref())
            .body(sql.to_string());

        self.rt.block_on(async move {
            let resp = request.send().await.map_err(transport_error)?;
            let status = resp.status();
            let body = resp.text().await.map_err(transport_error)?;
            parse_response(status, &body)
        })
    }
}

impl Session for RestSession {
    fn server_version(&mut self) -> Result<String> {
        let resp = self.execute(VERSION_QUERY)?;
        resp.data
            .first()
            .and_then(|row| row.first())
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::Protocol("server version missing from response".into()))
    }

    fn close(self: Box<Self>) -> Result<()> {
        tracing::debug!(url = %self.url, "REST session released");
        Ok(())
    }
}
