//! Sensor document in a Firebase-style real-time database, read over its
//! REST interface (`<base>/<path>.json`).
//!
//! The bench gateway writes `temperature`, `humidite`, `nox`, `co` and `h2`
//! into one document; values arrive either as JSON numbers or as numeric
//! strings depending on the firmware revision.

use super::{SensorSnapshot, SensorSource};
use crate::domain::{DbdError, DbdResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    pub base_url: String,
    pub document_path: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            document_path: "reactor/sensors".to_string(),
            auth_token: None,
            timeout_secs: 10,
        }
    }
}

/// Decodes one sensor document. Unknown keys are ignored.
pub fn parse_document(content: &str) -> DbdResult<SensorSnapshot> {
    let value: Value = serde_json::from_str(content).map_err(|source| {
        DbdError::io_system(
            "IO.CLOUD_DOCUMENT",
            format!("sensor document is not valid JSON: {source}"),
        )
    })?;
    let Value::Object(fields) = value else {
        return Err(DbdError::io_system(
            "IO.CLOUD_DOCUMENT",
            "sensor document is missing or not a JSON object",
        ));
    };

    Ok(SensorSnapshot {
        captured_at: None,
        temperature_c: numeric_field(&fields, &["temperature", "temperature_c"])?,
        humidity_pct: numeric_field(&fields, &["humidite", "humidity"])?,
        nox_ppm: numeric_field(&fields, &["nox"])?,
        co_ppm: numeric_field(&fields, &["co"])?,
        h2_ppm: numeric_field(&fields, &["h2"])?,
        ozone_ppm: numeric_field(&fields, &["o3", "ozone"])?,
    })
}

fn numeric_field(fields: &Map<String, Value>, keys: &[&str]) -> DbdResult<Option<f64>> {
    let Some((key, value)) = keys
        .iter()
        .find_map(|key| fields.get(*key).map(|value| (*key, value)))
    else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(DbdError::io_system(
            "IO.CLOUD_FIELD",
            format!("sensor field '{key}' is not numeric: {value}"),
        )),
    }
}

pub struct CloudStore {
    settings: CloudSettings,
    agent: ureq::Agent,
}

impl CloudStore {
    pub fn new(settings: CloudSettings) -> DbdResult<Self> {
        if !settings.base_url.starts_with("http://") && !settings.base_url.starts_with("https://")
        {
            return Err(DbdError::input_validation(
                "INPUT.CLOUD_URL",
                format!(
                    "cloud database URL must start with http:// or https://, got '{}'",
                    settings.base_url
                ),
            ));
        }
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(concat!("oh-plasma/", env!("CARGO_PKG_VERSION")))
            .build();
        Ok(Self { settings, agent })
    }

    pub fn settings(&self) -> &CloudSettings {
        &self.settings
    }

    /// REST endpoint for `path` below the configured base URL. The auth token
    /// is not part of it; see [`CloudStore::request`].
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}.json",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    /// Request against `path`, carrying the auth token as a percent-encoded
    /// `auth` query parameter.
    pub fn request(&self, method: &str, path: &str) -> ureq::Request {
        let request = self.agent.request(method, &self.endpoint(path));
        match &self.settings.auth_token {
            Some(token) => request.query("auth", token),
            None => request,
        }
    }

    pub fn fetch_snapshot(&self) -> DbdResult<SensorSnapshot> {
        let path = self.settings.document_path.as_str();
        tracing::debug!(path, "fetching sensor document");
        let body = self
            .request("GET", path)
            .call()
            .map_err(|error| request_error(path, error))?
            .into_string()
            .map_err(|source| {
                DbdError::io_system(
                    "IO.CLOUD_RESPONSE",
                    format!("failed to read sensor document '{path}': {source}"),
                )
            })?;
        Ok(parse_document(&body)?.stamped(Utc::now()))
    }

    /// Appends `entry` under `<document_path>/logs` with a server-generated key.
    pub fn append_log<T: Serialize>(&self, entry: &T) -> DbdResult<()> {
        let path = format!("{}/logs", self.settings.document_path.trim_end_matches('/'));
        let body = serde_json::to_string(entry).map_err(|source| {
            DbdError::internal(
                "SYS.CLOUD_SERIALIZE",
                format!("failed to encode log entry: {source}"),
            )
        })?;
        self.request("POST", &path)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|error| request_error(&path, error))?;
        tracing::info!(path = path.as_str(), "appended log entry to cloud database");
        Ok(())
    }
}

/// The request URL carries the auth token, so messages are built from the
/// error kind and its source only.
fn request_error(path: &str, error: ureq::Error) -> DbdError {
    match error {
        ureq::Error::Status(status, _) => DbdError::io_system(
            "IO.CLOUD_STATUS",
            format!("cloud database answered HTTP {status} for '{path}'"),
        ),
        ureq::Error::Transport(transport) => {
            let mut detail = transport.kind().to_string();
            if let Some(source) = std::error::Error::source(&transport) {
                detail.push_str(": ");
                detail.push_str(&source.to_string());
            }
            DbdError::io_system(
                "IO.CLOUD_REQUEST",
                format!("cloud database request for '{path}' failed: {detail}"),
            )
        }
    }
}

impl SensorSource for CloudStore {
    fn name(&self) -> &str {
        "cloud"
    }

    fn read_snapshot(&mut self) -> DbdResult<SensorSnapshot> {
        self.fetch_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::{CloudSettings, CloudStore, parse_document};

    #[test]
    fn parses_numeric_and_string_fields() {
        let snapshot = parse_document(
            r#"{ "temperature": 24.5, "humidite": "61.2", "nox": 0.03, "co": null, "h2": "0", "label": "bench" }"#,
        )
        .expect("document should parse");

        assert_eq!(snapshot.temperature_c, Some(24.5));
        assert_eq!(snapshot.humidity_pct, Some(61.2));
        assert_eq!(snapshot.nox_ppm, Some(0.03));
        assert_eq!(snapshot.co_ppm, None);
        assert_eq!(snapshot.h2_ppm, Some(0.0));
        assert_eq!(snapshot.ozone_ppm, None);
        assert_eq!(snapshot.captured_at, None);
    }

    #[test]
    fn english_field_names_are_accepted() {
        let snapshot = parse_document(r#"{ "humidity": 40 }"#).expect("document should parse");
        assert_eq!(snapshot.humidity_pct, Some(40.0));
    }

    #[test]
    fn missing_document_and_bad_fields_are_io_errors() {
        let missing = parse_document("null").expect_err("null document should fail");
        assert_eq!(missing.placeholder(), "IO.CLOUD_DOCUMENT");

        let bad = parse_document(r#"{ "temperature": "warm" }"#)
            .expect_err("non-numeric field should fail");
        assert_eq!(bad.placeholder(), "IO.CLOUD_FIELD");
    }

    #[test]
    fn endpoint_joins_path_without_token() {
        let store = CloudStore::new(CloudSettings {
            base_url: "https://bench-rtdb.example.net/".to_string(),
            auth_token: Some("secret".to_string()),
            ..CloudSettings::default()
        })
        .expect("https URL should be accepted");

        assert_eq!(
            store.endpoint("/reactor/sensors/"),
            "https://bench-rtdb.example.net/reactor/sensors.json"
        );
    }

    #[test]
    fn auth_token_is_percent_encoded_in_the_query() {
        let store = CloudStore::new(CloudSettings {
            base_url: "https://bench-rtdb.example.net".to_string(),
            auth_token: Some("a&b#c".to_string()),
            ..CloudSettings::default()
        })
        .expect("https URL should be accepted");

        let request = store.request("GET", "reactor/sensors");
        assert_eq!(
            request.url(),
            "https://bench-rtdb.example.net/reactor/sensors.json?auth=a%26b%23c"
        );
    }

    #[test]
    fn transport_errors_do_not_expose_the_token() {
        let store = CloudStore::new(CloudSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            auth_token: Some("s3cr3tTOKEN".to_string()),
            timeout_secs: 2,
            ..CloudSettings::default()
        })
        .expect("http URL should be accepted");

        let error = store
            .fetch_snapshot()
            .expect_err("nothing listens on the discard port");
        assert_eq!(error.placeholder(), "IO.CLOUD_REQUEST");
        assert!(!error.message().contains("s3cr3tTOKEN"), "{}", error.message());
        assert!(!error.diagnostic_line().contains("auth="));
    }

    #[test]
    fn rejects_non_http_urls() {
        let error = CloudStore::new(CloudSettings {
            base_url: "bench-rtdb.example.net".to_string(),
            ..CloudSettings::default()
        })
        .err()
        .expect("bare host should fail");
        assert_eq!(error.placeholder(), "INPUT.CLOUD_URL");
    }
}
