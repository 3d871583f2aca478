//! OTLP export settings handed to every process and sidecar.
//!
//! `NEW_RELIC_REGION=EU` selects the EU ingest endpoint, anything else the US one.
//! The headers carry the license key, left empty when it is not set.

pub const US_OTLP_ENDPOINT: &str = "https://otlp.nr-data.net";
pub const EU_OTLP_ENDPOINT: &str = "https://otlp.eu01.nr-data.net";

pub const ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const HEADERS_VAR: &str = "OTEL_EXPORTER_OTLP_HEADERS";

#[derive(Clone, PartialEq, Eq)]
pub struct TelemetryExport {
    pub endpoint: String,
    pub headers: String,
}

// Headers contain the license key.
impl std::fmt::Debug for TelemetryExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryExport")
            .field("endpoint", &self.endpoint)
            .field("headers", &"<redacted>")
            .finish()
    }
}

impl TelemetryExport {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<L: Fn(&str) -> Option<String>>(lookup: L) -> Self {
        let endpoint = match lookup("NEW_RELIC_REGION").as_deref() {
            Some("EU") => EU_OTLP_ENDPOINT,
            _ => US_OTLP_ENDPOINT,
        };
        let license_key = lookup("NEW_RELIC_LICENSE_KEY").unwrap_or_default();
        Self {
            endpoint: endpoint.to_string(),
            headers: format!("api-key={license_key}"),
        }
    }

    /// The two variables, ready to merge into a process environment.
    pub fn environment(&self) -> [(&'static str, String); 2] {
        [
            (ENDPOINT_VAR, self.endpoint.clone()),
            (HEADERS_VAR, self.headers.clone()),
        ]
    }
}
