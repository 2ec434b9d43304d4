use crate::error::{AppError, Result};
use crate::types::{FilterParams, FilterSpec};

pub const UPSTREAM_URL: &str = "https://www.kiyiemniyeti.gov.tr/gemi_trafik_bilgi_sistemleri";

/// The upstream rejects requests without a browser-looking agent.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// Opening tag of the traffic table. The only stable anchor in the upstream markup.
pub const TABLE_MARKER: &str =
    r#"<table class="table no-margin table-striped filterable dataTable">"#;

/// Upstream request timeout (seconds) unless HTTP_TIMEOUT_SECS overrides it.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Istanbul has stayed on UTC+3 all year since 2016.
pub const ISTANBUL_UTC_OFFSET_SECS: i32 = 3 * 3600;

/// Ships this long or longer may only transit in daylight.
pub mod daytime_thresholds {
    pub const TANKER_MIN_LENGTH: f64 = 200.0;
    pub const ANY_MIN_LENGTH: f64 = 250.0;
}

/// Name prefix marking the south-to-north filters.
pub const SOUTH_PREFIX: &str = "Güney";

/// Name fragment marking the planned-movement filters.
pub const PLANNED_MARKER: &str = "Planlı";

/// The four queries issued on every run, in payload order.
pub const FILTER_SETS: [FilterSpec; 4] = [
    FilterSpec {
        name: "Kuzey-Güney_Planlı",
        params: FilterParams { strait: "I", direction: "NS", movement: "YP" },
    },
    FilterSpec {
        name: "Kuzey-Güney_Hazır",
        params: FilterParams { strait: "I", direction: "NS", movement: "YG" },
    },
    FilterSpec {
        name: "Güney-Kuzey_Planlı",
        params: FilterParams { strait: "I", direction: "SN", movement: "YP" },
    },
    FilterSpec {
        name: "Güney-Kuzey_Hazır",
        params: FilterParams { strait: "I", direction: "SN", movement: "YG" },
    },
];

#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_url: String,
    pub log_level: String,
    pub api_port: u16,
    /// Per-request timeout applied by the shared client (HTTP_TIMEOUT_SECS)
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            upstream_url: std::env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| UPSTREAM_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .unwrap_or(HTTP_TIMEOUT_SECS),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: UPSTREAM_URL.to_string(),
            log_level: "info".to_string(),
            api_port: 3000,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}
