use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where restaurant data comes from for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Drive the live site; a fatal stage fault fails the request.
    Live,
    /// Always answer from the synthetic generator.
    Synthetic,
    /// Drive the live site and answer synthetically when the run aborts.
    Fallback,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Live => write!(f, "live"),
            DataSource::Synthetic => write!(f, "synthetic"),
            DataSource::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(DataSource::Live),
            "synthetic" => Ok(DataSource::Synthetic),
            "fallback" => Ok(DataSource::Fallback),
            other => Err(format!(
                "unknown data source '{other}'; expected live, synthetic, or fallback"
            )),
        }
    }
}

/// How the Chromium driver is started or reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserSettings {
    /// Explicit Chromium binary; `None` lets the driver search the usual paths.
    pub executable: Option<PathBuf>,
    /// DevTools HTTP endpoint of an already running browser, e.g.
    /// `http://127.0.0.1:9222`. When set, nothing is launched locally.
    pub debug_url: Option<String>,
    pub headless: bool,
    pub no_sandbox: bool,
    pub request_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            debug_url: None,
            headless: true,
            no_sandbox: false,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub data_source: DataSource,
    pub site_profile_path: Option<PathBuf>,
    pub browser: BrowserSettings,
}
