use crate::app_config::{AppConfig, BrowserSettings, DataSource, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `FOO=` in a .env file behaves like a
    // commented-out line.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
        }
    };

    let env = parse_environment(&or_default("MENUCRAWL_ENV", "development"))?;

    let bind_addr = or_default("MENUCRAWL_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("MENUCRAWL_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("MENUCRAWL_LOG_LEVEL", "info");

    let data_source = or_default("MENUCRAWL_DATA_SOURCE", "live")
        .parse::<DataSource>()
        .map_err(|reason| invalid("MENUCRAWL_DATA_SOURCE", reason))?;

    let site_profile_path = optional("MENUCRAWL_SITE_PROFILE_PATH").map(PathBuf::from);

    let request_timeout_secs = parse_u64("MENUCRAWL_BROWSER_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "MENUCRAWL_BROWSER_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let debug_url = optional("MENUCRAWL_BROWSER_DEBUG_URL");
    if let Some(url) = &debug_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(
                "MENUCRAWL_BROWSER_DEBUG_URL",
                format!("'{url}' must be an http(s) DevTools endpoint"),
            ));
        }
    }

    let browser = BrowserSettings {
        executable: optional("MENUCRAWL_BROWSER_EXECUTABLE").map(PathBuf::from),
        debug_url,
        headless: parse_bool("MENUCRAWL_BROWSER_HEADLESS", "true")?,
        no_sandbox: parse_bool("MENUCRAWL_BROWSER_NO_SANDBOX", "false")?,
        request_timeout_secs,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_source,
        site_profile_path,
        browser,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MENUCRAWL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
