use std::path::PathBuf;

use crate::currency::FxTable;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub feed_path: PathBuf,
    pub feed_base_url: String,
    pub http_timeout_secs: u64,
    pub roster_size: usize,
    pub fx: FxTable,
    pub profile_url: String,
    pub qr_endpoint: String,
}

/// Loads `.env` if present, then reads configuration from the process
/// environment.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key))
}

/// Builds the configuration from an env-var lookup so tests can pass a map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_rate = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let rate = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("rate must be a non-negative number, got {rate}"),
            });
        }
        Ok(rate)
    };

    let fx = FxTable::new(
        parse_rate("SKILLSYNC_FX_USD", "83")?,
        parse_rate("SKILLSYNC_FX_EUR", "90")?,
        parse_rate("SKILLSYNC_FX_GBP", "105")?,
    );

    Ok(AppConfig {
        log_level: or_default("SKILLSYNC_LOG_LEVEL", "info"),
        feed_path: PathBuf::from(or_default(
            "SKILLSYNC_FEED_PATH",
            "./data/ict_internships_jobs_2025.json",
        )),
        feed_base_url: or_default("SKILLSYNC_FEED_BASE_URL", "http://localhost:3000"),
        http_timeout_secs: parse_u64("SKILLSYNC_HTTP_TIMEOUT_SECS", "30")?,
        roster_size: parse_usize("SKILLSYNC_ROSTER_SIZE", "100")?,
        fx,
        profile_url: or_default(
            "SKILLSYNC_PROFILE_URL",
            "http://localhost:3000/student/arpankumarde",
        ),
        qr_endpoint: or_default(
            "SKILLSYNC_QR_ENDPOINT",
            "https://api.qrserver.com/v1/create-qr-code/",
        ),
    })
}
