//! Configuration management for the reservation screen.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Screen flags use the variable `SHELTER_<FLAG>` with the flag name in
//! upper case, e.g. `SHELTER_DONATIONONMOVERESERVE=No`.

use shelter_core::environment::MapConfig;
use std::env;
use std::time::Duration;

/// Screen flags and their defaults.
pub const SCREEN_FLAGS: [(&str, &str); 6] = [
    ("DontShowAdoptionFee", "No"),
    ("WarnBannedOwner", "Yes"),
    ("WarnNoHomeCheck", "No"),
    ("MovementNumberOverride", "No"),
    ("DonationOnMoveReserve", "Yes"),
    ("AFDefaultReservationStatus", "1"),
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout: u64,
    /// Currency symbol for fee display
    pub currency_symbol: String,
    /// `strftime` pattern of the reservation date
    pub date_format: String,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Screen configuration flags
    pub flags: MapConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns the value of a
    /// variable if it is set.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flags = SCREEN_FLAGS
            .iter()
            .map(|&(flag, default)| {
                let value = lookup(&format!("SHELTER_{}", flag.to_ascii_uppercase()))
                    .unwrap_or_else(|| default.to_string());
                (flag.to_string(), value)
            })
            .collect();

        Self {
            base_url: lookup("SHELTER_BASE_URL").unwrap_or_else(|| "http://localhost:5000".to_string()),
            request_timeout: lookup("SHELTER_REQUEST_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            currency_symbol: lookup("SHELTER_CURRENCY_SYMBOL").unwrap_or_else(|| "$".to_string()),
            date_format: lookup("SHELTER_DATE_FORMAT").unwrap_or_else(|| "%m/%d/%Y".to_string()),
            log_level: lookup("SHELTER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            flags,
        }
    }

    /// Request timeout as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}
