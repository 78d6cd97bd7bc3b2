//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `AUTHGATE_*` environment variables, and
//! configuration files, in OrthoConfig's usual precedence. The token signing
//! secret is kept out of this struct and read separately by
//! [`signing_key_from_env`].

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

mod signing_key;

pub use signing_key::{BuildMode, SigningKey, SigningKeyError, signing_key_from_env};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Session lifetime when none is configured: six hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 6 * 60 * 60;
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Invalid values in [`AuthSettings`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}'")]
    BindAddr { value: String },
    #[error("token_ttl_secs must be between 1 and {max}, got {value}")]
    TokenTtl { value: u64, max: i64 },
    #[error("bcrypt_cost must be between 4 and 31, got {value}")]
    BcryptCost { value: u32 },
}

/// Runtime settings for the authentication service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AUTHGATE")]
pub struct AuthSettings {
    /// Socket address for the HTTP listener.
    pub bind_addr: Option<String>,
    /// Lifetime of issued session tokens, in seconds.
    #[ortho_config(default = 21600)]
    pub token_ttl_secs: u64,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// PostgreSQL connection string. Without one, users live in memory.
    pub database_url: Option<String>,
}

impl AuthSettings {
    /// Listener address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Token lifetime; [`DEFAULT_TOKEN_TTL_SECS`] unless configured.
    pub fn token_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let secs = self.token_ttl_secs;
        let max = TimeDelta::MAX.num_seconds();
        i64::try_from(secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(TimeDelta::try_seconds)
            .ok_or(SettingsError::TokenTtl { value: secs, max })
    }

    /// bcrypt cost, defaulting to 10.
    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self
            .bcrypt_cost
            .unwrap_or(crate::outbound::DEFAULT_BCRYPT_COST);
        if BCRYPT_COST_RANGE.contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::BcryptCost { value: cost })
        }
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
