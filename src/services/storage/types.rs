//! Connection profile type definitions.
//!
//! This module contains:
//! - `ConnectionDefaults` - values used for users without a saved profile
//! - `ConnectionProfile` - saved per-username connection parameters
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_DATABASE: &str = "smiledb";

/// Fallback connection values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectionDefaults {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Username shown when no user has been chosen yet
    pub user: String,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            user: String::new(),
        }
    }
}

/// Saved connection parameters for one username
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionProfile {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub remember_password: bool,
    /// Empty unless `remember_password` was set when last saved
    pub password: String,
}

impl ConnectionProfile {
    pub fn from_defaults(defaults: &ConnectionDefaults) -> Self {
        Self {
            host: defaults.host.clone(),
            port: defaults.port,
            database: defaults.database.clone(),
            remember_password: false,
            password: String::new(),
        }
    }
}

impl Drop for ConnectionProfile {
    fn drop(&mut self) {
        // Zero out password memory when dropped
        let mut bytes = std::mem::take(&mut self.password).into_bytes();
        for byte in bytes.iter_mut() {
            unsafe { std::ptr::write_volatile(byte, 0) };
        }
    }
}
