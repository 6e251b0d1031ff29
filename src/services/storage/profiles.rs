//! Connection profiles keyed by username.
//!
//! Each profile lives in the settings group `connections/<username>`. The
//! password is only kept when the user asked for it to be remembered, and it
//! is base64-obfuscated rather than encrypted: the goal is to keep it from
//! being read at a glance, not to protect it.

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::settings::SettingsRepository;
use super::types::{ConnectionDefaults, ConnectionProfile};

const KEY_HOST: &str = "host";
const KEY_PORT: &str = "port";
const KEY_DATABASE: &str = "database";
const KEY_REMEMBER: &str = "remember_password";
const KEY_PASSWORD: &str = "password";

#[derive(Debug, Clone)]
pub struct ProfileStore {
    settings: SettingsRepository,
    defaults: ConnectionDefaults,
}

impl ProfileStore {
    pub(crate) fn new(settings: SettingsRepository, defaults: ConnectionDefaults) -> Self {
        Self { settings, defaults }
    }

    fn group(username: &str) -> String {
        format!("connections/{username}")
    }

    /// Load the saved profile for `username`, filling gaps from the defaults.
    pub async fn load(&self, username: &str) -> Result<ConnectionProfile> {
        let group = Self::group(username);
        let mut profile = ConnectionProfile::from_defaults(&self.defaults);

        if let Some(host) = self.settings.value(&group, KEY_HOST).await? {
            profile.host = host;
        }
        if let Some(port) = self.settings.value(&group, KEY_PORT).await? {
            match port.parse() {
                Ok(port) => profile.port = port,
                Err(_) => tracing::warn!(username, port = %port, "ignoring unparseable saved port"),
            }
        }
        if let Some(database) = self.settings.value(&group, KEY_DATABASE).await? {
            profile.database = database;
        }
        profile.remember_password = self
            .settings
            .value(&group, KEY_REMEMBER)
            .await?
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        if profile.remember_password {
            if let Some(encoded) = self.settings.value(&group, KEY_PASSWORD).await? {
                profile.password = decode_password(&encoded).unwrap_or_else(|| {
                    tracing::warn!(username, "saved password could not be decoded");
                    String::new()
                });
            }
        }

        tracing::debug!(username, host = %profile.host, "loaded connection profile");
        Ok(profile)
    }

    /// Persist `profile` for `username` in one transaction. A profile that
    /// does not remember its password removes any stored one. An empty
    /// username saves nothing.
    pub async fn save(&self, username: &str, profile: &ConnectionProfile) -> Result<()> {
        if username.is_empty() {
            return Ok(());
        }
        let group = Self::group(username);

        let mut batch = self.settings.batch().await?;
        batch.set_value(&group, KEY_HOST, &profile.host).await?;
        batch
            .set_value(&group, KEY_PORT, &profile.port.to_string())
            .await?;
        batch.set_value(&group, KEY_DATABASE, &profile.database).await?;
        batch
            .set_value(&group, KEY_REMEMBER, bool_str(profile.remember_password))
            .await?;

        if profile.remember_password {
            batch
                .set_value(&group, KEY_PASSWORD, &encode_password(&profile.password))
                .await?;
        } else {
            batch.remove(&group, KEY_PASSWORD).await?;
        }
        batch.commit().await?;

        tracing::info!(username, "saved connection profile");
        Ok(())
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}

fn encode_password(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

fn decode_password(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    String::from_utf8(bytes).ok()
}
