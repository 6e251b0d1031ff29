use serde::{Deserialize, Serialize};

use crate::services::{ConnectionConfig, ConnectionDefaults, ConnectionProfile};

/// The connection fields currently shown above the form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionForm {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub remember_password: bool,
    /// Never written to the draft file
    #[serde(skip)]
    pub password: String,
}

impl ConnectionForm {
    pub fn from_defaults(defaults: &ConnectionDefaults) -> Self {
        Self {
            host: defaults.host.clone(),
            port: defaults.port,
            database: defaults.database.clone(),
            user: defaults.user.clone(),
            remember_password: false,
            password: String::new(),
        }
    }

    /// Overwrite the shown fields with a loaded profile
    pub fn apply_profile(&mut self, profile: &ConnectionProfile) {
        self.host = profile.host.clone();
        self.port = profile.port;
        self.database = profile.database.clone();
        self.remember_password = profile.remember_password;
        if profile.remember_password && !profile.password.is_empty() {
            self.password = profile.password.clone();
        } else {
            self.password.clear();
        }
    }

    /// The profile to persist for the current user
    pub fn to_profile(&self) -> ConnectionProfile {
        ConnectionProfile {
            host: self.host.trim().to_string(),
            port: self.port,
            database: self.database.trim().to_string(),
            remember_password: self.remember_password,
            password: self.password.clone(),
        }
    }

    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.host.trim().to_string(),
            port: self.port,
            database: self.database.trim().to_string(),
            user: self.user.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Password shown as bullets, or "(none)"
    pub fn masked_password(&self) -> String {
        if self.password.is_empty() {
            "(none)".to_string()
        } else {
            "•".repeat(self.password.chars().count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(remember: bool, password: &str) -> ConnectionProfile {
        ConnectionProfile {
            host: "db2".to_string(),
            port: 3310,
            database: "lab".to_string(),
            remember_password: remember,
            password: password.to_string(),
        }
    }

    #[test]
    fn applying_a_profile_overwrites_shown_fields() {
        let mut form = ConnectionForm::from_defaults(&ConnectionDefaults::default());
        form.user = "alice".to_string();
        form.password = "typed".to_string();

        form.apply_profile(&profile(true, "saved"));

        assert_eq!(form.host, "db2");
        assert_eq!(form.port, 3310);
        assert_eq!(form.database, "lab");
        assert!(form.remember_password);
        assert_eq!(form.password, "saved");
        assert_eq!(form.user, "alice");
    }

    #[test]
    fn applying_a_forgetful_profile_clears_password() {
        let mut form = ConnectionForm::from_defaults(&ConnectionDefaults::default());
        form.password = "typed".to_string();

        form.apply_profile(&profile(false, ""));

        assert!(!form.remember_password);
        assert_eq!(form.password, "");
    }

    #[test]
    fn config_and_profile_trim_text_fields() {
        let mut form = ConnectionForm::from_defaults(&ConnectionDefaults::default());
        form.host = " db ".to_string();
        form.user = " bob ".to_string();
        form.password = " keep spaces ".to_string();

        let config = form.to_config();
        assert_eq!(config.host, "db");
        assert_eq!(config.user, "bob");
        assert_eq!(config.password, " keep spaces ");
        assert_eq!(form.to_profile().host, "db");
    }

    #[test]
    fn password_never_serialized() {
        let mut form = ConnectionForm::from_defaults(&ConnectionDefaults::default());
        form.password = "hunter2".to_string();
        let json = serde_json::to_string(&form).unwrap();
        assert!(!json.contains("hunter2"));
    }
}
