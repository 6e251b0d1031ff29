//! Actions behind the form's buttons.
//!
//! Each action updates the status line. Failed actions leave the form as it
//! was; only a confirmed insert clears it.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::services::{ProfileStore, SessionWriter, ValidationError, normalize};

use super::AppState;

pub const STATUS_CONNECTED: &str = "Connection successful";
pub const STATUS_CONNECTION_FAILED: &str = "Connection failed";
pub const STATUS_VALIDATION_ERROR: &str = "Validation error";
pub const STATUS_DATABASE_ERROR: &str = "Database error";
pub const STATUS_CLEARED: &str = "Form cleared";

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The server could not be reached or refused the login
    #[error("{0}")]
    Connection(#[source] sqlx::Error),
}

impl SubmitError {
    /// Title of the notification shown for this error
    pub fn title(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "Validation Error",
            SubmitError::Database(_) => "Database Error",
            SubmitError::Connection(_) => "Connection Failed",
        }
    }
}

/// Switch to another username, reloading that user's saved profile over the
/// shown connection fields. An empty username only updates the field.
pub async fn switch_user(state: &mut AppState, profiles: &ProfileStore, username: &str) -> Result<()> {
    let username = username.trim();
    state.connection.user = username.to_string();
    if username.is_empty() {
        return Ok(());
    }

    let profile = profiles.load(username).await?;
    state.connection.apply_profile(&profile);
    tracing::info!(username, "switched user");
    Ok(())
}

/// Fill in the remembered password for the current user, leaving the other
/// connection fields as they are
pub async fn restore_password(state: &mut AppState, profiles: &ProfileStore) -> Result<()> {
    let username = state.connection.user.trim().to_string();
    if username.is_empty() || !state.connection.password.is_empty() {
        return Ok(());
    }

    let profile = profiles.load(&username).await?;
    if profile.remember_password {
        state.connection.password = profile.password.clone();
    }
    Ok(())
}

/// Open and close one connection with the shown parameters. On success the
/// current user's profile is saved.
pub async fn test_connection<W: SessionWriter>(
    state: &mut AppState,
    writer: &W,
    profiles: &ProfileStore,
) -> Result<(), SubmitError> {
    let config = state.connection.to_config();

    match writer.test_connection(&config).await {
        Ok(()) => {
            save_profile(state, profiles).await;
            state.status = Some(STATUS_CONNECTED.to_string());
            Ok(())
        }
        Err(e) => {
            tracing::error!(server = %config.describe(), "connection test failed: {}", e);
            state.status = Some(STATUS_CONNECTION_FAILED.to_string());
            Err(SubmitError::Connection(e))
        }
    }
}

/// Validate the form and insert it as one row. On success the profile is
/// saved and the form cleared.
pub async fn submit<W: SessionWriter>(
    state: &mut AppState,
    writer: &W,
    profiles: &ProfileStore,
    now: NaiveDateTime,
) -> Result<u64, SubmitError> {
    let record = match normalize(&state.form) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("submission rejected: {}", e);
            state.status = Some(STATUS_VALIDATION_ERROR.to_string());
            return Err(e.into());
        }
    };

    let config = state.connection.to_config();
    let rows_affected = match writer.insert_record(&config, &record).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(server = %config.describe(), "insert failed: {}", e);
            state.status = Some(STATUS_DATABASE_ERROR.to_string());
            return Err(e.into());
        }
    };

    save_profile(state, profiles).await;
    state.status = Some(format!(
        "Entry inserted successfully - {}",
        now.format("%H:%M:%S")
    ));
    state.form.clear(now);
    Ok(rows_affected)
}

/// Reset the form to its empty state
pub fn clear_form(state: &mut AppState, now: NaiveDateTime) {
    state.form.clear(now);
    state.status = Some(STATUS_CLEARED.to_string());
}

/// Persist the connection fields for the current user. The database action
/// already succeeded, so a failure here is logged rather than reported.
async fn save_profile(state: &AppState, profiles: &ProfileStore) {
    let username = state.connection.user.trim();
    if let Err(e) = profiles.save(username, &state.connection.to_profile()).await {
        tracing::warn!(username, "Failed to save connection settings: {:#}", e);
    }
}
