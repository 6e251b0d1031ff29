//! Application state management.
//!
//! ## Structure
//!
//! - `connection` - The connection fields shown above the form
//! - `draft` - Persisting the state between invocations
//! - `actions` - Test connection, submit, clear, switch user

mod actions;
mod connection;
mod draft;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::services::{ConnectionDefaults, FormState};

pub use actions::{
    SubmitError, clear_form, restore_password, submit, switch_user, test_connection,
};
pub use connection::ConnectionForm;
pub use draft::{load_draft, save_draft};

/// Everything the form window shows: the session form, the connection
/// fields and the status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    pub form: FormState,
    pub connection: ConnectionForm,
    /// Outcome of the last operation
    #[serde(default)]
    pub status: Option<String>,
}

impl AppState {
    pub fn new(defaults: &ConnectionDefaults, now: NaiveDateTime) -> Self {
        Self {
            form: FormState::cleared(now),
            connection: ConnectionForm::from_defaults(defaults),
            status: None,
        }
    }
}
