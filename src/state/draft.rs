use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use smol::fs;
use std::path::Path;

use crate::services::ConnectionDefaults;

use super::AppState;

const DRAFT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct DraftFile {
    version: String,
    #[serde(flatten)]
    state: AppState,
}

/// Load the draft from its JSON file, or a fresh state if there is none
pub async fn load_draft(
    file_path: &Path,
    defaults: &ConnectionDefaults,
    now: NaiveDateTime,
) -> Result<AppState> {
    if !file_path.exists() {
        return Ok(AppState::new(defaults, now));
    }

    let content = fs::read_to_string(file_path)
        .await
        .context("Failed to read draft file")?;

    if content.trim().is_empty() {
        return Ok(AppState::new(defaults, now));
    }

    let draft: DraftFile =
        serde_json::from_str(&content).context("Failed to parse draft JSON")?;

    if draft.version != DRAFT_VERSION {
        tracing::warn!(version = %draft.version, "draft written by a different version");
    }

    let mut state = draft.state;
    state.form.fill_missing(now);
    Ok(state)
}

/// Save the draft to its JSON file
pub async fn save_draft(file_path: &Path, state: &AppState) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create monkeylog directory")?;
    }

    let draft = DraftFile {
        version: DRAFT_VERSION.to_string(),
        state: state.clone(),
    };

    let json_content =
        serde_json::to_string_pretty(&draft).context("Failed to serialize draft")?;

    fs::write(file_path, json_content)
        .await
        .context("Failed to write draft file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FormState;
    use crate::state::ConnectionForm;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn moment() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 24)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[async_std::test]
    async fn test_save_and_load_draft() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("draft.json");
        let defaults = ConnectionDefaults::default();

        let mut state = AppState::new(&defaults, moment());
        state.form.set("subject", "Hercules").unwrap();
        state.connection.user = "alice".to_string();
        state.connection.password = "hunter2".to_string();
        state.status = Some("Form cleared".to_string());

        save_draft(&file_path, &state).await.unwrap();
        assert!(file_path.exists());

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert!(!content.contains("hunter2"));

        let loaded = load_draft(&file_path, &defaults, moment()).await.unwrap();
        assert_eq!(loaded.form, state.form);
        assert_eq!(loaded.connection.user, "alice");
        assert_eq!(loaded.connection.password, "");
        assert_eq!(loaded.status.as_deref(), Some("Form cleared"));
    }

    #[async_std::test]
    async fn test_load_nonexistent_draft() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nonexistent.json");
        let defaults = ConnectionDefaults::default();

        let state = load_draft(&file_path, &defaults, moment()).await.unwrap();
        assert_eq!(state.form, FormState::cleared(moment()));
        assert_eq!(state.connection, ConnectionForm::from_defaults(&defaults));
        assert!(state.status.is_none());
    }

    #[async_std::test]
    async fn test_load_corrupt_draft_fails() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("draft.json");
        std::fs::write(&file_path, "{ not json").unwrap();

        let result = load_draft(&file_path, &ConnectionDefaults::default(), moment()).await;
        assert!(result.is_err());
    }
}
