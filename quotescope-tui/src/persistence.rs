//! Form state persistence: JSON save/load across restarts.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use quotescope_core::{Frequency, InputSelection, Span};

use crate::app::AppState;

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub identifier: String,
    pub frequency: Frequency,
    pub span: Span,
}

impl PersistedState {
    pub fn selection(&self) -> InputSelection {
        InputSelection::new(self.identifier.as_str(), self.frequency, self.span)
    }
}

impl From<&InputSelection> for PersistedState {
    fn from(sel: &InputSelection) -> Self {
        Self {
            identifier: sel.identifier.clone(),
            frequency: sel.frequency,
            span: sel.span,
        }
    }
}

/// `<config_dir>/quotescope/state.json`.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotescope")
        .join("state.json")
}

/// Load persisted state from disk. `None` if the file is missing or corrupt.
pub fn load(path: &Path) -> Option<PersistedState> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState::from(&app.form.selection())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            identifier: "MSFT".into(),
            frequency: Frequency::Weekly,
            span: Span::FiveYears,
        };
        save(&path, &state).unwrap();
        assert_eq!(load(&path), Some(state));
    }

    #[test]
    fn missing_file_returns_none() {
        assert!(load(Path::new("/nonexistent/path/state.json")).is_none());
    }

    #[test]
    fn corrupt_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert!(load(&path).is_none());
    }

    #[test]
    fn span_is_stored_as_provider_code() {
        let state = PersistedState {
            identifier: "AAPL".into(),
            frequency: Frequency::Monthly,
            span: Span::TwelveMonths,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"span\":\"1y\""), "{json}");
        assert!(json.contains("\"frequency\":\"monthly\""), "{json}");
    }
}
