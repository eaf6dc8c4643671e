use chrono::{DateTime, Utc};
use rental_deal_core::deal::FinancialInputs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed key identifying the last-inputs record.
pub const LAST_INPUTS_KEY: &str = "rental-deal:last-inputs";

/// Persisted snapshot of the most recently evaluated inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredInputs {
    pub key: String,
    pub saved_at: DateTime<Utc>,
    pub inputs: FinancialInputs,
}

/// File-backed cache of the last evaluated inputs.
///
/// Loading never fails: an absent, unreadable or foreign file is treated as
/// "no prior input".
#[derive(Debug, Clone)]
pub struct LastInputsStore {
    path: PathBuf,
}

impl LastInputsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<StoredInputs> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no saved inputs");
                return None;
            }
        };

        let stored: StoredInputs = match serde_json::from_str(&contents) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring corrupt saved inputs"
                );
                return None;
            }
        };

        if stored.key != LAST_INPUTS_KEY {
            tracing::warn!(
                path = %self.path.display(),
                key = %stored.key,
                "ignoring saved inputs with unexpected key"
            );
            return None;
        }

        Some(stored)
    }

    pub fn save(
        &self,
        inputs: &FinancialInputs,
    ) -> Result<StoredInputs, Box<dyn std::error::Error>> {
        let stored = StoredInputs {
            key: LAST_INPUTS_KEY.to_string(),
            saved_at: Utc::now(),
            inputs: inputs.clone(),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write '{}': {}", self.path.display(), e))?;

        tracing::debug!(path = %self.path.display(), "saved last inputs");
        Ok(stored)
    }
}
