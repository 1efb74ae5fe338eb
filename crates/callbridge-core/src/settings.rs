use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::meeting::DEFAULT_MEDIA_REGION;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    #[serde(default = "default_media_region")]
    pub media_region: String,
    /// Start/stop the OS communication mode around connect/disconnect.
    #[serde(default = "default_true")]
    pub manage_audio_session: bool,
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_media_region() -> String {
    DEFAULT_MEDIA_REGION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            media_region: default_media_region(),
            manage_audio_session: true,
            log_filter: None,
        }
    }
}

/// Settings persisted as `settings.json` in the host's data directory.
pub struct SettingsStore {
    settings: Mutex<Settings>,
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new(data_dir: &str) -> Self {
        let file_path = PathBuf::from(data_dir).join("settings.json");
        let settings = Self::load(&file_path);
        Self {
            settings: Mutex::new(settings),
            file_path,
        }
    }

    pub fn get(&self) -> Settings {
        self.settings.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_media_region(&self, region: String) {
        self.update(|s| s.media_region = region);
    }

    pub fn set_manage_audio_session(&self, enabled: bool) {
        self.update(|s| s.manage_audio_session = enabled);
    }

    pub fn set_log_filter(&self, filter: Option<String>) {
        self.update(|s| s.log_filter = filter);
    }

    fn update(&self, f: impl FnOnce(&mut Settings)) {
        let settings = {
            let mut guard = self.settings.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut guard);
            guard.clone()
        };
        self.save(&settings);
    }

    fn save(&self, settings: &Settings) {
        if let Some(parent) = self.file_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let written = serde_json::to_string_pretty(settings)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.file_path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            tracing::warn!("failed to save settings to {}: {e}", self.file_path.display());
        }
    }

    fn load(path: &Path) -> Settings {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable settings file {}: {e}", path.display());
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }
}
