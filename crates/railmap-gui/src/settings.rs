use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persisted UI preferences. Camera and filter state are session-only and
/// never written here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub language: Language,
    pub ui_scale: f32,
    pub show_legend: bool,
    pub open_filter_panel_on_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    #[serde(alias = "Light")]
    Latte,
    Frappe,
    Macchiato,
    #[default]
    #[serde(alias = "Dark")]
    Mocha,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 4] = [
        ThemeMode::Latte,
        ThemeMode::Frappe,
        ThemeMode::Macchiato,
        ThemeMode::Mocha,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Latte => "Latte",
            ThemeMode::Frappe => "Frappé",
            ThemeMode::Macchiato => "Macchiato",
            ThemeMode::Mocha => "Mocha",
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Mocha,
            language: Language::default(),
            ui_scale: 1.0,
            show_legend: true,
            open_filter_panel_on_start: false,
        }
    }
}

impl AppSettings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("railmap").join("settings.json"))
    }

    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        tracing::info!("Loading settings from {:?}", path);
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Settings loaded successfully: {:?}", settings);
                    settings
                }
                Err(e) => {
                    tracing::error!("Failed to parse settings: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read settings file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            return;
        };
        if let Err(e) = self.save_to(&path) {
            tracing::error!("Failed to save settings: {:#}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("railmap").join("settings.json");

        let settings = AppSettings {
            theme: ThemeMode::Latte,
            language: Language::En,
            ui_scale: 1.25,
            show_legend: false,
            open_filter_panel_on_start: true,
        };
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"theme": "Dark"}"#).unwrap();

        let settings = AppSettings::load_from(&path);
        assert_eq!(settings.theme, ThemeMode::Mocha);
        assert!(settings.show_legend);
        assert_eq!(settings.language, Language::De);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }
}
