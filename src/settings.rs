//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/tetris/settings.toml (or platform equivalent)

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Visual settings
    pub visual: VisualSettings,
    /// High score storage
    pub high_scores: HighScoreSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Where high scores are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScoreSettings {
    /// Explicit file path; the platform data dir is used when unset
    pub file: Option<PathBuf>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            rotate: vec!["Space".to_string(), "Up".to_string()],
            hard_drop: vec!["Down".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            block_style: "solid".to_string(),
        }
    }
}

impl Settings {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "tetris", "tetris")
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), "invalid settings, using defaults: {e:#}");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings from TOML text
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("failed to parse settings")
    }

    /// Save settings to file
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::settings_path().context("could not determine config directory")?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create config dir {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(&path, contents)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;

        info!(path = %path.display(), "saved settings");
        Ok(())
    }

    /// Resolve where high scores are stored
    pub fn high_score_path(&self) -> PathBuf {
        if let Some(file) = &self.high_scores.file {
            return file.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("high_scores.json"))
            .unwrap_or_else(|| PathBuf::from("high_scores.json"))
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> &'static str {
        match self.block_style.as_str() {
            "bracket" => "[]",
            "round" => "()",
            _ => "██", // "solid" or default
        }
    }
}
