// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// Define the directory where you want to store the data
const DATA_DIR: &str = "data";
const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Display theme. The original client defaulted to dark on every page.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// Client-local display preferences, persisted between runs. These are
/// simple key/value settings with defaults; there are no schema
/// evolution concerns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub notifications_enabled: bool,
    pub items_per_page: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            notifications_enabled: true,
            items_per_page: 10,
        }
    }
}

lazy_static! {
    // The global, lazily initialized, thread-safe preference store.
    static ref PREFERENCES: Arc<RwLock<Preferences>> = {
        let preferences = load_preferences_from(&preferences_path()).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load preferences file: {}. Using defaults. Error: {}",
                preferences_path().display(),
                e
            );
            Preferences::default()
        });
        Arc::new(RwLock::new(preferences))
    };
}

// Helper function to get the full path to the preferences.json file
fn preferences_path() -> PathBuf {
    let mut path = PathBuf::new();
    path.push(DATA_DIR);
    path.push(PREFERENCES_FILE_NAME);
    path
}

// Loads preferences from a JSON file at the given path.
fn load_preferences_from(path: &Path) -> Result<Preferences> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences file {}", path.display()))?;
    let preferences = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse preferences file {}", path.display()))?;
    Ok(preferences)
}

// Saves preferences to a JSON file at the given path.
fn save_preferences_to(path: &Path, preferences: &Preferences) -> Result<()> {
    // Ensure the directory exists before saving the file
    let parent_dir = path
        .parent()
        .context("Invalid path for preferences file")?;
    fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create data directory {}", parent_dir.display()))?;

    let data = serde_json::to_string_pretty(preferences)?;
    fs::write(path, data)
        .with_context(|| format!("Failed to write preferences file {}", path.display()))?;
    Ok(())
}

/// Current preferences (a copy; the store stays locked only briefly).
pub fn current() -> Preferences {
    PREFERENCES.read().clone()
}

/// Applies a change to the store and persists it. A failed save is
/// logged and the in-memory value still wins for this process.
pub fn update<F: FnOnce(&mut Preferences)>(apply: F) -> Preferences {
    let mut preferences = PREFERENCES.write();
    apply(&mut preferences);
    if let Err(e) = save_preferences_to(&preferences_path(), &preferences) {
        eprintln!("Error saving preferences: {e}");
    }
    preferences.clone()
}

/// Restores every preference to its default.
pub fn reset() -> Preferences {
    update(|preferences| *preferences = Preferences::default())
}

/// Items-per-page as stored: parsed leniently (non-numeric falls back to
/// the default) and clamped to a sane range.
pub fn clamp_items_per_page(raw: &str) -> u32 {
    let value: i64 = raw.trim().parse().unwrap_or(10);
    value.clamp(5, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_documented_values() {
        let preferences = Preferences::default();
        assert_eq!(preferences.theme, Theme::Dark);
        assert!(preferences.notifications_enabled);
        assert_eq!(preferences.items_per_page, 10);
    }

    #[test]
    fn items_per_page_is_clamped_and_lenient() {
        assert_eq!(clamp_items_per_page("25"), 25);
        assert_eq!(clamp_items_per_page("3"), 5);
        assert_eq!(clamp_items_per_page("500"), 100);
        assert_eq!(clamp_items_per_page("not-a-number"), 10);
        assert_eq!(clamp_items_per_page(""), 10);
    }

    #[test]
    fn preferences_round_trip_through_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DATA_DIR).join(PREFERENCES_FILE_NAME);

        let preferences = Preferences {
            theme: Theme::Light,
            notifications_enabled: false,
            items_per_page: 42,
        };
        save_preferences_to(&path, &preferences).unwrap();

        let loaded = load_preferences_from(&path).unwrap();
        assert_eq!(loaded, preferences);
    }

    #[test]
    fn missing_file_is_an_error_the_store_falls_back_from() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(load_preferences_from(&path).is_err());
    }

    #[test]
    fn theme_parses_only_known_values() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
