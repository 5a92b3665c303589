//! User settings and config/data directory lookup.

use directories::ProjectDirs;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use splitbill_core::storage::{DEFAULT_STORAGE_KEY, validate_key};
use splitbill_core::{DEFAULT_UNITS, RemainderPolicy, ShareInputMode};
use std::path::{Path, PathBuf};

/// Config files larger than this are refused.
pub(crate) const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_UNITS: usize = 64;

pub const SETTINGS_FILE: &str = "settings.toml";
pub const KEYMAPS_FILE: &str = "keymaps.toml";
pub const LOG_FILE: &str = "splitbill.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "splitbill")
}

/// `<config dir>/<name>`, if the platform has a config dir.
pub fn config_file(name: &str) -> Option<PathBuf> {
    let proj = project_dirs()?;
    Some(proj.config_dir().join(name))
}

/// Where the saved bill and the log live by default.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|proj| proj.data_dir().to_path_buf())
}

/// Read and parse a TOML file, collecting problems as warnings.
///
/// Returns `None` when the file is absent, too large, unreadable or invalid.
/// A missing file is only reported when `explicit` is set.
pub(crate) fn read_toml_file<T: DeserializeOwned>(
    path: &Path,
    explicit: bool,
    warnings: &mut Vec<String>,
) -> Option<T> {
    if !path.exists() {
        if explicit {
            warnings.push(format!("File not found: {}", path.display()));
        }
        return None;
    }
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<T>(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    currency: Option<String>,
    remainder: Option<String>,
    share_input: Option<String>,
    units: Option<Vec<String>>,
    storage_key: Option<String>,
}

/// Effective settings after applying `settings.toml` over the defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Symbol printed before amounts.
    pub currency: String,
    pub remainder: RemainderPolicy,
    /// Share input mode at start.
    pub share_input: ShareInputMode,
    /// Choices offered for the Unit column.
    pub units: Vec<String>,
    /// Store key holding the saved bill.
    pub storage_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency: "$".to_string(),
            remainder: RemainderPolicy::default(),
            share_input: ShareInputMode::default(),
            units: DEFAULT_UNITS.iter().map(|u| u.to_string()).collect(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Load settings from `path`, or from the user config dir when `path` is
/// `None`. Bad values fall back to their defaults with a warning.
pub fn load_settings(path: Option<&Path>) -> (Settings, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut settings = Settings::default();

    let resolved = path
        .map(Path::to_path_buf)
        .or_else(|| config_file(SETTINGS_FILE));
    let Some(resolved) = resolved else {
        return (settings, warnings);
    };
    let Some(file) = read_toml_file::<SettingsFile>(&resolved, path.is_some(), &mut warnings)
    else {
        return (settings, warnings);
    };

    if let Some(currency) = file.currency {
        settings.currency = currency;
    }

    if let Some(raw) = file.remainder {
        match parse_remainder(&raw) {
            Some(policy) => settings.remainder = policy,
            None => warnings.push(format!(
                "Unknown remainder policy '{}' (expected 'unclamped' or 'clamp-at-zero')",
                raw
            )),
        }
    }

    if let Some(raw) = file.share_input {
        match raw.parse::<ShareInputMode>() {
            Ok(mode) => settings.share_input = mode,
            Err(err) => warnings.push(err),
        }
    }

    if let Some(units) = file.units {
        let units: Vec<String> = units
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
        if units.is_empty() {
            warnings.push("Empty unit list in settings; using defaults".to_string());
        } else if units.len() > MAX_UNITS {
            warnings.push(format!(
                "Too many units: {} (max {}); using defaults",
                units.len(),
                MAX_UNITS
            ));
        } else {
            settings.units = units;
        }
    }

    if let Some(key) = file.storage_key {
        let key = key.trim();
        if key.is_empty() {
            warnings.push("Empty storage_key in settings; using default".to_string());
        } else if let Err(err) = validate_key(key) {
            warnings.push(format!("{}; using default", err));
        } else {
            settings.storage_key = key.to_string();
        }
    }

    (settings, warnings)
}

fn parse_remainder(raw: &str) -> Option<RemainderPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "unclamped" => Some(RemainderPolicy::Unclamped),
        "clamp-at-zero" | "clamp_at_zero" | "clamp" => Some(RemainderPolicy::ClampAtZero),
        _ => None,
    }
}
