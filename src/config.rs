use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Theme};

// ---------------------------------------------------------------------------
// TOML-deserializable config (intermediate representation)
// ---------------------------------------------------------------------------

/// Raw config as parsed from the TOML file.
/// All fields are optional so that missing keys fall through to defaults.
/// Unknown keys are silently ignored by serde.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    verbose: Option<bool>,
    theme: Option<String>,
    search: FileSearchConfig,
    prefs: FilePrefsConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileSearchConfig {
    ignore_case: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FilePrefsConfig {
    path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Effective (merged) config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub verbose: bool,
    pub theme: Theme,
    pub search: SearchConfig,
    pub prefs: PrefsConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub ignore_case: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefsConfig {
    /// Where saved searches live. `None` only when the platform has no
    /// data directory and the config file names none.
    pub path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            theme: Theme::Dark,
            search: SearchConfig::default(),
            prefs: PrefsConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { ignore_case: true }
    }
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self {
            path: default_prefs_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Returns the default config file path: `~/.config/artfind/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artfind").join("config.toml"))
}

/// Returns the default preferences path: `<data dir>/artfind/prefs.json`
pub fn default_prefs_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("artfind").join("prefs.json"))
}

/// Load the config file from the given path.
/// Returns the parsed `FileConfig`, or `None` if the file does not exist
/// or cannot be parsed.
fn load_file_config(path: &Path) -> Option<FileConfig> {
    if !path.exists() {
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<FileConfig>(&contents) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
                None
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config file");
            None
        }
    }
}

/// Parse a theme string from the config file into a `Theme` enum.
/// Returns `None` if the string is not recognized (caller uses default).
fn parse_theme(s: &str) -> Option<Theme> {
    match s.to_lowercase().as_str() {
        "dark" => Some(Theme::Dark),
        "light" => Some(Theme::Light),
        other => {
            tracing::warn!(theme = other, "unknown theme, using default");
            None
        }
    }
}

/// Build the effective `AppConfig` by merging defaults, config file, and CLI args.
///
/// Precedence (highest wins):
/// 1. CLI flags (if explicitly provided)
/// 2. Config file values
/// 3. Hardcoded defaults
pub fn build_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::default();

    let config_path = cli.config.clone().or_else(default_config_path);

    if let Some(ref path) = config_path {
        if let Some(file_cfg) = load_file_config(path) {
            if let Some(v) = file_cfg.verbose {
                config.verbose = v;
            }
            if let Some(ref t) = file_cfg.theme {
                if let Some(theme) = parse_theme(t) {
                    config.theme = theme;
                }
            }
            if let Some(ignore_case) = file_cfg.search.ignore_case {
                config.search.ignore_case = ignore_case;
            }
            if let Some(prefs_path) = file_cfg.prefs.path {
                config.prefs.path = Some(prefs_path);
            }
        } else if cli.config.is_some() && !path.exists() {
            // Malformed files were already reported by load_file_config.
            tracing::warn!(path = %path.display(), "config file not found");
        }
    }

    if cli.case_sensitive {
        config.search.ignore_case = false;
    }
    if cli.verbose {
        config.verbose = true;
    }
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }

    config
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
