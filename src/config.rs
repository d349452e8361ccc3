use crate::error::{Error, Result};
use crate::palette;
use crate::scanner::{DEFAULT_EXCLUDES, DEFAULT_PATTERNS};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "vibe.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub prefix: String,
    pub allow_unprefixed: bool,
    pub patterns: Vec<String>,
    pub ignore: Vec<String>,
    pub exclude: Vec<String>,
    pub output: PathBuf,
    pub include_base: bool,
    pub base_css: Option<PathBuf>,
    pub minify: bool,
    pub debounce_ms: u64,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Theme {
    #[serde(default)]
    pub colors: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "vibe".to_string(),
            allow_unprefixed: false,
            patterns: to_strings(&DEFAULT_PATTERNS),
            ignore: Vec::new(),
            exclude: to_strings(&DEFAULT_EXCLUDES),
            output: PathBuf::from("vibe.css"),
            include_base: true,
            base_css: None,
            minify: false,
            debounce_ms: 150,
            theme: Theme::default(),
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|err| Error::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|err| Error::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    validate(&config).map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(config)
}

/// Loads the explicit config when given, otherwise `<directory>/vibe.toml`
/// if it exists, otherwise the defaults.
pub fn discover(directory: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load(path);
    }
    let candidate = directory.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        tracing::debug!(path = %candidate.display(), "loading project config");
        load(&candidate)
    } else {
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> std::result::Result<(), String> {
    if config.prefix.chars().any(|ch| ch.is_whitespace() || ch == ':') {
        return Err(format!("invalid prefix '{}'", config.prefix));
    }
    for (family, shades) in &config.theme.colors {
        for (shade, hex) in shades {
            if palette::parse_shade(shade).is_none() {
                return Err(format!("theme.colors.{}: unknown shade '{}'", family, shade));
            }
            if palette::hex_to_rgb(hex).is_none() {
                return Err(format!(
                    "theme.colors.{}.{}: '{}' is not a hex color",
                    family, shade, hex
                ));
            }
        }
    }
    Ok(())
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
