use crate::error::{Result, TemplateError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_MAX_LENGTH: usize = 100;
pub const DEFAULT_MIN_LENGTH: usize = 1;
pub const DEFAULT_ALLOWED_CHARS: &str = r"[a-zA-Z0-9_-]";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ENTIRIUS_CONFIG";

/// Immutable validation parameters.
///
/// `allowed_chars` is a character-class pattern such as `[a-z]`. A value is
/// accepted when every character matches the class and its length lies in
/// `min_length..=max_length`.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    max_length: usize,
    min_length: usize,
    allowed_chars: String,
    strip_whitespace: bool,
    matcher: Regex,
}

/// Part of the configuration echoed back in process results.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSummary {
    pub max_length: usize,
    pub min_length: usize,
}

fn compile_class(class: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{class})+$")).map_err(|e| {
        TemplateError::config(format!("invalid allowed_chars pattern {class}: {e}"))
    })
}

/// Unicode whitespace plus the ASCII separators `\x1c`..=`\x1f`.
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

fn default_matcher() -> Regex {
    static MATCHER: OnceLock<Regex> = OnceLock::new();
    MATCHER
        .get_or_init(|| {
            // Constant pattern; covered by tests.
            compile_class(DEFAULT_ALLOWED_CHARS).expect("default allowed_chars compiles")
        })
        .clone()
}

impl TemplateConfig {
    pub fn new(
        max_length: usize,
        min_length: usize,
        allowed_chars: impl Into<String>,
        strip_whitespace: bool,
    ) -> Result<Self> {
        if max_length < min_length {
            return Err(TemplateError::config(
                "max_length must be greater than or equal to min_length",
            ));
        }
        let allowed_chars = allowed_chars.into();
        let matcher = if allowed_chars == DEFAULT_ALLOWED_CHARS {
            default_matcher()
        } else {
            compile_class(&allowed_chars)?
        };
        tracing::debug!(
            max_length,
            min_length,
            allowed_chars = %allowed_chars,
            strip_whitespace,
            "template config built"
        );
        Ok(Self {
            max_length,
            min_length,
            allowed_chars,
            strip_whitespace,
            matcher,
        })
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Starts a builder seeded with this configuration's values.
    pub fn to_builder(&self) -> ConfigBuilder {
        ConfigBuilder {
            max_length: self.max_length,
            min_length: self.min_length,
            allowed_chars: self.allowed_chars.clone(),
            strip_whitespace: self.strip_whitespace,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn allowed_chars(&self) -> &str {
        &self.allowed_chars
    }

    pub fn strip_whitespace(&self) -> bool {
        self.strip_whitespace
    }

    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            max_length: self.max_length,
            min_length: self.min_length,
        }
    }

    /// Applies whitespace stripping if enabled.
    pub fn prepare<'a>(&self, value: &'a str) -> &'a str {
        if self.strip_whitespace {
            value.trim_matches(is_strippable)
        } else {
            value
        }
    }

    /// Returns `true` if `value` (after optional stripping) satisfies the
    /// length bounds and the character class.
    pub fn accepts(&self, value: &str) -> bool {
        let value = self.prepare(value);
        let length = value.chars().count();
        if length < self.min_length || length > self.max_length {
            tracing::trace!(
                length,
                min = self.min_length,
                max = self.max_length,
                "rejected: length out of bounds"
            );
            return false;
        }
        if !self.matcher.is_match(value) {
            tracing::trace!(
                allowed_chars = %self.allowed_chars,
                "rejected: characters outside allowed class"
            );
            return false;
        }
        true
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            min_length: DEFAULT_MIN_LENGTH,
            allowed_chars: DEFAULT_ALLOWED_CHARS.to_string(),
            strip_whitespace: true,
            matcher: default_matcher(),
        }
    }
}

impl PartialEq for TemplateConfig {
    fn eq(&self, other: &Self) -> bool {
        self.max_length == other.max_length
            && self.min_length == other.min_length
            && self.allowed_chars == other.allowed_chars
            && self.strip_whitespace == other.strip_whitespace
    }
}

impl Eq for TemplateConfig {}

/// Collects configuration values; [`ConfigBuilder::build`] runs the checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBuilder {
    max_length: usize,
    min_length: usize,
    allowed_chars: String,
    strip_whitespace: bool,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            min_length: DEFAULT_MIN_LENGTH,
            allowed_chars: DEFAULT_ALLOWED_CHARS.to_string(),
            strip_whitespace: true,
        }
    }
}

impl ConfigBuilder {
    pub fn max_length(mut self, value: usize) -> Self {
        self.max_length = value;
        self
    }

    pub fn min_length(mut self, value: usize) -> Self {
        self.min_length = value;
        self
    }

    pub fn allowed_chars(mut self, value: impl Into<String>) -> Self {
        self.allowed_chars = value.into();
        self
    }

    pub fn strip_whitespace(mut self, value: bool) -> Self {
        self.strip_whitespace = value;
        self
    }

    pub fn build(self) -> Result<TemplateConfig> {
        TemplateConfig::new(
            self.max_length,
            self.min_length,
            self.allowed_chars,
            self.strip_whitespace,
        )
    }
}

/// On-disk form; every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub allowed_chars: Option<String>,
    pub strip_whitespace: Option<bool>,
}

impl ConfigFile {
    pub fn into_config(self) -> Result<TemplateConfig> {
        let mut builder = TemplateConfig::builder();
        if let Some(v) = self.max_length {
            builder = builder.max_length(v);
        }
        if let Some(v) = self.min_length {
            builder = builder.min_length(v);
        }
        if let Some(v) = self.allowed_chars {
            builder = builder.allowed_chars(v);
        }
        if let Some(v) = self.strip_whitespace {
            builder = builder.strip_whitespace(v);
        }
        builder.build()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse TOML {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
}

pub fn default_config_path() -> PathBuf {
    // ~/.config/entirius/config.toml
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home)
            .join(".config")
            .join("entirius")
            .join("config.toml")
    } else {
        PathBuf::from(".config/entirius/config.toml")
    }
}

/// `ENTIRIUS_CONFIG` if set, otherwise the default path.
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

pub fn load_config() -> Result<(TemplateConfig, PathBuf), LoadError> {
    let path = config_path();
    let cfg = load_config_from(&path)?;
    Ok((cfg, path))
}

pub fn load_config_from(path: &Path) -> Result<TemplateConfig, LoadError> {
    let data = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&data).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = file.into_config().map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded template config");
    Ok(cfg)
}
