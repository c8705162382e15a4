//! Validator configuration: strictness level, propagation mode and the
//! parser's resource limits.
//!
//! Every field has a default so a partial TOML file is enough:
//!
//! ```toml
//! level = 3
//! mode = "fail-fast"
//!
//! [parse]
//! full_threshold_lines = 8000
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cumulative validation strictness, 0 (syntax only) to 4 (extended schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ValidationLevel {
    Syntax = 0,
    Structure = 1,
    Content = 2,
    Quality = 3,
    Extended = 4,
}

impl ValidationLevel {
    pub fn name(self) -> &'static str {
        match self {
            ValidationLevel::Syntax => "syntax",
            ValidationLevel::Structure => "structure",
            ValidationLevel::Content => "content",
            ValidationLevel::Quality => "quality",
            ValidationLevel::Extended => "extended",
        }
    }
}

impl TryFrom<u8> for ValidationLevel {
    type Error = ConfigError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(ValidationLevel::Syntax),
            1 => Ok(ValidationLevel::Structure),
            2 => Ok(ValidationLevel::Content),
            3 => Ok(ValidationLevel::Quality),
            4 => Ok(ValidationLevel::Extended),
            other => Err(ConfigError::InvalidLevel(other)),
        }
    }
}

impl From<ValidationLevel> for u8 {
    fn from(level: ValidationLevel) -> u8 {
        level as u8
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} ({})", *self as u8, self.name())
    }
}

/// How violations propagate once found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Stop recording at the first error.
    FailFast,
    /// Run every check and report everything.
    CollectAll,
    /// Run every check; only unconditional violations stay errors.
    WarnOnly,
}

impl ValidationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationMode::FailFast => "fail-fast",
            ValidationMode::CollectAll => "collect-all",
            ValidationMode::WarnOnly => "warn-only",
        }
    }
}

impl FromStr for ValidationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fail-fast" => Ok(ValidationMode::FailFast),
            "collect-all" => Ok(ValidationMode::CollectAll),
            "warn-only" => Ok(ValidationMode::WarnOnly),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits and thresholds used while parsing and classifying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Documents with more lines than this are classified as Full.
    pub full_threshold_lines: usize,
    /// Lines longer than this (in chars) are flagged and not classified.
    pub max_line_chars: usize,
    /// Inputs larger than this (in bytes) are flagged.
    pub max_file_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            full_threshold_lines: 5_000,
            max_line_chars: 10_000,
            max_file_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub level: ValidationLevel,
    pub mode: ValidationMode,
    pub parse: ParseOptions,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            level: ValidationLevel::Content,
            mode: ValidationMode::CollectAll,
            parse: ParseOptions::default(),
        }
    }
}

impl ValidatorConfig {
    pub fn new(level: ValidationLevel, mode: ValidationMode) -> Self {
        ValidatorConfig {
            level,
            mode,
            parse: ParseOptions::default(),
        }
    }

    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }
}
