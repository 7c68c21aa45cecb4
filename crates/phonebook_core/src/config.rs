//! Session configuration.
//!
//! # Responsibility
//! - Describe tunable session settings with defaults for every field.
//! - Load overrides from an optional TOML file.
//! - Normalize user-supplied phonebook file names.
//!
//! # Invariants
//! - A missing config path yields defaults, never an error.
//! - A loaded config is validated before it is returned.

use crate::logging::default_log_level;
use crate::repo::entry_repo::{MalformedLinePolicy, TextFileEntryRepository, DEFAULT_DELIMITER};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_NAME: &str = "phonebook.txt";
pub const DEFAULT_PAGE_SIZE: usize = 5;
const FILE_EXTENSION: &str = ".txt";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Tunable settings for one phonebook session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhonebookConfig {
    /// File name offered at the startup prompt.
    pub file_name: String,
    /// Single-character field delimiter in the persisted file.
    pub delimiter: char,
    /// Default page size for paginated listing.
    pub page_size: usize,
    /// Inputs accepted as "yes" at confirmation prompts, case-insensitive.
    pub affirmative_tokens: Vec<String>,
    pub malformed_lines: MalformedLinePolicy,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for PhonebookConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            delimiter: DEFAULT_DELIMITER,
            page_size: DEFAULT_PAGE_SIZE,
            affirmative_tokens: vec!["y".to_string(), "д".to_string()],
            malformed_lines: MalformedLinePolicy::Fail,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PhonebookConfig {
    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.delimiter, '\n' | '\r') {
            return Err(ConfigError::Invalid(
                "delimiter must not be a line break".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self
            .affirmative_tokens
            .iter()
            .all(|token| token.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "affirmative_tokens must contain at least one non-empty token".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns whether `input` is one of the accepted affirmative tokens.
    pub fn is_affirmative(&self, input: &str) -> bool {
        let input = input.trim().to_lowercase();
        !input.is_empty()
            && self
                .affirmative_tokens
                .iter()
                .any(|token| token.trim().to_lowercase() == input)
    }

    /// Builds a text-file repository over `path` with this config's format settings.
    pub fn repository(&self, path: impl Into<PathBuf>) -> TextFileEntryRepository {
        TextFileEntryRepository::new(path)
            .with_delimiter(self.delimiter)
            .with_malformed_line_policy(self.malformed_lines)
    }
}

/// Loads config from `path`, or returns defaults when `path` is `None`.
///
/// # Errors
/// - Returns `Read` when the file cannot be read.
/// - Returns `Parse` when the file is not valid TOML for [`PhonebookConfig`].
/// - Returns `Invalid` when [`PhonebookConfig::validate`] fails.
pub fn load_config(path: Option<&Path>) -> Result<PhonebookConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(PhonebookConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PhonebookConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Normalizes a user-supplied file name.
///
/// Blank input selects `default`; a name without `.txt` gets it appended.
pub fn normalize_file_name(raw: &str, default: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }
    if trimmed.ends_with(FILE_EXTENSION) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{FILE_EXTENSION}")
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_file_name, PhonebookConfig, DEFAULT_FILE_NAME};
    use crate::repo::entry_repo::MalformedLinePolicy;

    #[test]
    fn normalize_file_name_appends_extension() {
        assert_eq!(normalize_file_name("contacts", DEFAULT_FILE_NAME), "contacts.txt");
        assert_eq!(normalize_file_name(" work.txt ", DEFAULT_FILE_NAME), "work.txt");
        assert_eq!(normalize_file_name("  ", DEFAULT_FILE_NAME), "phonebook.txt");
    }

    #[test]
    fn affirmative_tokens_ignore_case_and_whitespace() {
        let config = PhonebookConfig::default();
        assert!(config.is_affirmative("Y"));
        assert!(config.is_affirmative(" y "));
        assert!(config.is_affirmative("Д"));
        assert!(!config.is_affirmative(""));
        assert!(!config.is_affirmative("n"));
        assert!(!config.is_affirmative("yes"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config: PhonebookConfig = toml::from_str(
            r#"
            delimiter = ";"
            malformed_lines = "skip_and_warn"
            affirmative_tokens = ["yes", "y"]
            "#,
        )
        .unwrap();
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.malformed_lines, MalformedLinePolicy::SkipAndWarn);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.file_name, DEFAULT_FILE_NAME);
        assert!(config.is_affirmative("YES"));
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        let mut config = PhonebookConfig {
            page_size: 0,
            ..PhonebookConfig::default()
        };
        assert!(config.validate().is_err());

        config.page_size = 3;
        config.delimiter = '\n';
        assert!(config.validate().is_err());

        config.delimiter = '|';
        config.affirmative_tokens = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }
}
