//! Entry repository contracts and text-file implementation.
//!
//! # Responsibility
//! - Load the full entry sequence from a delimited text file.
//! - Rewrite the full entry sequence on save.
//!
//! # Invariants
//! - A missing backing file loads as an empty sequence.
//! - Save either replaces the file with exactly the given sequence or leaves
//!   the previous content untouched.
//! - Entries that cannot round-trip through the line format are never written.
//! - Field values are never logged.

use crate::model::entry::{Entry, EntryValidationError, MalformedRecord};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default field delimiter for persisted records.
pub const DEFAULT_DELIMITER: char = '|';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// Persisted line `line` (1-based) is not a valid record.
    MalformedRecord {
        line: usize,
        source: MalformedRecord,
    },
    /// Entry at `index` (0-based) cannot be written without corrupting the file.
    Unencodable {
        index: usize,
        source: EntryValidationError,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::MalformedRecord { line, source } => write!(f, "line {line}: {source}"),
            Self::Unencodable { index, source } => {
                write!(f, "entry #{} cannot be saved: {source}", index + 1)
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MalformedRecord { source, .. } => Some(source),
            Self::Unencodable { source, .. } => Some(source),
        }
    }
}

/// How to treat persisted lines that do not parse as entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Abort the whole load.
    #[default]
    Fail,
    /// Drop the line and log a warning.
    SkipAndWarn,
}

/// Repository interface for whole-sequence entry persistence.
pub trait EntryRepository {
    /// Loads every persisted entry in stored order.
    fn load(&self) -> RepoResult<Vec<Entry>>;
    /// Replaces persisted content with exactly `entries`.
    fn save(&mut self, entries: &[Entry]) -> RepoResult<()>;
}

/// Delimited text file repository.
#[derive(Debug, Clone)]
pub struct TextFileEntryRepository {
    path: PathBuf,
    delimiter: char,
    malformed_lines: MalformedLinePolicy,
}

impl TextFileEntryRepository {
    /// Creates a repository over `path` using the default delimiter and the
    /// fail-fast malformed line policy.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            malformed_lines: MalformedLinePolicy::Fail,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_malformed_line_policy(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    fn io_error(&self, source: io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parse(&self, content: &str) -> RepoResult<Vec<Entry>> {
        let mut entries = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match Entry::from_line(line, self.delimiter) {
                Ok(entry) => entries.push(entry),
                Err(source) => match self.malformed_lines {
                    MalformedLinePolicy::Fail => {
                        return Err(RepoError::MalformedRecord {
                            line: index + 1,
                            source,
                        });
                    }
                    MalformedLinePolicy::SkipAndWarn => {
                        warn!(
                            "event=store_load module=repo status=skip line={} parts={}",
                            index + 1,
                            source.parts
                        );
                    }
                },
            }
        }
        Ok(entries)
    }

    fn encode(&self, entries: &[Entry]) -> RepoResult<String> {
        let mut content = String::new();
        for (index, entry) in entries.iter().enumerate() {
            entry
                .check_encodable(self.delimiter)
                .map_err(|source| RepoError::Unencodable { index, source })?;
            content.push_str(&entry.to_line(self.delimiter));
        }
        Ok(content)
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_replace(&self, content: &str) -> io::Result<()> {
        let staging = self.staging_path();
        let result = (|| -> io::Result<()> {
            let mut file = fs::File::create(&staging)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            fs::rename(&staging, &self.path)
        })();
        if result.is_err() {
            // Staging file may or may not exist at this point.
            let _ = fs::remove_file(&staging);
        }
        result
    }
}

impl EntryRepository for TextFileEntryRepository {
    fn load(&self) -> RepoResult<Vec<Entry>> {
        let started_at = Instant::now();
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=store_load module=repo status=ok source=missing entries=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        match self.parse(&content) {
            Ok(entries) => {
                info!(
                    "event=store_load module=repo status=ok source=file entries={} duration_ms={}",
                    entries.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(entries)
            }
            Err(err) => {
                error!(
                    "event=store_load module=repo status=error error_code=malformed_record error={}",
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&mut self, entries: &[Entry]) -> RepoResult<()> {
        let started_at = Instant::now();
        let content = match self.encode(entries) {
            Ok(content) => content,
            Err(err) => {
                error!(
                    "event=store_save module=repo status=error error_code=unencodable error={}",
                    err
                );
                return Err(err);
            }
        };

        if let Err(err) = self.write_replace(&content) {
            error!(
                "event=store_save module=repo status=error error_code=write_failed error={}",
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=store_save module=repo status=ok entries={} duration_ms={}",
            entries.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Volatile repository that keeps the last saved sequence in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntryRepository {
    saved: Vec<Entry>,
    save_count: usize,
}

impl InMemoryEntryRepository {
    /// Creates a repository whose first load returns `entries`.
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        Self {
            saved: entries,
            save_count: 0,
        }
    }

    /// Returns the last saved (or seeded) sequence.
    pub fn saved(&self) -> &[Entry] {
        &self.saved
    }

    /// Returns how many times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl EntryRepository for InMemoryEntryRepository {
    fn load(&self) -> RepoResult<Vec<Entry>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, entries: &[Entry]) -> RepoResult<()> {
        self.saved = entries.to_vec();
        self.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MalformedLinePolicy, RepoError, TextFileEntryRepository};
    use crate::model::entry::Entry;
    use std::path::Path;

    #[test]
    fn parse_skips_blank_lines() {
        let repo = TextFileEntryRepository::new("unused.txt");
        let entries = repo.parse("a|b|c|d|e|f\n\n").unwrap();
        assert_eq!(entries, vec![Entry::new("a", "b", "c", "d", "e", "f")]);
    }

    #[test]
    fn parse_reports_one_based_line_number() {
        let repo = TextFileEntryRepository::new("unused.txt");
        let err = repo.parse("a|b|c|d|e|f\nbroken\n").unwrap_err();
        match err {
            RepoError::MalformedRecord { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source.parts, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_can_skip_malformed_lines() {
        let repo = TextFileEntryRepository::new("unused.txt")
            .with_malformed_line_policy(MalformedLinePolicy::SkipAndWarn);
        let entries = repo.parse("broken\na|b|c|d|e|f\n").unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn staging_path_is_sibling_of_target() {
        let repo = TextFileEntryRepository::new("/data/phonebook.txt");
        assert_eq!(repo.staging_path(), Path::new("/data/phonebook.txt.tmp"));
    }
}
