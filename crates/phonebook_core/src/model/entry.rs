//! Contact entry domain model.
//!
//! # Responsibility
//! - Define the six-field contact record and its delimited line form.
//! - Provide typed per-field access through [`EntryField`].
//! - Apply partial updates where empty text means "keep current value".
//!
//! # Invariants
//! - Fields are never absent; missing input is stored as empty text.
//! - Field order is fixed: surname, name, father name, organization,
//!   office phone, personal phone.
//! - `Entry::from_line(&entry.to_line(d), d)` reproduces `entry` whenever
//!   [`Entry::check_encodable`] passes for `d`.

use crate::validation::is_valid_phone;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of fields in one persisted record.
pub const FIELD_COUNT: usize = 6;

/// Named field of an [`Entry`], in persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntryField {
    Surname,
    Name,
    FatherName,
    Organization,
    OfficePhone,
    PersonalPhone,
}

impl EntryField {
    /// All fields in persisted order.
    pub const ALL: [EntryField; FIELD_COUNT] = [
        EntryField::Surname,
        EntryField::Name,
        EntryField::FatherName,
        EntryField::Organization,
        EntryField::OfficePhone,
        EntryField::PersonalPhone,
    ];

    /// Stable lowercase key used in config, logs and filter maps.
    pub fn key(self) -> &'static str {
        match self {
            Self::Surname => "surname",
            Self::Name => "name",
            Self::FatherName => "fathername",
            Self::Organization => "organization",
            Self::OfficePhone => "office_phone",
            Self::PersonalPhone => "personal_phone",
        }
    }

    /// Human-readable label for prompts and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Surname => "surname",
            Self::Name => "name",
            Self::FatherName => "father name",
            Self::Organization => "organization",
            Self::OfficePhone => "office phone",
            Self::PersonalPhone => "personal phone",
        }
    }

    pub fn is_phone(self) -> bool {
        matches!(self, Self::OfficePhone | Self::PersonalPhone)
    }
}

impl Display for EntryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A persisted line that does not split into exactly six fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Number of parts the line actually split into.
    pub parts: usize,
}

impl Display for MalformedRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "malformed record: expected {FIELD_COUNT} fields, found {}",
            self.parts
        )
    }
}

impl Error for MalformedRecord {}

/// Field-level validation failure for entries and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Field value contains the record delimiter.
    DelimiterInField { field: EntryField, delimiter: char },
    /// Field value contains `\n` or `\r`.
    LineBreakInField(EntryField),
    /// Phone field does not match the accepted phone grammar.
    InvalidPhoneFormat(EntryField),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DelimiterInField { field, delimiter } => write!(
                f,
                "{} must not contain the delimiter `{delimiter}`",
                field.label()
            ),
            Self::LineBreakInField(field) => {
                write!(f, "{} must not contain line breaks", field.label())
            }
            Self::InvalidPhoneFormat(field) => {
                write!(f, "{} is not a valid phone number", field.label())
            }
        }
    }
}

impl EntryValidationError {
    /// Returns the field that failed validation.
    pub fn field(&self) -> EntryField {
        match self {
            Self::DelimiterInField { field, .. } => *field,
            Self::LineBreakInField(field) | Self::InvalidPhoneFormat(field) => *field,
        }
    }
}

impl Error for EntryValidationError {}

/// One contact record with six fixed text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub surname: String,
    pub name: String,
    pub father_name: String,
    pub organization: String,
    pub office_phone: String,
    pub personal_phone: String,
}

impl Entry {
    /// Builds an entry from the six fields in persisted order.
    pub fn new(
        surname: impl Into<String>,
        name: impl Into<String>,
        father_name: impl Into<String>,
        organization: impl Into<String>,
        office_phone: impl Into<String>,
        personal_phone: impl Into<String>,
    ) -> Self {
        Self {
            surname: surname.into(),
            name: name.into(),
            father_name: father_name.into(),
            organization: organization.into(),
            office_phone: office_phone.into(),
            personal_phone: personal_phone.into(),
        }
    }

    /// Builds an entry from an array of values in persisted order.
    pub fn from_values(values: [String; FIELD_COUNT]) -> Self {
        let [surname, name, father_name, organization, office_phone, personal_phone] = values;
        Self {
            surname,
            name,
            father_name,
            organization,
            office_phone,
            personal_phone,
        }
    }

    pub fn get(&self, field: EntryField) -> &str {
        match field {
            EntryField::Surname => &self.surname,
            EntryField::Name => &self.name,
            EntryField::FatherName => &self.father_name,
            EntryField::Organization => &self.organization,
            EntryField::OfficePhone => &self.office_phone,
            EntryField::PersonalPhone => &self.personal_phone,
        }
    }

    pub fn set(&mut self, field: EntryField, value: impl Into<String>) {
        let slot = match field {
            EntryField::Surname => &mut self.surname,
            EntryField::Name => &mut self.name,
            EntryField::FatherName => &mut self.father_name,
            EntryField::Organization => &mut self.organization,
            EntryField::OfficePhone => &mut self.office_phone,
            EntryField::PersonalPhone => &mut self.personal_phone,
        };
        *slot = value.into();
    }

    /// Iterates `(field, value)` pairs in persisted order.
    pub fn fields(&self) -> impl Iterator<Item = (EntryField, &str)> + '_ {
        EntryField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    /// Parses one persisted line.
    ///
    /// A trailing `\n` / `\r\n` is stripped; whitespace inside fields is kept.
    ///
    /// # Errors
    /// - Returns [`MalformedRecord`] unless the line splits into exactly six parts.
    pub fn from_line(line: &str, delimiter: char) -> Result<Self, MalformedRecord> {
        let line = line.trim_end_matches(['\n', '\r']);
        let parts = line.split(delimiter).collect::<Vec<_>>();
        let Ok(values) = <[&str; FIELD_COUNT]>::try_from(parts.as_slice()) else {
            return Err(MalformedRecord { parts: parts.len() });
        };
        Ok(Self::from_values(values.map(str::to_string)))
    }

    /// Serializes into one persisted line terminated by `\n`.
    pub fn to_line(&self, delimiter: char) -> String {
        let mut line = String::new();
        for (position, (_, value)) in self.fields().enumerate() {
            if position > 0 {
                line.push(delimiter);
            }
            line.push_str(value);
        }
        line.push('\n');
        line
    }

    /// Returns whether `keyword` equals any field value, ignoring case.
    ///
    /// Exact per-field comparison, not substring matching.
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.fields()
            .any(|(_, value)| value.to_lowercase() == keyword)
    }

    /// Applies a partial update: empty replacements keep the current value.
    pub fn update(&mut self, patch: &EntryPatch) {
        for field in EntryField::ALL {
            let replacement = patch.get(field);
            if !replacement.is_empty() {
                self.set(field, replacement);
            }
        }
    }

    /// Checks that the entry can be written with `delimiter` and read back.
    pub fn check_encodable(&self, delimiter: char) -> Result<(), EntryValidationError> {
        self.fields()
            .try_for_each(|(field, value)| check_field_encodable(field, value, delimiter))
    }

    /// Checks both phone fields against the phone grammar.
    pub fn validate_phones(&self) -> Result<(), EntryValidationError> {
        self.fields()
            .filter(|(field, _)| field.is_phone())
            .try_for_each(|(field, value)| check_phone(field, value))
    }

    /// Single-line rendering for listings.
    pub fn summary(&self) -> String {
        self.fields()
            .map(|(_, value)| value)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Targeted replacement values for [`Entry::update`].
///
/// Uses the same shape as [`Entry`]; an empty field means "no change".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    values: Entry,
}

impl EntryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a patch from six replacement values in persisted order.
    pub fn from_values(values: [String; FIELD_COUNT]) -> Self {
        Self {
            values: Entry::from_values(values),
        }
    }

    /// Sets one replacement value.
    pub fn with(mut self, field: EntryField, value: impl Into<String>) -> Self {
        self.values.set(field, value);
        self
    }

    pub fn get(&self, field: EntryField) -> &str {
        self.values.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.values.fields().all(|(_, value)| value.is_empty())
    }

    /// Same as [`Entry::check_encodable`] for the replacement values.
    pub fn check_encodable(&self, delimiter: char) -> Result<(), EntryValidationError> {
        self.values.check_encodable(delimiter)
    }

    /// Validates non-empty phone replacements only.
    pub fn validate_phones(&self) -> Result<(), EntryValidationError> {
        self.values
            .fields()
            .filter(|(field, value)| field.is_phone() && !value.is_empty())
            .try_for_each(|(field, value)| check_phone(field, value))
    }
}

impl From<Entry> for EntryPatch {
    fn from(values: Entry) -> Self {
        Self { values }
    }
}

fn check_field_encodable(
    field: EntryField,
    value: &str,
    delimiter: char,
) -> Result<(), EntryValidationError> {
    if value.contains(['\n', '\r']) {
        return Err(EntryValidationError::LineBreakInField(field));
    }
    if value.contains(delimiter) {
        return Err(EntryValidationError::DelimiterInField { field, delimiter });
    }
    Ok(())
}

fn check_phone(field: EntryField, value: &str) -> Result<(), EntryValidationError> {
    if is_valid_phone(value) {
        Ok(())
    } else {
        Err(EntryValidationError::InvalidPhoneFormat(field))
    }
}
