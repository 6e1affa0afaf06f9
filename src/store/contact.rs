//! The contact document and its schema rules.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{Result, StoreError};

/// Minimum length of a phone number, hyphen included.
pub const NUMBER_MIN_LEN: usize = 8;

/// Digits, optionally split once after a two- or three-digit prefix.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2,3}-\d+|\d+)$").expect("number pattern is a valid regex")
});

// ── ContactId ─────────────────────────────────────────────────────────────────

/// Store-assigned identifier of a contact.
///
/// Time-ordered UUIDv7, so ids are never handed out twice. Only the lowercase
/// hyphenated form is accepted; anything else, other spellings of a valid
/// UUID included, is rejected with [`StoreError::Cast`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(Uuid);

impl ContactId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl FromStr for ContactId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match Uuid::try_parse(s) {
            Ok(uuid) if uuid.hyphenated().to_string() == s => Ok(Self(uuid)),
            _ => Err(StoreError::Cast { value: s.to_owned() }),
        }
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

// ── Documents ─────────────────────────────────────────────────────────────────

/// A stored phonebook entry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

/// Field values for a new contact.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactDraft {
    pub name: String,
    pub number: String,
}

/// Replacement field values for an existing contact.
///
/// `name: None` leaves the stored name as it is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub number: String,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self { name: name.into(), number: number.into() }
    }

    pub fn validate(&self) -> Result<()> {
        collect_failures([validate_name(&self.name), validate_number(&self.number)])
    }

    pub(crate) fn into_contact(self, id: ContactId) -> Contact {
        Contact { id, name: self.name, number: self.number }
    }
}

impl ContactPatch {
    pub fn validate(&self) -> Result<()> {
        collect_failures([
            self.name.as_deref().and_then(validate_name),
            validate_number(&self.number),
        ])
    }
}

impl Contact {
    pub(crate) fn apply(&mut self, patch: ContactPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        self.number = patch.number;
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Returns the failure reason for `name`, if any.
pub fn validate_name(name: &str) -> Option<String> {
    name.trim().is_empty().then(|| "name: must not be empty".to_owned())
}

/// Returns the failure reason for `number`, if any.
pub fn validate_number(number: &str) -> Option<String> {
    if number.chars().count() < NUMBER_MIN_LEN {
        return Some(format!(
            "number: \"{number}\" is shorter than the minimum allowed length ({NUMBER_MIN_LEN})"
        ));
    }
    if !NUMBER_PATTERN.is_match(number) {
        return Some(format!("number: \"{number}\" is not a valid phone number"));
    }
    None
}

fn collect_failures<const N: usize>(failures: [Option<String>; N]) -> Result<()> {
    let reasons: Vec<String> = failures.into_iter().flatten().collect();
    if reasons.is_empty() {
        return Ok(());
    }
    Err(StoreError::Validation {
        message: format!("Contact validation failed: {}", reasons.join(", ")),
    })
}
