//! The identity carried by a credential.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SubjectError;

/// A validated subject (user name) extracted from a credential.
///
/// Subjects are forwarded to backends in a header, so they are restricted to
/// visible ASCII without whitespace and at most [`Subject::MAX_LEN`] bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    /// Maximum accepted length in bytes.
    pub const MAX_LEN: usize = 128;

    /// Parse and validate a subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, too long, or contains a
    /// character that cannot appear in an HTTP header value.
    pub fn parse(value: impl Into<String>) -> Result<Self, SubjectError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SubjectError::Empty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(SubjectError::TooLong { max: Self::MAX_LEN });
        }
        if !value.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(SubjectError::InvalidCharacter);
        }
        Ok(Self(value))
    }

    /// Return the subject as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({})", self.0)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Subject {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Subject {
    type Error = SubjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.0
    }
}

impl AsRef<str> for Subject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
