//! Validated text values and field names for card content.

use super::CardDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 120;

/// Names of the editable card fields, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardField {
    /// Short card title.
    Title,
    /// Background and problem statement.
    Problem,
    /// Definition of done.
    SuccessCriteria,
    /// Explicitly excluded work.
    OutOfScope,
    /// People involved in or affected by the card.
    Stakeholders,
    /// Known risks.
    Risks,
    /// Optional due date.
    DueDate,
}

impl CardField {
    /// Returns the field name used in structured error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Problem => "problem",
            Self::SuccessCriteria => "successCriteria",
            Self::OutOfScope => "outOfScope",
            Self::Stakeholders => "stakeholders",
            Self::Risks => "risks",
            Self::DueDate => "dueDate",
        }
    }

    /// Returns the character limit for text fields, if any.
    #[must_use]
    pub const fn max_chars(self) -> Option<usize> {
        match self {
            Self::Title => Some(TITLE_MAX_CHARS),
            Self::Problem | Self::Stakeholders => Some(1000),
            Self::SuccessCriteria | Self::OutOfScope | Self::Risks => Some(2000),
            Self::DueDate => None,
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-empty card title of at most [`TITLE_MAX_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardTitle(String);

impl CardTitle {
    /// Creates a validated, trimmed title.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::EmptyTitle`] for blank input and
    /// [`CardDomainError::FieldTooLong`] past the character limit.
    pub fn new(value: impl Into<String>) -> Result<Self, CardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CardDomainError::EmptyTitle);
        }
        check_length(CardField::Title, trimmed)?;
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CardTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Long-form card text bounded by its field's character limit.
///
/// May be empty: `problem` and `success_criteria` start as empty
/// placeholders until the card is clarified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardText(String);

impl CardText {
    /// Creates a length-checked text value for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::FieldTooLong`] past the field's limit.
    pub fn new(field: CardField, value: impl Into<String>) -> Result<Self, CardDomainError> {
        let raw = value.into();
        check_length(field, &raw)?;
        Ok(Self(raw))
    }

    /// Returns an empty placeholder value.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns `true` when the text is empty after trimming whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the text as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CardText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

fn check_length(field: CardField, value: &str) -> Result<(), CardDomainError> {
    let Some(max) = field.max_chars() else {
        return Ok(());
    };
    let length = value.chars().count();
    if length > max {
        return Err(CardDomainError::FieldTooLong { field, length, max });
    }
    Ok(())
}
