//! Field-edit requests with explicit untouched / cleared / set semantics.

use super::CardVersion;
use chrono::NaiveDate;

/// Requested change to a single optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldChange<T> {
    /// The field is absent from the request and stays as stored.
    #[default]
    Unchanged,
    /// The field is explicitly emptied.
    Cleared,
    /// The field is replaced with a value.
    Set(T),
}

impl<T> FieldChange<T> {
    /// Maps a nullable, optional transport value onto a change.
    ///
    /// `None` means absent, `Some(None)` means explicitly null.
    #[must_use]
    pub fn from_nullable(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Unchanged,
            Some(None) => Self::Cleared,
            Some(Some(inner)) => Self::Set(inner),
        }
    }

    /// Returns `true` when the request leaves the field alone.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl FieldChange<String> {
    /// Returns `true` when applying the change leaves the text blank.
    #[must_use]
    pub fn clears_text(&self) -> bool {
        match self {
            Self::Unchanged => false,
            Self::Cleared => true,
            Self::Set(value) => value.trim().is_empty(),
        }
    }
}

/// Partial edit of a card's content, guarded by the caller's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardUpdate {
    expected_version: CardVersion,
    title: Option<String>,
    problem: FieldChange<String>,
    success_criteria: FieldChange<String>,
    out_of_scope: FieldChange<String>,
    stakeholders: FieldChange<String>,
    risks: FieldChange<String>,
    due_date: FieldChange<NaiveDate>,
}

impl CardUpdate {
    /// Creates an update that touches no fields.
    #[must_use]
    pub const fn new(expected_version: CardVersion) -> Self {
        Self {
            expected_version,
            title: None,
            problem: FieldChange::Unchanged,
            success_criteria: FieldChange::Unchanged,
            out_of_scope: FieldChange::Unchanged,
            stakeholders: FieldChange::Unchanged,
            risks: FieldChange::Unchanged,
            due_date: FieldChange::Unchanged,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the change applied to `problem`.
    #[must_use]
    pub fn with_problem_change(mut self, change: FieldChange<String>) -> Self {
        self.problem = change;
        self
    }

    /// Replaces `problem`.
    #[must_use]
    pub fn with_problem(self, problem: impl Into<String>) -> Self {
        self.with_problem_change(FieldChange::Set(problem.into()))
    }

    /// Sets the change applied to `success_criteria`.
    #[must_use]
    pub fn with_success_criteria_change(mut self, change: FieldChange<String>) -> Self {
        self.success_criteria = change;
        self
    }

    /// Replaces `success_criteria`.
    #[must_use]
    pub fn with_success_criteria(self, criteria: impl Into<String>) -> Self {
        self.with_success_criteria_change(FieldChange::Set(criteria.into()))
    }

    /// Sets the change applied to `out_of_scope`.
    #[must_use]
    pub fn with_out_of_scope_change(mut self, change: FieldChange<String>) -> Self {
        self.out_of_scope = change;
        self
    }

    /// Replaces `out_of_scope`.
    #[must_use]
    pub fn with_out_of_scope(self, out_of_scope: impl Into<String>) -> Self {
        self.with_out_of_scope_change(FieldChange::Set(out_of_scope.into()))
    }

    /// Sets the change applied to `stakeholders`.
    #[must_use]
    pub fn with_stakeholders_change(mut self, change: FieldChange<String>) -> Self {
        self.stakeholders = change;
        self
    }

    /// Replaces `stakeholders`.
    #[must_use]
    pub fn with_stakeholders(self, stakeholders: impl Into<String>) -> Self {
        self.with_stakeholders_change(FieldChange::Set(stakeholders.into()))
    }

    /// Sets the change applied to `risks`.
    #[must_use]
    pub fn with_risks_change(mut self, change: FieldChange<String>) -> Self {
        self.risks = change;
        self
    }

    /// Replaces `risks`.
    #[must_use]
    pub fn with_risks(self, risks: impl Into<String>) -> Self {
        self.with_risks_change(FieldChange::Set(risks.into()))
    }

    /// Sets the change applied to `due_date`.
    #[must_use]
    pub fn with_due_date_change(mut self, change: FieldChange<NaiveDate>) -> Self {
        self.due_date = change;
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub fn with_due_date(self, due_date: NaiveDate) -> Self {
        self.with_due_date_change(FieldChange::Set(due_date))
    }

    /// Returns the version the caller last observed.
    #[must_use]
    pub const fn expected_version(&self) -> CardVersion {
        self.expected_version
    }

    /// Returns the requested title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the change requested for `problem`.
    #[must_use]
    pub const fn problem(&self) -> &FieldChange<String> {
        &self.problem
    }

    /// Returns the change requested for `success_criteria`.
    #[must_use]
    pub const fn success_criteria(&self) -> &FieldChange<String> {
        &self.success_criteria
    }

    /// Returns the change requested for `out_of_scope`.
    #[must_use]
    pub const fn out_of_scope(&self) -> &FieldChange<String> {
        &self.out_of_scope
    }

    /// Returns the change requested for `stakeholders`.
    #[must_use]
    pub const fn stakeholders(&self) -> &FieldChange<String> {
        &self.stakeholders
    }

    /// Returns the change requested for `risks`.
    #[must_use]
    pub const fn risks(&self) -> &FieldChange<String> {
        &self.risks
    }

    /// Returns the change requested for `due_date`.
    #[must_use]
    pub const fn due_date(&self) -> &FieldChange<NaiveDate> {
        &self.due_date
    }
}
