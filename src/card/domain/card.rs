//! Card aggregate root.

use super::{
    CardDomainError, CardField, CardId, CardStatus, CardText, CardTitle, CardUpdate,
    CardVersion, CompletenessViolation, FieldChange,
    completeness::{check_completeness, check_protected_fields},
};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Clarification card aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    id: CardId,
    title: CardTitle,
    problem: CardText,
    success_criteria: CardText,
    out_of_scope: Option<CardText>,
    stakeholders: Option<CardText>,
    risks: Option<CardText>,
    due_date: Option<NaiveDate>,
    status: CardStatus,
    version: CardVersion,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted card aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCardData {
    /// Persisted card identifier.
    pub id: CardId,
    /// Persisted title.
    pub title: CardTitle,
    /// Persisted problem statement, possibly empty.
    pub problem: CardText,
    /// Persisted success criteria, possibly empty.
    pub success_criteria: CardText,
    /// Persisted out-of-scope notes.
    pub out_of_scope: Option<CardText>,
    /// Persisted stakeholder notes.
    pub stakeholders: Option<CardText>,
    /// Persisted risk notes.
    pub risks: Option<CardText>,
    /// Persisted due date.
    pub due_date: Option<NaiveDate>,
    /// Persisted lifecycle status.
    pub status: CardStatus,
    /// Persisted version counter.
    pub version: CardVersion,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Update values validated ahead of any rule checks, so a rejected update
/// never leaves the card half-modified.
struct StagedContent {
    title: Option<CardTitle>,
    problem: Option<CardText>,
    success_criteria: Option<CardText>,
    out_of_scope: FieldChange<CardText>,
    stakeholders: FieldChange<CardText>,
    risks: FieldChange<CardText>,
}

impl StagedContent {
    fn from_update(update: &CardUpdate) -> Result<Self, CardDomainError> {
        Ok(Self {
            title: update.title().map(CardTitle::new).transpose()?,
            problem: stage_required(CardField::Problem, update.problem())?,
            success_criteria: stage_required(
                CardField::SuccessCriteria,
                update.success_criteria(),
            )?,
            out_of_scope: stage_optional(CardField::OutOfScope, update.out_of_scope())?,
            stakeholders: stage_optional(CardField::Stakeholders, update.stakeholders())?,
            risks: stage_optional(CardField::Risks, update.risks())?,
        })
    }
}

impl Card {
    /// Creates a new card awaiting clarification.
    ///
    /// `problem` and `success_criteria` start as empty placeholders and the
    /// version starts at zero.
    #[must_use]
    pub fn new(title: CardTitle, clock: &impl Clock) -> Self {
        let timestamp = stamp(clock);
        Self {
            id: CardId::new(),
            title,
            problem: CardText::empty(),
            success_criteria: CardText::empty(),
            out_of_scope: None,
            stakeholders: None,
            risks: None,
            due_date: None,
            status: CardStatus::NeedsClarification,
            version: CardVersion::INITIAL,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        }
    }

    /// Reconstructs a card from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCardData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            problem: data.problem,
            success_criteria: data.success_criteria,
            out_of_scope: data.out_of_scope,
            stakeholders: data.stakeholders,
            risks: data.risks,
            due_date: data.due_date,
            status: data.status,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Validates the content of `update` without touching any card.
    ///
    /// # Errors
    ///
    /// Returns a validation variant of [`CardDomainError`] for an empty or
    /// overlong title or an overlong text field.
    pub fn validate_update(update: &CardUpdate) -> Result<(), CardDomainError> {
        StagedContent::from_update(update).map(|_| ())
    }

    /// Returns the card identifier.
    #[must_use]
    pub const fn id(&self) -> CardId {
        self.id
    }

    /// Returns the card title.
    #[must_use]
    pub const fn title(&self) -> &CardTitle {
        &self.title
    }

    /// Returns the problem statement, possibly empty.
    #[must_use]
    pub const fn problem(&self) -> &CardText {
        &self.problem
    }

    /// Returns the success criteria, possibly empty.
    #[must_use]
    pub const fn success_criteria(&self) -> &CardText {
        &self.success_criteria
    }

    /// Returns the out-of-scope notes, if any.
    #[must_use]
    pub const fn out_of_scope(&self) -> Option<&CardText> {
        self.out_of_scope.as_ref()
    }

    /// Returns the stakeholder notes, if any.
    #[must_use]
    pub const fn stakeholders(&self) -> Option<&CardText> {
        self.stakeholders.as_ref()
    }

    /// Returns the risk notes, if any.
    #[must_use]
    pub const fn risks(&self) -> Option<&CardText> {
        self.risks.as_ref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> CardStatus {
        self.status
    }

    /// Returns the version counter.
    #[must_use]
    pub const fn version(&self) -> CardVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the soft-deletion timestamp, if the card has been deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Checks that `problem` and `success_criteria` are both populated.
    ///
    /// # Errors
    ///
    /// Returns [`CompletenessViolation`] naming each blank field.
    pub fn check_completeness(&self) -> Result<(), CompletenessViolation> {
        check_completeness(&self.problem, &self.success_criteria)
    }

    /// Applies a partial content edit.
    ///
    /// Input is validated first, then the caller's version is compared with
    /// the current one, then the anti-regression rule is enforced for cards
    /// past clarification. On success the version advances by one.
    ///
    /// # Errors
    ///
    /// Returns a validation variant of [`CardDomainError`] for malformed
    /// input, [`CardDomainError::VersionMismatch`] for a stale version, and
    /// [`CardDomainError::ProtectedFieldsCleared`] when a populated required
    /// field would be blanked. The card is unchanged on error.
    pub fn apply_update(
        &mut self,
        update: &CardUpdate,
        clock: &impl Clock,
    ) -> Result<(), CardDomainError> {
        let staged = StagedContent::from_update(update)?;
        self.version.ensure_matches(update.expected_version())?;
        check_protected_fields(self.status, &self.problem, &self.success_criteria, update)?;

        if let Some(title) = staged.title {
            self.title = title;
        }
        if let Some(problem) = staged.problem {
            self.problem = problem;
        }
        if let Some(success_criteria) = staged.success_criteria {
            self.success_criteria = success_criteria;
        }
        apply_optional(&mut self.out_of_scope, staged.out_of_scope);
        apply_optional(&mut self.stakeholders, staged.stakeholders);
        apply_optional(&mut self.risks, staged.risks);
        apply_optional(&mut self.due_date, update.due_date().clone());

        self.advance(clock);
        Ok(())
    }

    /// Moves the card along a single state-machine edge.
    ///
    /// Completeness is checked against the card as it stands before the
    /// status changes.
    ///
    /// # Errors
    ///
    /// Returns [`CardDomainError::InvalidTransition`] for an illegal edge and
    /// [`CardDomainError::Incomplete`] when the target status requires
    /// fields that are blank. The card is unchanged on error.
    pub fn transition_to(
        &mut self,
        target: CardStatus,
        clock: &impl Clock,
    ) -> Result<(), CardDomainError> {
        self.status.validate_transition(target)?;
        if target.requires_completeness() {
            self.check_completeness()?;
        }
        self.status = target;
        self.advance(clock);
        Ok(())
    }

    /// Marks the card as soft-deleted.
    ///
    /// The version does not advance; deletion is not a content mutation.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        self.stamp_deleted(stamp(clock));
    }

    /// Applies a deletion timestamp already chosen by another copy of this
    /// card, leaving content and version as they are.
    pub(crate) fn stamp_deleted(&mut self, deleted_at: DateTime<Utc>) {
        self.updated_at = deleted_at.max(self.created_at);
        self.deleted_at = Some(self.updated_at);
    }

    fn advance(&mut self, clock: &impl Clock) {
        self.version = self.version.next();
        self.touch(clock);
    }

    /// Updates `updated_at`, never letting it fall behind `created_at`.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = stamp(clock).max(self.created_at);
    }
}

/// Reads the clock at the microsecond resolution storage keeps.
fn stamp(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(6)
}

/// Validates a required text change. Clearing stores an empty placeholder.
fn stage_required(
    field: CardField,
    change: &FieldChange<String>,
) -> Result<Option<CardText>, CardDomainError> {
    match change {
        FieldChange::Unchanged => Ok(None),
        FieldChange::Cleared => Ok(Some(CardText::empty())),
        FieldChange::Set(value) if value.trim().is_empty() => Ok(Some(CardText::empty())),
        FieldChange::Set(value) => CardText::new(field, value.as_str()).map(Some),
    }
}

/// Validates an optional text change. Blank values clear the field.
fn stage_optional(
    field: CardField,
    change: &FieldChange<String>,
) -> Result<FieldChange<CardText>, CardDomainError> {
    match change {
        FieldChange::Unchanged => Ok(FieldChange::Unchanged),
        FieldChange::Cleared => Ok(FieldChange::Cleared),
        FieldChange::Set(value) if value.trim().is_empty() => Ok(FieldChange::Cleared),
        FieldChange::Set(value) => CardText::new(field, value.as_str()).map(FieldChange::Set),
    }
}

fn apply_optional<T>(slot: &mut Option<T>, change: FieldChange<T>) {
    match change {
        FieldChange::Unchanged => {}
        FieldChange::Cleared => *slot = None,
        FieldChange::Set(value) => *slot = Some(value),
    }
}
