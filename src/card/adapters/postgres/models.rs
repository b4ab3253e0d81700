//! Diesel row models for card persistence.

use super::schema::cards;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for card records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CardRow {
    /// Card identifier.
    pub id: uuid::Uuid,
    /// Card title.
    pub title: String,
    /// Problem statement.
    pub problem: String,
    /// Success criteria.
    pub success_criteria: String,
    /// Out-of-scope notes.
    pub out_of_scope: Option<String>,
    /// Stakeholder notes.
    pub stakeholders: Option<String>,
    /// Risk notes.
    pub risks: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: String,
    /// Version counter.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Insert model for card records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cards)]
pub struct NewCardRow {
    /// Card identifier.
    pub id: uuid::Uuid,
    /// Card title.
    pub title: String,
    /// Problem statement.
    pub problem: String,
    /// Success criteria.
    pub success_criteria: String,
    /// Out-of-scope notes.
    pub out_of_scope: Option<String>,
    /// Stakeholder notes.
    pub stakeholders: Option<String>,
    /// Risk notes.
    pub risks: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: String,
    /// Version counter.
    pub version: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Full replacement of a card's mutable columns.
///
/// `None` writes `NULL` so cleared optional fields are persisted.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cards)]
#[diesel(treat_none_as_null = true)]
pub struct CardChangeset {
    /// Card title.
    pub title: String,
    /// Problem statement.
    pub problem: String,
    /// Success criteria.
    pub success_criteria: String,
    /// Out-of-scope notes.
    pub out_of_scope: Option<String>,
    /// Stakeholder notes.
    pub stakeholders: Option<String>,
    /// Risk notes.
    pub risks: Option<String>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: String,
    /// Version counter.
    pub version: i64,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}
