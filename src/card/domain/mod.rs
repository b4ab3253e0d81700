//! Domain model for clarification cards.
//!
//! The card domain owns every business rule of the lifecycle: which status
//! edges exist, which fields must be populated in which statuses, how the
//! version counter advances, and which records are visible. Infrastructure
//! concerns stay outside this boundary.

mod card;
mod completeness;
mod error;
mod fields;
mod ids;
mod listing;
mod status;
mod update;
mod version;
mod visibility;

pub use card::{Card, PersistedCardData};
pub use completeness::{CompletenessViolation, ProtectedFieldsCleared};
pub use error::{CardDomainError, ParseCardStatusError};
pub use fields::{CardField, CardText, CardTitle, TITLE_MAX_CHARS};
pub use ids::CardId;
pub use listing::{
    CardListQuery, CardPage, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, Pagination,
};
pub use status::{CardStatus, StatusTransitionViolation};
pub use update::{CardUpdate, FieldChange};
pub use version::{CardVersion, VersionMismatch};
pub use visibility::{is_visible, retain_visible};
