//! Application services for card lifecycle orchestration.

mod error;
mod export;
mod lifecycle;
mod requests;

pub use error::{CardLifecycleError, CardLifecycleResult, ErrorKind, ErrorPayload};
pub use export::{CardExport, EXPORT_CONTENT_TYPE};
pub use lifecycle::CardLifecycleService;
pub use requests::{CreateCardRequest, ListCardsRequest, TransitionCardRequest};
