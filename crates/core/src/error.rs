//! Domain error taxonomy.
//!
//! Transport-agnostic: the HTTP layer decides status codes, the dispatch
//! engine decides what is merely a per-subscription skip. Transient
//! dependency failures (relation lookups, email) are deliberately NOT
//! variants here; callers swallow those locally and degrade.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A subscription, notification, or item id that matched no row.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Rejected input: a blank alert name, criteria that sanitize to
    /// nothing, and the like. No mutation was attempted.
    #[error("{0}")]
    Validation(String),

    /// The seller already has an alert with this criteria signature.
    #[error("{0}")]
    Conflict(String),

    /// No usable identity on the request.
    #[error("{0}")]
    Unauthorized(String),

    /// The identity is valid but does not own the targeted entity.
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected failure with no better classification.
    #[error("{0}")]
    Internal(String),
}
