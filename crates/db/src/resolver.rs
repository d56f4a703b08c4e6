//! Database-backed relation name resolution.
//!
//! Implements the [`RelationResolver`] seam from `shelfwatch-core` by
//! looking display names up in the relation lookup tables.

use async_trait::async_trait;
use shelfwatch_core::criteria::{RelationKind, RelationResolver};
use shelfwatch_core::types::{BoxError, DbId};

use crate::DbPool;

/// Resolves relation identifiers against the lookup tables.
pub struct PgRelationResolver {
    pool: DbPool,
}

impl PgRelationResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Table holding the display names for a relation kind.
fn table_for(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::Category => "categories",
        RelationKind::University => "universities",
        RelationKind::ErcPanel => "erc_panels",
        RelationKind::ErcKeyword => "erc_keywords",
    }
}

#[async_trait]
impl RelationResolver for PgRelationResolver {
    async fn resolve(&self, kind: RelationKind, id: DbId) -> Result<Option<String>, BoxError> {
        let query = format!("SELECT name FROM {} WHERE id = $1", table_for(kind));
        let name: Option<String> = sqlx::query_scalar(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(name)
    }
}
