//! Repository for the `sellers` table.

use shelfwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::seller::Seller;

/// Column list for `sellers` queries.
const COLUMNS: &str = "id, email, display_name, created_at";

/// Provides data access for sellers.
pub struct SellerRepo;

impl SellerRepo {
    /// Insert a seller, returning the full row.
    pub async fn create(
        pool: &PgPool,
        email: Option<&str>,
        display_name: &str,
    ) -> Result<Seller, sqlx::Error> {
        let query = format!(
            "INSERT INTO sellers (email, display_name) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Seller>(&query)
            .bind(email)
            .bind(display_name)
            .fetch_one(pool)
            .await
    }

    /// Fetch a seller by id.
    pub async fn find_by_id(pool: &PgPool, seller_id: DbId) -> Result<Option<Seller>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sellers WHERE id = $1");
        sqlx::query_as::<_, Seller>(&query)
            .bind(seller_id)
            .fetch_optional(pool)
            .await
    }
}
