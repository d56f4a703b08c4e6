//! Repository for the `items` table.
//!
//! Items are read-mostly from this service's perspective: ingestion
//! inserts them on behalf of the catalog platform, and the dispatch
//! engine loads them when an item-created event fires.

use shelfwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item};

/// Column list for `items` queries.
const COLUMNS: &str = "\
    id, name, description, learning_outcomes, speakers, \
    pedagogical_objectives, level_of_study, seller_name, \
    multimedial_material_provided, item_status, erc_area, languages, \
    category_id, university_id, erc_panel_id, erc_keyword_id, \
    start_date, end_date, expiration, created_at";

/// Provides data access for catalog items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a catalog item, returning the full row.
    pub async fn create(pool: &PgPool, dto: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items \
                 (name, description, learning_outcomes, speakers, \
                  pedagogical_objectives, level_of_study, seller_name, \
                  multimedial_material_provided, item_status, erc_area, \
                  languages, category_id, university_id, erc_panel_id, \
                  erc_keyword_id, start_date, end_date, expiration) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                     $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.learning_outcomes)
            .bind(&dto.speakers)
            .bind(&dto.pedagogical_objectives)
            .bind(&dto.level_of_study)
            .bind(&dto.seller_name)
            .bind(&dto.multimedial_material_provided)
            .bind(&dto.item_status)
            .bind(&dto.erc_area)
            .bind(&dto.languages)
            .bind(dto.category_id)
            .bind(dto.university_id)
            .bind(dto.erc_panel_id)
            .bind(dto.erc_keyword_id)
            .bind(dto.start_date)
            .bind(dto.end_date)
            .bind(dto.expiration)
            .fetch_one(pool)
            .await
    }

    /// Fetch an item by id.
    pub async fn find_by_id(pool: &PgPool, item_id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item.
    ///
    /// Notifications referencing it keep their row; the FK sets their
    /// `item_id` to `NULL` so the feed can render a "deleted" state.
    pub async fn delete(pool: &PgPool, item_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
