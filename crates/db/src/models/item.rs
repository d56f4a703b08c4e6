//! Catalog item models and DTOs.
//!
//! Items are externally owned; this core only reads them during dispatch
//! and ingests them on behalf of the catalog platform.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shelfwatch_core::matching::ItemSnapshot;
use shelfwatch_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub speakers: Option<String>,
    pub pedagogical_objectives: Option<String>,
    pub level_of_study: Option<String>,
    pub seller_name: Option<String>,
    pub multimedial_material_provided: Option<String>,
    pub item_status: Option<String>,
    pub erc_area: Option<String>,
    pub languages: Option<String>,
    pub category_id: Option<DbId>,
    pub university_id: Option<DbId>,
    pub erc_panel_id: Option<DbId>,
    pub erc_keyword_id: Option<DbId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub expiration: Option<NaiveDate>,
    pub created_at: Timestamp,
}

impl Item {
    /// Project the row into the matchable form used by the comparator
    /// registry.
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            name: Some(self.name.clone()),
            description: self.description.clone(),
            learning_outcomes: self.learning_outcomes.clone(),
            speakers: self.speakers.clone(),
            pedagogical_objectives: self.pedagogical_objectives.clone(),
            level_of_study: self.level_of_study.clone(),
            seller_name: self.seller_name.clone(),
            multimedial_material_provided: self.multimedial_material_provided.clone(),
            item_status: self.item_status.clone(),
            erc_area: self.erc_area.clone(),
            languages: self.languages.clone(),
            category_id: self.category_id,
            university_id: self.university_id,
            erc_panel_id: self.erc_panel_id,
            erc_keyword_id: self.erc_keyword_id,
            start_date: self.start_date,
            end_date: self.end_date,
            expiration: self.expiration,
        }
    }
}

/// DTO for ingesting a new catalog item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub description: Option<String>,
    pub learning_outcomes: Option<String>,
    pub speakers: Option<String>,
    pub pedagogical_objectives: Option<String>,
    pub level_of_study: Option<String>,
    pub seller_name: Option<String>,
    pub multimedial_material_provided: Option<String>,
    pub item_status: Option<String>,
    pub erc_area: Option<String>,
    pub languages: Option<String>,
    pub category_id: Option<DbId>,
    pub university_id: Option<DbId>,
    pub erc_panel_id: Option<DbId>,
    pub erc_keyword_id: Option<DbId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub expiration: Option<NaiveDate>,
}
