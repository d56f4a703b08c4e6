//! Repository for the `subscriptions` table.
//!
//! Every seller-facing query is owner-scoped at the SQL level; the
//! dispatch engine additionally loads all active subscriptions across
//! sellers via [`SubscriptionRepo::list_active`].

use shelfwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::{
    ActiveSubscription, NewSubscription, Subscription, SubscriptionChanges,
};

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "\
    id, seller_id, name, description, criteria, criteria_signature, \
    notify_via_email, is_active, last_triggered_at, created_at, updated_at";

/// Provides CRUD operations for alert subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Insert a subscription, returning the full row.
    pub async fn create(pool: &PgPool, dto: &NewSubscription) -> Result<Subscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions \
                 (seller_id, name, description, criteria, criteria_signature, \
                  notify_via_email) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(dto.seller_id)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.criteria)
            .bind(&dto.criteria_signature)
            .bind(dto.notify_via_email)
            .fetch_one(pool)
            .await
    }

    /// Fetch a subscription by id, regardless of owner.
    ///
    /// Handlers use this to distinguish not-found from forbidden.
    pub async fn find_by_id(
        pool: &PgPool,
        subscription_id: DbId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, Subscription>(&query)
            .bind(subscription_id)
            .fetch_optional(pool)
            .await
    }

    /// List a seller's subscriptions, newest first.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE seller_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(seller_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Check whether the seller already has a subscription with this
    /// criteria signature, optionally excluding one subscription id.
    pub async fn signature_exists(
        pool: &PgPool,
        seller_id: DbId,
        signature: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM subscriptions \
             WHERE seller_id = $1 AND criteria_signature = $2 \
             LIMIT 1",
        )
        .bind(seller_id)
        .bind(signature)
        .fetch_optional(pool)
        .await?;
        Ok(exists.is_some())
    }

    /// Apply a partial update to a seller's subscription.
    ///
    /// Returns `None` if no row matched the (id, seller) pair. Untouched
    /// fields fall back to their current value via `COALESCE`; the
    /// description is the exception and is overwritten when provided.
    pub async fn update(
        pool: &PgPool,
        subscription_id: DbId,
        seller_id: DbId,
        changes: &SubscriptionChanges,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET \
                 name = COALESCE($3, name), \
                 description = CASE WHEN $4::boolean THEN $5 ELSE description END, \
                 notify_via_email = COALESCE($6, notify_via_email), \
                 is_active = COALESCE($7, is_active), \
                 criteria = COALESCE($8, criteria), \
                 criteria_signature = COALESCE($9, criteria_signature), \
                 updated_at = NOW() \
             WHERE id = $1 AND seller_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(subscription_id)
            .bind(seller_id)
            .bind(&changes.name)
            .bind(changes.description.is_some())
            .bind(changes.description.as_ref().and_then(|d| d.as_deref()))
            .bind(changes.notify_via_email)
            .bind(changes.is_active)
            .bind(&changes.criteria)
            .bind(&changes.criteria_signature)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a seller's subscription. Returns `true` if a row was
    /// removed.
    pub async fn delete(
        pool: &PgPool,
        subscription_id: DbId,
        seller_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1 AND seller_id = $2")
            .bind(subscription_id)
            .bind(seller_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load all active subscriptions with their owners' email addresses.
    ///
    /// This is the dispatch engine's read path; it deliberately spans all
    /// sellers.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<ActiveSubscription>, sqlx::Error> {
        sqlx::query_as::<_, ActiveSubscription>(
            "SELECT s.id, s.seller_id, s.name, s.criteria, s.notify_via_email, \
                    sel.email AS seller_email \
             FROM subscriptions s \
             JOIN sellers sel ON sel.id = s.seller_id \
             WHERE s.is_active \
             ORDER BY s.id",
        )
        .fetch_all(pool)
        .await
        .inspect(|subs| tracing::debug!(count = subs.len(), "Loaded active subscriptions"))
    }

    /// Stamp `last_triggered_at` after a notification was created.
    pub async fn touch_last_triggered(
        pool: &PgPool,
        subscription_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE subscriptions SET last_triggered_at = NOW() WHERE id = $1")
            .bind(subscription_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
