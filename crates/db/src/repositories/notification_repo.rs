//! Repository for the `notifications` table.

use shelfwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{NewNotification, Notification, NotificationFeedRow};

/// Column list for `notifications` queries.
const COLUMNS: &str = "\
    id, seller_id, subscription_id, item_id, title, body, is_read, \
    read_at, delivered_at, email_sent_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification for a (subscription, item) pair, at most once.
    ///
    /// Relies on the `uq_notifications_subscription_item` constraint, not
    /// a check-then-create, so concurrent dispatches for the same item
    /// cannot double-notify. Returns the row plus `true` when this call
    /// created it, `false` when it already existed.
    pub async fn create_idempotent(
        pool: &PgPool,
        dto: &NewNotification,
    ) -> Result<(Notification, bool), sqlx::Error> {
        let insert = format!(
            "INSERT INTO notifications \
                 (seller_id, subscription_id, item_id, title, body) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_notifications_subscription_item \
                 DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Notification>(&insert)
            .bind(dto.seller_id)
            .bind(dto.subscription_id)
            .bind(dto.item_id)
            .bind(&dto.title)
            .bind(&dto.body)
            .fetch_optional(pool)
            .await?;

        if let Some(notification) = created {
            return Ok((notification, true));
        }

        // Lost the race (or a retried trigger): return the existing row.
        tracing::debug!(
            subscription_id = dto.subscription_id,
            item_id = dto.item_id,
            "Notification already recorded for this pair"
        );
        let select = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE subscription_id = $1 AND item_id = $2"
        );
        let existing = sqlx::query_as::<_, Notification>(&select)
            .bind(dto.subscription_id)
            .bind(dto.item_id)
            .fetch_one(pool)
            .await?;
        Ok((existing, false))
    }

    /// Fetch a notification by id, regardless of owner.
    pub async fn find_by_id(
        pool: &PgPool,
        notification_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .fetch_optional(pool)
            .await
    }

    /// List a seller's notification feed, newest first, with minimal item
    /// and subscription projections joined in.
    ///
    /// Joined columns are `NULL` for notifications whose item or
    /// subscription has since been deleted.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationFeedRow>, sqlx::Error> {
        let filter = if unread_only {
            "AND n.is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT n.id, n.seller_id, n.subscription_id, n.item_id, \
                    n.title, n.body, n.is_read, n.read_at, n.delivered_at, \
                    n.email_sent_at, n.created_at, \
                    i.name AS item_name, i.item_status, \
                    i.languages AS item_languages, \
                    s.name AS subscription_name \
             FROM notifications n \
             LEFT JOIN items i ON i.id = n.item_id \
             LEFT JOIN subscriptions s ON s.id = n.subscription_id \
             WHERE n.seller_id = $1 {filter} \
             ORDER BY n.created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, NotificationFeedRow>(&query)
            .bind(seller_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Set the read flag on a seller's notification.
    ///
    /// Returns the updated row, or `None` if no row matched the
    /// (id, seller) pair.
    pub async fn set_read(
        pool: &PgPool,
        notification_id: DbId,
        seller_id: DbId,
        is_read: bool,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications \
             SET is_read = $3, \
                 read_at = CASE WHEN $3 THEN NOW() ELSE NULL END \
             WHERE id = $1 AND seller_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(notification_id)
            .bind(seller_id)
            .bind(is_read)
            .fetch_optional(pool)
            .await
    }

    /// Mark all of a seller's unread notifications as read.
    ///
    /// Returns the number of notifications that were marked.
    pub async fn mark_all_read(pool: &PgPool, seller_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE seller_id = $1 AND is_read = false",
        )
        .bind(seller_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count a seller's unread notifications.
    pub async fn unread_count(pool: &PgPool, seller_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE seller_id = $1 AND is_read = false",
        )
        .bind(seller_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Stamp `email_sent_at` after a confirmed email delivery.
    pub async fn stamp_email_sent(
        pool: &PgPool,
        notification_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE notifications SET email_sent_at = NOW() WHERE id = $1")
            .bind(notification_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
