//! The alert dispatch engine.
//!
//! [`DispatchEngine`] consumes item-created events from the bus and, for
//! each active subscription, evaluates the item against the subscription's
//! criteria, records a notification idempotently, stamps the trigger
//! timestamp, and fires the best-effort email side channel.
//!
//! Failure isolation rules:
//! - an unloadable item aborts quietly (logged only);
//! - one subscription's failure never blocks the others;
//! - an email failure never rolls back the notification or the trigger
//!   timestamp, and leaves `email_sent_at` unset.

use std::sync::Arc;

use shelfwatch_core::criteria::{self, Criteria, RelationResolver};
use shelfwatch_core::matching;
use shelfwatch_core::types::{BoxError, DbId};
use shelfwatch_db::models::item::Item;
use shelfwatch_db::models::notification::NewNotification;
use shelfwatch_db::models::subscription::ActiveSubscription;
use shelfwatch_db::repositories::{ItemRepo, NotificationRepo, SubscriptionRepo};
use shelfwatch_db::DbPool;
use shelfwatch_events::delivery::email::{AlertEmail, EmailSender};
use shelfwatch_events::{CatalogEvent, ITEM_CREATED};
use tokio::sync::broadcast;

/// Fallback alert name when a subscription has neither a criteria summary
/// nor a usable name.
const DEFAULT_ALERT_NAME: &str = "Custom alert";

/// Evaluates new catalog items against all active subscriptions.
///
/// All collaborators are explicit construction-time handles; the engine
/// never reaches into ambient state.
pub struct DispatchEngine {
    pool: DbPool,
    resolver: Arc<dyn RelationResolver>,
    mailer: Option<Arc<dyn EmailSender>>,
    frontend_url: String,
}

impl DispatchEngine {
    pub fn new(
        pool: DbPool,
        resolver: Arc<dyn RelationResolver>,
        mailer: Option<Arc<dyn EmailSender>>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            resolver,
            mailer,
            frontend_url: frontend_url.into(),
        }
    }

    /// Run the main dispatch loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each
    /// item-created event. The loop exits when the channel is closed
    /// (i.e. the [`EventBus`](shelfwatch_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<CatalogEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if event.event_type != ITEM_CREATED {
                        continue;
                    }
                    self.handle_item_created(event.item_id).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Dispatch engine lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, dispatch engine shutting down");
                    break;
                }
            }
        }
    }

    /// Evaluate one newly created item against every active subscription.
    ///
    /// Never returns an error to the caller: an unloadable item or a
    /// failing subscription is logged and skipped. The next item arrival
    /// re-evaluates everything fresh; there is no retry queue.
    pub async fn handle_item_created(&self, item_id: DbId) {
        let item = match ItemRepo::find_by_id(&self.pool, item_id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                tracing::debug!(item_id, "Item vanished before dispatch, skipping");
                return;
            }
            Err(e) => {
                tracing::error!(item_id, error = %e, "Failed to load item for dispatch");
                return;
            }
        };

        let subscriptions = match SubscriptionRepo::list_active(&self.pool).await {
            Ok(subs) => subs,
            Err(e) => {
                tracing::error!(item_id, error = %e, "Failed to load active subscriptions");
                return;
            }
        };

        let snapshot = item.snapshot();

        for subscription in &subscriptions {
            let criteria = match stored_criteria(&subscription.criteria) {
                Some(criteria) => criteria,
                None => {
                    tracing::error!(
                        subscription_id = subscription.id,
                        "Stored criteria are not a JSON object, skipping"
                    );
                    continue;
                }
            };

            if !matching::matches(&snapshot, &criteria) {
                continue;
            }

            if let Err(e) = self.notify(subscription, &criteria, &item).await {
                tracing::error!(
                    subscription_id = subscription.id,
                    item_id = item.id,
                    error = %e,
                    "Failed to notify subscription"
                );
            }
        }
    }

    /// Record a notification for one matching subscription and fire the
    /// email side channel.
    async fn notify(
        &self,
        subscription: &ActiveSubscription,
        criteria: &Criteria,
        item: &Item,
    ) -> Result<(), BoxError> {
        let resolved = criteria::humanize(criteria, self.resolver.as_ref()).await;
        let summary = criteria::summarize(&resolved);

        let alert_name = if !summary.is_empty() {
            summary.clone()
        } else if !subscription.name.trim().is_empty() {
            subscription.name.clone()
        } else {
            DEFAULT_ALERT_NAME.to_string()
        };

        let (notification, created) = NotificationRepo::create_idempotent(
            &self.pool,
            &NewNotification {
                seller_id: subscription.seller_id,
                subscription_id: subscription.id,
                item_id: item.id,
                title: item.name.clone(),
                body: format!("This item matches your alert: {alert_name}."),
            },
        )
        .await?;

        // Already notified for this (subscription, item) pair; a retried
        // trigger must not re-stamp or re-email.
        if !created {
            return Ok(());
        }

        SubscriptionRepo::touch_last_triggered(&self.pool, subscription.id).await?;

        tracing::info!(
            subscription_id = subscription.id,
            item_id = item.id,
            notification_id = notification.id,
            "Notification created"
        );

        // Best-effort side channel, outside any transactional boundary.
        // The notification above stands whatever happens here.
        if subscription.notify_via_email {
            if let (Some(mailer), Some(to)) = (&self.mailer, &subscription.seller_email) {
                let email = AlertEmail {
                    to: to.clone(),
                    item_name: item.name.clone(),
                    item_status: item.item_status.clone(),
                    item_url: format!("{}items/{}", self.frontend_url, item.id),
                    subscription_name: alert_name,
                    criteria_summary: summary,
                };

                match mailer.send_alert(&email).await {
                    Ok(()) => {
                        NotificationRepo::stamp_email_sent(&self.pool, notification.id).await?;
                    }
                    Err(e) => {
                        tracing::error!(
                            notification_id = notification.id,
                            error = %e,
                            "Failed to send alert email"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

/// Decode stored criteria JSONB into the canonical map form.
fn stored_criteria(value: &serde_json::Value) -> Option<Criteria> {
    serde_json::from_value(value.clone()).ok()
}
