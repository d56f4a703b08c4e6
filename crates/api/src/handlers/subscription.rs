//! Handlers for the `/subscriptions` resource.
//!
//! Sellers manage their saved alerts here. Every operation is scoped to
//! the authenticated seller; touching another seller's subscription is
//! forbidden, not merely hidden.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use shelfwatch_core::criteria::{self, Criteria};
use shelfwatch_core::error::CoreError;
use shelfwatch_core::paging;
use shelfwatch_core::types::DbId;
use shelfwatch_db::models::subscription::{NewSubscription, Subscription, SubscriptionChanges};
use shelfwatch_db::repositories::SubscriptionRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSeller;
use crate::query::PageParams;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /subscriptions`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    /// Raw criteria; sanitized server-side.
    pub criteria: serde_json::Value,
    #[serde(default = "default_notify")]
    pub notify_via_email: bool,
}

fn default_notify() -> bool {
    true
}

/// Wrap a present field (including an explicit `null`) in an outer
/// `Some`, so absence and `null` stay distinguishable after parsing.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Body for `PATCH /subscriptions/{id}`. Absent fields are untouched.
///
/// `description` distinguishes "absent" from "explicit null": sending
/// `"description": null` clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub notify_via_email: Option<bool>,
    pub is_active: Option<bool>,
    pub criteria: Option<serde_json::Value>,
}

/// A subscription row enriched with resolved, human-readable criteria.
#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub criteria_resolved: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/subscriptions
///
/// List the authenticated seller's subscriptions, newest first, with the
/// criteria resolved to display names. A failed resolution degrades to an
/// empty map; it never aborts the page.
pub async fn list_subscriptions(
    auth: AuthSeller,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PageResponse<SubscriptionView>>> {
    let page = paging::clamp_page(params.page);
    let page_size = paging::clamp_page_size(params.page_size);

    let subscriptions = SubscriptionRepo::list_for_seller(
        &state.pool,
        auth.seller_id,
        page_size,
        paging::offset(page, page_size),
    )
    .await?;

    let mut views = Vec::with_capacity(subscriptions.len());
    for subscription in subscriptions {
        let criteria_resolved = match stored_criteria(&subscription.criteria) {
            Some(criteria) => criteria::humanize(&criteria, state.resolver.as_ref()).await,
            None => BTreeMap::new(),
        };
        views.push(SubscriptionView {
            subscription,
            criteria_resolved,
        });
    }

    Ok(Json(PageResponse::new(views, page, page_size)))
}

/// POST /api/v1/subscriptions
///
/// Create a new alert. Rejected when the name is blank, the criteria
/// sanitize to nothing, or an identical criteria set already exists for
/// this seller.
pub async fn create_subscription(
    auth: AuthSeller,
    State(state): State<AppState>,
    Json(input): Json<CreateSubscriptionRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A name is required for your alert".into(),
        )));
    }

    let criteria = criteria::sanitize(&input.criteria);
    if criteria.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Select at least one filter to watch".into(),
        )));
    }

    let signature = criteria::signature(&criteria);
    if SubscriptionRepo::signature_exists(&state.pool, auth.seller_id, &signature).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "This alert already exists for your account".into(),
        )));
    }

    let subscription = SubscriptionRepo::create(
        &state.pool,
        &NewSubscription {
            seller_id: auth.seller_id,
            name: name.to_string(),
            description: input.description,
            criteria: serde_json::to_value(&criteria)
                .map_err(|e| AppError::InternalError(e.to_string()))?,
            criteria_signature: signature,
            notify_via_email: input.notify_via_email,
        },
    )
    .await?;

    tracing::info!(
        seller_id = auth.seller_id,
        subscription_id = subscription.id,
        "Subscription created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: subscription }),
    ))
}

/// PATCH /api/v1/subscriptions/{id}
///
/// Partially update a subscription. Changing the criteria re-sanitizes and
/// re-signs them; signature uniqueness is only enforced at create time.
pub async fn update_subscription(
    auth: AuthSeller,
    State(state): State<AppState>,
    Path(subscription_id): Path<DbId>,
    Json(input): Json<UpdateSubscriptionRequest>,
) -> AppResult<Json<DataResponse<Subscription>>> {
    verify_owner(&state, subscription_id, auth.seller_id).await?;

    let mut changes = SubscriptionChanges {
        description: input.description,
        notify_via_email: input.notify_via_email,
        is_active: input.is_active,
        ..Default::default()
    };

    if let Some(name) = input.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "A name is required for your alert".into(),
            )));
        }
        changes.name = Some(name);
    }

    if let Some(raw) = input.criteria {
        let criteria = criteria::sanitize(&raw);
        if criteria.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Subscriptions need at least one active filter".into(),
            )));
        }
        changes.criteria_signature = Some(criteria::signature(&criteria));
        changes.criteria = Some(
            serde_json::to_value(&criteria)
                .map_err(|e| AppError::InternalError(e.to_string()))?,
        );
    }

    let subscription =
        SubscriptionRepo::update(&state.pool, subscription_id, auth.seller_id, &changes)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Subscription",
                id: subscription_id,
            }))?;

    Ok(Json(DataResponse { data: subscription }))
}

/// DELETE /api/v1/subscriptions/{id}
///
/// Hard-delete a subscription. Notifications it produced keep their rows
/// with a nulled back-reference.
pub async fn delete_subscription(
    auth: AuthSeller,
    State(state): State<AppState>,
    Path(subscription_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    verify_owner(&state, subscription_id, auth.seller_id).await?;

    let deleted = SubscriptionRepo::delete(&state.pool, subscription_id, auth.seller_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: subscription_id,
        }));
    }

    tracing::info!(
        seller_id = auth.seller_id,
        subscription_id,
        "Subscription deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a subscription and verify ownership, distinguishing not-found
/// from forbidden.
async fn verify_owner(
    state: &AppState,
    subscription_id: DbId,
    seller_id: DbId,
) -> AppResult<()> {
    let existing = SubscriptionRepo::find_by_id(&state.pool, subscription_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subscription",
            id: subscription_id,
        }))?;

    if existing.seller_id != seller_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot modify this subscription".into(),
        )));
    }
    Ok(())
}

/// Decode stored criteria JSONB into the canonical map form.
fn stored_criteria(value: &serde_json::Value) -> Option<Criteria> {
    serde_json::from_value(value.clone()).ok()
}
