//! Criteria normalization, signatures, and human-readable summaries.
//!
//! A subscription's criteria is a map from field name to expected value.
//! This module canonicalizes raw client input ([`sanitize`]), derives the
//! order-independent dedup key ([`signature`]), and renders display text
//! ([`humanize`] / [`summarize`]) for notification bodies and emails.
//!
//! Display resolution goes through the [`RelationResolver`] seam so the
//! core stays free of database dependencies.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{BoxError, DbId};

/// A sanitized criteria map. `BTreeMap` keeps keys sorted, which makes the
/// JSON signature stable regardless of input order.
pub type Criteria = BTreeMap<String, Value>;

// ---------------------------------------------------------------------------
// Sanitization & signature
// ---------------------------------------------------------------------------

/// Drop criteria entries that carry no constraint.
///
/// Removes keys whose value is `null` or a string that is empty after
/// trimming. Every other value (scalars, numbers, arrays, unknown keys)
/// passes through unchanged, so new filter fields do not require a code
/// change here.
pub fn sanitize(raw: &Value) -> Criteria {
    let Some(map) = raw.as_object() else {
        return Criteria::new();
    };

    map.iter()
        .filter(|(_, value)| match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Canonical signature for a criteria map.
///
/// Keys are already sorted by the `BTreeMap`; string values are trimmed
/// before encoding so incidental whitespace does not produce a distinct
/// signature. Two subscriptions of the same seller may never share one.
pub fn signature(criteria: &Criteria) -> String {
    let normalized: Criteria = criteria
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect();

    // BTreeMap serialization is deterministic; this cannot fail for JSON
    // values that were themselves deserialized from JSON.
    serde_json::to_string(&normalized).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Relation fields
// ---------------------------------------------------------------------------

/// The entity kinds a relation-typed criteria value can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Category,
    University,
    ErcPanel,
    ErcKeyword,
}

/// Registry of relation-typed criteria keys.
pub fn relation_kind(key: &str) -> Option<RelationKind> {
    match key {
        "category_id" => Some(RelationKind::Category),
        "university" => Some(RelationKind::University),
        "erc_panel" => Some(RelationKind::ErcPanel),
        "erc_keyword" => Some(RelationKind::ErcKeyword),
        _ => None,
    }
}

/// Extract a relation identifier from a criteria value.
///
/// Accepts a JSON number or a numeric string; anything else yields `None`.
pub fn relation_id(value: &Value) -> Option<DbId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolves a relation identifier to its display name.
///
/// Implemented over the database in `shelfwatch-db`; the dispatch engine
/// and handlers receive it as an explicit handle.
#[async_trait]
pub trait RelationResolver: Send + Sync {
    /// Returns `Ok(None)` when the entity does not exist. Errors are
    /// treated by callers as "fall back to the raw value".
    async fn resolve(&self, kind: RelationKind, id: DbId) -> Result<Option<String>, BoxError>;
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Human-readable label for a criteria key.
///
/// Unknown keys fall back to the key with underscores replaced by spaces.
pub fn display_label(key: &str) -> String {
    match key {
        "category_id" => "Category".to_string(),
        "university" => "University".to_string(),
        "item_status" => "Status".to_string(),
        "languages" => "Language".to_string(),
        "erc_area" => "ERC Area".to_string(),
        "erc_panel" => "ERC Panel".to_string(),
        "erc_keyword" => "ERC Keyword".to_string(),
        "start_date_from" => "Start date from".to_string(),
        "start_date_to" => "Start date to".to_string(),
        "end_date_from" => "End date from".to_string(),
        "end_date_to" => "End date to".to_string(),
        "expiration_from" => "Expiration from".to_string(),
        "expiration_to" => "Expiration to".to_string(),
        other => other.replace('_', " "),
    }
}

/// Render a criteria value as display text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Resolve a criteria map into `key -> display text`, looking relation
/// identifiers up through `resolver`.
///
/// Lookup failures fall back to the raw value; this function never errors
/// and is used only for display, never for matching or signatures.
pub async fn humanize(
    criteria: &Criteria,
    resolver: &dyn RelationResolver,
) -> BTreeMap<String, String> {
    let mut resolved = BTreeMap::new();

    for (key, value) in criteria {
        let raw = display_value(value);
        if raw.is_empty() {
            continue;
        }

        let display = match relation_kind(key).zip(relation_id(value)) {
            Some((kind, id)) => match resolver.resolve(kind, id).await {
                Ok(Some(name)) => name,
                Ok(None) | Err(_) => raw,
            },
            None => raw,
        };

        resolved.insert(key.clone(), display);
    }

    resolved
}

/// Join resolved criteria into a one-line summary: `Label: value | ...`.
pub fn summarize(resolved: &BTreeMap<String, String>) -> String {
    resolved
        .iter()
        .map(|(key, value)| format!("{}: {}", display_label(key), value))
        .collect::<Vec<_>>()
        .join(" | ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
