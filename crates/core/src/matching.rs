//! The criteria comparator registry.
//!
//! Decides whether one catalog item satisfies one criteria map. Each known
//! field name maps to a [`FieldRule`] variant; adding a filterable field is
//! a new registry entry in [`rule_for`], not a new conditional branch.
//!
//! Matching is fail-closed: a constraint whose item-side value is missing
//! or unparseable evaluates to `false`. An empty or absent expected value
//! is always satisfied, so a subscription with zero constraints matches
//! every new item.

use chrono::NaiveDate;
use serde_json::Value;

use crate::criteria::{relation_id, relation_kind, Criteria, RelationKind};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// ItemSnapshot
// ---------------------------------------------------------------------------

/// The matchable projection of a catalog item.
///
/// Kept as a plain struct so matching stays independent of the persistence
/// layer; `shelfwatch-db` converts its `Item` row into one of these.
#[derive(Debug, Clone, Default)]
pub struct ItemSnapshot {
    pub name: Option<String>,
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

impl ItemSnapshot {
    fn relation(&self, kind: RelationKind) -> Option<DbId> {
        match kind {
            RelationKind::Category => self.category_id,
            RelationKind::University => self.university_id,
            RelationKind::ErcPanel => self.erc_panel_id,
            RelationKind::ErcKeyword => self.erc_keyword_id,
        }
    }

    fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::StartDate => self.start_date,
            DateField::EndDate => self.end_date,
            DateField::Expiration => self.expiration,
        }
    }

    /// Named access to textual fields, used by the exact-equality and
    /// fallback rules. Returns `None` for keys that are not item fields.
    fn text_field(&self, key: &str) -> Option<&str> {
        let field = match key {
            "name" => &self.name,
            "description" => &self.description,
            "learning_outcomes" => &self.learning_outcomes,
            "speakers" => &self.speakers,
            "pedagogical_objectives" => &self.pedagogical_objectives,
            "level_of_study" => &self.level_of_study,
            "seller_name" => &self.seller_name,
            "multimedial_material_provided" => &self.multimedial_material_provided,
            "item_status" => &self.item_status,
            "erc_area" => &self.erc_area,
            "languages" => &self.languages,
            _ => return None,
        };
        field.as_deref()
    }
}

/// Fields scanned by the free-text `search` rule.
const SEARCHABLE_FIELDS: &[&str] = &[
    "name",
    "description",
    "learning_outcomes",
    "speakers",
    "pedagogical_objectives",
    "level_of_study",
    "seller_name",
    "multimedial_material_provided",
];

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// The item date column a `<x>_from` / `<x>_to` threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    StartDate,
    EndDate,
    Expiration,
}

/// How one criteria field is compared against an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Item's relation identifier equals the expected identifier.
    Relation(RelationKind),
    /// Case-sensitive string equality (`item_status`, `erc_area`).
    Exact,
    /// Case-insensitive substring containment (`languages`).
    Substring,
    /// Expected term appears in any of [`SEARCHABLE_FIELDS`].
    FreeText,
    /// Item date must be on or after the threshold.
    DateFrom(DateField),
    /// Item date must be on or before the threshold.
    DateTo(DateField),
}

/// The field-name registry. Unrecognized keys get the fallback rule
/// (case-insensitive equality against the named item field).
pub fn rule_for(key: &str) -> Option<FieldRule> {
    if let Some(kind) = relation_kind(key) {
        return Some(FieldRule::Relation(kind));
    }

    match key {
        "item_status" | "erc_area" => Some(FieldRule::Exact),
        "languages" => Some(FieldRule::Substring),
        "search" => Some(FieldRule::FreeText),
        "start_date_from" => Some(FieldRule::DateFrom(DateField::StartDate)),
        "start_date_to" => Some(FieldRule::DateTo(DateField::StartDate)),
        "end_date_from" => Some(FieldRule::DateFrom(DateField::EndDate)),
        "end_date_to" => Some(FieldRule::DateTo(DateField::EndDate)),
        "expiration_from" => Some(FieldRule::DateFrom(DateField::Expiration)),
        "expiration_to" => Some(FieldRule::DateTo(DateField::Expiration)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate a full criteria map against an item.
///
/// Every key must evaluate `true`; an empty criteria map matches
/// unconditionally ("notify me about all new items").
pub fn matches(item: &ItemSnapshot, criteria: &Criteria) -> bool {
    criteria.iter().all(|(key, expected)| {
        // An empty expected value is "don't care".
        if is_blank(expected) {
            return true;
        }

        match rule_for(key) {
            Some(rule) => evaluate(rule, key, item, expected),
            None => fallback_matches(item, key, expected),
        }
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn evaluate(rule: FieldRule, key: &str, item: &ItemSnapshot, expected: &Value) -> bool {
    match rule {
        FieldRule::Relation(kind) => match (item.relation(kind), relation_id(expected)) {
            (Some(actual), Some(wanted)) => actual == wanted,
            _ => false,
        },
        FieldRule::Exact => match (item.text_field(key), expected.as_str()) {
            (Some(actual), Some(wanted)) => actual == wanted,
            _ => false,
        },
        FieldRule::Substring => match (item.text_field(key), expected.as_str()) {
            (Some(actual), Some(wanted)) => {
                actual.to_lowercase().contains(&wanted.to_lowercase())
            }
            _ => false,
        },
        FieldRule::FreeText => {
            let Some(term) = expected.as_str() else {
                return false;
            };
            let term = term.to_lowercase();
            SEARCHABLE_FIELDS.iter().any(|field| {
                item.text_field(field)
                    .is_some_and(|value| value.to_lowercase().contains(&term))
            })
        }
        FieldRule::DateFrom(field) => match (item.date(field), parse_threshold(expected)) {
            (Some(actual), Some(threshold)) => actual >= threshold,
            _ => false,
        },
        FieldRule::DateTo(field) => match (item.date(field), parse_threshold(expected)) {
            (Some(actual), Some(threshold)) => actual <= threshold,
            _ => false,
        },
    }
}

/// Fallback for unrecognized keys: case-insensitive equality against the
/// named item field. A missing item value never matches.
fn fallback_matches(item: &ItemSnapshot, key: &str, expected: &Value) -> bool {
    match (item.text_field(key), expected.as_str()) {
        (Some(actual), Some(wanted)) => actual.eq_ignore_ascii_case(wanted),
        // The fallback only sees textual item fields; dates and relation
        // ids have registry entries under their criteria key names, and a
        // key naming anything else fails closed.
        _ => false,
    }
}

/// Parse a date threshold from a criteria value.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 date-time. Unparseable input yields
/// `None`, which fails the constraint rather than matching spuriously.
fn parse_threshold(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::sanitize;
    use serde_json::json;

    fn item() -> ItemSnapshot {
        ItemSnapshot {
            name: Some("Quantum Computing Summer School".to_string()),
            description: Some("An introduction to quantum algorithms".to_string()),
            speakers: Some("Prof. Rossi".to_string()),
            item_status: Some("published".to_string()),
            erc_area: Some("PE".to_string()),
            languages: Some("English, Italian".to_string()),
            category_id: Some(7),
            university_id: Some(3),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 12),
            expiration: NaiveDate::from_ymd_opt(2026, 8, 1),
            ..Default::default()
        }
    }

    #[test]
    fn empty_criteria_matches_everything() {
        assert!(matches(&item(), &Criteria::new()));
        assert!(matches(&ItemSnapshot::default(), &Criteria::new()));
    }

    #[test]
    fn blank_expected_values_are_dont_care() {
        let criteria = {
            let mut c = Criteria::new();
            c.insert("languages".to_string(), json!("   "));
            c.insert("erc_area".to_string(), Value::Null);
            c
        };
        assert!(matches(&item(), &criteria));
    }

    #[test]
    fn relation_matches_on_equal_identifier() {
        assert!(matches(&item(), &sanitize(&json!({ "category_id": 7 }))));
        assert!(matches(&item(), &sanitize(&json!({ "category_id": "7" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "category_id": 8 }))));
    }

    #[test]
    fn relation_fails_closed_when_item_side_is_missing() {
        // No erc_panel on the item: constraint cannot be satisfied.
        assert!(!matches(&item(), &sanitize(&json!({ "erc_panel": 1 }))));
    }

    #[test]
    fn exact_rule_is_case_sensitive() {
        assert!(matches(&item(), &sanitize(&json!({ "item_status": "published" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "item_status": "Published" }))));
        assert!(matches(&item(), &sanitize(&json!({ "erc_area": "PE" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "erc_area": "pe" }))));
    }

    #[test]
    fn languages_is_case_insensitive_containment() {
        assert!(matches(&item(), &sanitize(&json!({ "languages": "english" }))));
        assert!(matches(&item(), &sanitize(&json!({ "languages": "ITALIAN" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "languages": "french" }))));
    }

    #[test]
    fn search_scans_all_text_fields() {
        assert!(matches(&item(), &sanitize(&json!({ "search": "quantum" }))));
        assert!(matches(&item(), &sanitize(&json!({ "search": "rossi" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "search": "biology" }))));
    }

    #[test]
    fn search_does_not_scan_status_or_area() {
        assert!(!matches(&item(), &sanitize(&json!({ "search": "published" }))));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let c = sanitize(&json!({ "start_date_from": "2026-09-01" }));
        assert!(matches(&item(), &c));

        let c = sanitize(&json!({ "start_date_from": "2026-09-02" }));
        assert!(!matches(&item(), &c));

        let c = sanitize(&json!({ "end_date_to": "2026-09-12" }));
        assert!(matches(&item(), &c));

        let c = sanitize(&json!({ "end_date_to": "2026-09-11" }));
        assert!(!matches(&item(), &c));

        let c = sanitize(&json!({ "expiration_to": "2026-08-01" }));
        assert!(matches(&item(), &c));
    }

    #[test]
    fn malformed_dates_fail_closed() {
        assert!(!matches(&item(), &sanitize(&json!({ "start_date_from": "soon" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "start_date_from": 20260901 }))));
    }

    #[test]
    fn date_constraint_fails_when_item_date_is_missing() {
        let mut no_dates = item();
        no_dates.start_date = None;
        assert!(!matches(
            &no_dates,
            &sanitize(&json!({ "start_date_from": "2026-01-01" }))
        ));
    }

    #[test]
    fn rfc3339_thresholds_are_accepted() {
        let c = sanitize(&json!({ "start_date_from": "2026-09-01T00:00:00Z" }));
        assert!(matches(&item(), &c));
    }

    #[test]
    fn unknown_key_falls_back_to_case_insensitive_equality() {
        assert!(matches(&item(), &sanitize(&json!({ "erc_area": "PE" }))));
        // Fallback path: "speakers" is not in the registry.
        assert!(matches(&item(), &sanitize(&json!({ "speakers": "prof. rossi" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "speakers": "someone else" }))));
    }

    #[test]
    fn unknown_key_with_no_item_value_never_matches() {
        assert!(!matches(&item(), &sanitize(&json!({ "venue": "Milan" }))));
    }

    #[test]
    fn unknown_key_naming_a_non_textual_column_fails_closed() {
        // "end_date" is not a criteria key (only end_date_from/_to are);
        // the fallback cannot read the date column and must not match.
        assert!(!matches(&item(), &sanitize(&json!({ "end_date": "2026-09-12" }))));
        assert!(!matches(&item(), &sanitize(&json!({ "university_id": 3 }))));
    }

    #[test]
    fn all_keys_must_match() {
        let c = sanitize(&json!({ "languages": "english", "erc_area": "LS" }));
        assert!(!matches(&item(), &c));

        let c = sanitize(&json!({ "languages": "english", "erc_area": "PE" }));
        assert!(matches(&item(), &c));
    }
}
