//! Renders filter rows and applied maps as human-readable label/value
//! pairs, resolving dropdown ids through the option catalogs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::convert::to_active_filters;
use super::fields::{self, FieldSpec};
use crate::model::{ActiveFilter, AppliedFilterMap, Condition, FilterValue, IdGen, OptionCatalogs};

/// A derived, read-only chip for one applied filter
///
/// Never mutated in place — always recomputed from the applied map and the
/// current catalogs. The id is the field key, which is unique within a map
/// and stable across recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedFilterChip {
    pub id: String,
    pub field: String,
    pub label: String,
    pub value: String,
}

/// Label/value pair for one in-progress editing row
pub fn format_active(row: &ActiveFilter, catalogs: &OptionCatalogs) -> AppliedFilterChip {
    AppliedFilterChip {
        id: row.id.clone(),
        field: row.field.clone(),
        label: field_label(&row.field),
        value: display_value(&row.field, &row.condition, catalogs),
    }
}

/// Chips for every non-empty filter in an applied map
pub fn format_applied(map: &AppliedFilterMap, catalogs: &OptionCatalogs) -> Vec<AppliedFilterChip> {
    let mut ids = IdGen::new();
    to_active_filters(map, &mut ids)
        .into_iter()
        .filter(|row| !row.is_empty())
        .map(|row| AppliedFilterChip {
            id: row.field.clone(),
            field: row.field.clone(),
            label: field_label(&row.field),
            value: display_value(&row.field, &row.condition, catalogs),
        })
        .collect()
}

fn field_label(field: &str) -> String {
    match fields::field_spec(field) {
        Some(spec) => spec.label.to_string(),
        None => field.to_string(),
    }
}

fn display_value(field: &str, condition: &Condition, catalogs: &OptionCatalogs) -> String {
    let spec = fields::field_spec(field);
    match condition {
        Condition::Between { from, to } => match (from.as_deref(), to.as_deref()) {
            (Some(from), Some(to)) => format!("{} – {}", fmt_date(from), fmt_date(to)),
            (Some(from), None) => fmt_date(from),
            (None, Some(to)) => fmt_date(to),
            (None, None) => String::new(),
        },
        Condition::From { value } | Condition::To { value } => {
            value.as_deref().map(fmt_date).unwrap_or_default()
        }
        Condition::Includes { values } | Condition::Excludes { values } => values
            .iter()
            .map(|id| resolve(spec, catalogs, &id.to_string()))
            .collect::<Vec<_>>()
            .join(", "),
        Condition::Is { value: Some(value) } => {
            if let Some((off, on)) = spec.and_then(|s| s.flag_labels) {
                // Flag fields show their fixed two-state labels, never 0/1
                if value.is_falsy() { off } else { on }.to_string()
            } else {
                resolve(spec, catalogs, &value.to_string())
            }
        }
        Condition::Is { value: None } => String::new(),
        Condition::Equals { value } => value.as_ref().map(FilterValue::to_string).unwrap_or_default(),
        Condition::Contains { text } => text.clone(),
    }
}

/// Resolve a raw dropdown value through the field's catalog(s); stale or
/// unknown ids fall back to the raw string
fn resolve(spec: Option<&FieldSpec>, catalogs: &OptionCatalogs, raw: &str) -> String {
    if let Some(spec) = spec {
        for key in spec.option_keys() {
            if let Some(name) = catalogs.resolve(key, raw) {
                return name.to_string();
            }
        }
    }
    raw.to_string()
}

/// Dates render in canonical `YYYY-MM-DD` form when they parse; anything
/// else passes through untouched
fn fmt_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}
