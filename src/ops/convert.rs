//! Bidirectional conversion between the wire-shaped applied filter map and
//! the per-row editing model.
//!
//! Both directions are total: no input map can make `to_active_filters`
//! fail, and unknown keys pass through as plain `equals` rows rather than
//! being dropped, so a user-set filter never silently disappears. After one
//! full cycle the conversion is idempotent — converting a map produced by
//! [`to_applied_map`] back and forth yields an equal map.

use std::collections::HashSet;

use super::fields;
use crate::model::{ActiveFilter, AppliedFilterMap, Condition, FilterKind, FilterValue, IdGen};

/// Derive the editing rows for an applied map.
///
/// Rows come out in map order; the two wire keys of a logical date field
/// collapse into a single row at the position of whichever key appears
/// first. Every row gets a fresh id from `ids`.
pub fn to_active_filters(map: &AppliedFilterMap, ids: &mut IdGen) -> Vec<ActiveFilter> {
    let mut rows = Vec::new();
    let mut consumed: HashSet<String> = HashSet::new();

    for (key, value) in map.iter() {
        if consumed.contains(key.as_str()) {
            continue;
        }

        if let Some((spec, _)) = fields::logical_date_for(key) {
            let from = non_empty_text(map.get(&spec.wire_from()));
            let to = non_empty_text(map.get(&spec.wire_to()));
            consumed.insert(spec.wire_from());
            consumed.insert(spec.wire_to());

            let condition = match (from, to) {
                (Some(from), Some(to)) => Condition::Between {
                    from: Some(from),
                    to: Some(to),
                },
                (Some(from), None) => Condition::From { value: Some(from) },
                (None, Some(to)) => Condition::To { value: Some(to) },
                (None, None) => continue,
            };
            rows.push(ActiveFilter::new(ids.next_id(), spec.key, condition));
            continue;
        }

        if value.is_falsy() {
            continue;
        }

        let condition = match fields::field_spec(key) {
            Some(spec) if spec.is_flag() => Condition::Is {
                value: Some(value.clone()),
            },
            Some(spec) if spec.kind == FilterKind::Dropdown => match split_ids(value) {
                // Even a single value becomes a multi-select row, so the
                // editor's dropdown shows the selection
                Some(values) => Condition::Includes { values },
                // A value that isn't ids at all degrades to a plain `is`
                // row carrying the raw value
                None => Condition::Is {
                    value: Some(value.clone()),
                },
            },
            Some(spec) if spec.kind == FilterKind::Text => Condition::Contains {
                text: value.to_string(),
            },
            Some(spec) if spec.kind == FilterKind::Number => Condition::Equals {
                value: Some(value.clone()),
            },
            // Unknown keys (and a bare logical date key, which has no wire
            // meaning) pass through untouched
            _ => Condition::Equals {
                value: Some(value.clone()),
            },
        };
        rows.push(ActiveFilter::new(ids.next_id(), key.clone(), condition));
    }

    rows
}

/// Flatten the editing rows back into the wire map.
///
/// Rows with no meaningful value contribute nothing; `excludes` rows
/// contribute nothing either, because the wire format has no negation.
pub fn to_applied_map(rows: &[ActiveFilter]) -> AppliedFilterMap {
    let mut map = AppliedFilterMap::new();

    for row in rows {
        match &row.condition {
            Condition::From { value } => {
                if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                    map.insert(date_wire_from(&row.field), v);
                }
            }
            Condition::To { value } => {
                if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                    map.insert(date_wire_to(&row.field), v);
                }
            }
            Condition::Between { from, to } => {
                if let Some(v) = from.as_deref().filter(|v| !v.is_empty()) {
                    map.insert(date_wire_from(&row.field), v);
                }
                if let Some(v) = to.as_deref().filter(|v| !v.is_empty()) {
                    map.insert(date_wire_to(&row.field), v);
                }
            }
            Condition::Is { value } | Condition::Equals { value } => {
                if let Some(v) = value.as_ref().filter(|v| !v.is_falsy()) {
                    map.insert(row.field.clone(), coerce_numeric(v));
                }
            }
            Condition::Includes { values } => match values.as_slice() {
                [] => {}
                [single] => map.insert(row.field.clone(), *single),
                many => map.insert(
                    row.field.clone(),
                    many.iter()
                        .map(i64::to_string)
                        .collect::<Vec<_>>()
                        .join(","),
                ),
            },
            Condition::Excludes { .. } => {}
            Condition::Contains { text } => {
                if !text.is_empty() {
                    map.insert(row.field.clone(), text.as_str());
                }
            }
        }
    }

    map
}

/// Field-by-field comparison of two row lists, ignoring ids
pub fn same_rows(a: &[ActiveFilter], b: &[ActiveFilter]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_eq(y))
}

fn non_empty_text(value: Option<&FilterValue>) -> Option<String> {
    value
        .filter(|v| !v.is_falsy())
        .map(|v| v.to_string())
}

/// Comma-joined or single dropdown value as ids; `None` when any part
/// fails to parse
fn split_ids(value: &FilterValue) -> Option<Vec<i64>> {
    match value {
        FilterValue::Number(n) => Some(vec![*n]),
        FilterValue::Text(s) => s
            .split(',')
            .map(|part| part.trim().parse::<i64>().ok())
            .collect(),
        FilterValue::Flag(_) | FilterValue::Float(_) => None,
    }
}

fn coerce_numeric(value: &FilterValue) -> FilterValue {
    match value.as_i64() {
        Some(n) => FilterValue::Number(n),
        None => value.clone(),
    }
}

fn date_wire_from(field: &str) -> String {
    format!("{field}_from")
}

fn date_wire_to(field: &str) -> String {
    format!("{field}_to")
}
