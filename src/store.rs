//! The per-view editing state for a filter panel.
//!
//! Each list view constructs and owns one [`FilterStore`], passed by
//! reference — never shared, never global — so simultaneous list views
//! cannot interfere. Edits stage in the store; nothing reaches the
//! consumer's applied map until [`FilterStore::apply_filters`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{ActiveFilter, AppliedFilterMap, Condition, FilterValue, IdGen, Operator};
use crate::ops::catalog::FilterDefinition;
use crate::ops::convert::{same_rows, to_active_filters, to_applied_map};

/// A partial update for one editing row
///
/// Only the populated parts are applied; the operator (when present)
/// switches first so the values land in the new shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_multi: Option<Vec<i64>>,
}

impl FilterPatch {
    pub fn new() -> FilterPatch {
        FilterPatch::default()
    }

    pub fn operator(mut self, op: Operator) -> Self {
        self.operator = Some(op);
        self
    }

    pub fn value(mut self, value: impl Into<FilterValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn value2(mut self, value: impl Into<FilterValue>) -> Self {
        self.value2 = Some(value.into());
        self
    }

    pub fn value_multi(mut self, values: Vec<i64>) -> Self {
        self.value_multi = Some(values);
        self
    }
}

/// Editing state for one view's filter panel: the staged rows plus the
/// panel's open/closed flag
#[derive(Debug, Default)]
pub struct FilterStore {
    active: Vec<ActiveFilter>,
    expanded: bool,
    ids: IdGen,
}

impl FilterStore {
    pub fn new() -> FilterStore {
        FilterStore::default()
    }

    /// A store whose initial rows are derived from an already-applied map
    /// (the mount path of a view restoring its query)
    pub fn from_applied(applied: &AppliedFilterMap) -> FilterStore {
        let mut ids = IdGen::new();
        let active = to_active_filters(applied, &mut ids);
        FilterStore {
            active,
            expanded: false,
            ids,
        }
    }

    pub fn active_filters(&self) -> &[ActiveFilter] {
        &self.active
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Stage a new row for a definition, with the kind's default operator
    /// and no value. Returns the new row's id.
    ///
    /// The applied map is untouched: an empty row must never trigger a
    /// parent re-fetch.
    pub fn add_filter(&mut self, def: &FilterDefinition) -> String {
        let id = self.ids.next_id();
        let condition = Condition::empty_for(Operator::default_for(def.kind));
        self.active
            .push(ActiveFilter::new(id.clone(), def.key.clone(), condition));
        trace!(field = %def.key, %id, "staged new filter row");
        id
    }

    /// Merge a patch into the row with the given id; unknown ids are
    /// ignored
    pub fn update_filter(&mut self, id: &str, patch: FilterPatch) {
        let Some(row) = self.active.iter_mut().find(|row| row.id == id) else {
            trace!(%id, "update for unknown filter row ignored");
            return;
        };
        if let Some(op) = patch.operator {
            row.condition = row.condition.clone().with_operator(op);
        }
        if let Some(value) = patch.value {
            apply_value(&mut row.condition, value);
        }
        if let Some(value2) = patch.value2 {
            apply_value2(&mut row.condition, value2);
        }
        if let Some(values) = patch.value_multi {
            apply_multi(&mut row.condition, values);
        }
    }

    /// Drop the row with the given id; unknown ids are ignored
    pub fn remove_filter(&mut self, id: &str) {
        self.active.retain(|row| row.id != id);
    }

    /// Clear all staged rows.
    ///
    /// Staged-only: no map is produced, so the consumer keeps its current
    /// results until the user applies.
    pub fn clear_filters(&mut self) {
        self.active.clear();
    }

    /// Flush the staged rows into an applied map for the consumer.
    ///
    /// This is the only operation that produces a map — the single point
    /// where the parent's source of truth is written.
    pub fn apply_filters(&self) -> AppliedFilterMap {
        let map = to_applied_map(&self.active);
        debug!(filters = map.len(), "applying staged filters");
        map
    }

    /// Re-derive the staged rows from an externally changed applied map.
    ///
    /// Runs on every render of the owning view, so it must be cheap and
    /// idempotent: structurally equal rows are kept untouched (same ids,
    /// same storage), and an empty map never clears a non-empty staged
    /// list — right after mount or clear, the map is empty while the user
    /// may already be typing into an unapplied row.
    pub fn reconcile(&mut self, applied: &AppliedFilterMap) {
        if applied.is_empty() && !self.active.is_empty() {
            trace!(
                staged = self.active.len(),
                "empty applied map, keeping staged rows"
            );
            return;
        }
        let next = to_active_filters(applied, &mut self.ids);
        if same_rows(&self.active, &next) {
            trace!("applied map matches staged rows, keeping");
            return;
        }
        debug!(
            before = self.active.len(),
            after = next.len(),
            "replacing staged rows from applied map"
        );
        self.active = next;
    }
}

fn apply_value(condition: &mut Condition, value: FilterValue) {
    match condition {
        Condition::From { value: slot } | Condition::To { value: slot } => {
            *slot = non_empty_string(value);
        }
        Condition::Between { from, .. } => {
            *from = non_empty_string(value);
        }
        Condition::Is { value: slot } | Condition::Equals { value: slot } => {
            *slot = Some(value);
        }
        Condition::Includes { values } | Condition::Excludes { values } => {
            // A single value arriving on a multi-select row replaces the set
            *values = value.as_i64().map(|n| vec![n]).unwrap_or_default();
        }
        Condition::Contains { text } => {
            *text = value.to_string();
        }
    }
}

fn apply_value2(condition: &mut Condition, value: FilterValue) {
    match condition {
        Condition::Between { to, .. } => {
            *to = non_empty_string(value);
        }
        Condition::To { value: slot } => {
            *slot = non_empty_string(value);
        }
        // value2 is meaningless for single-value shapes
        _ => {}
    }
}

fn apply_multi(condition: &mut Condition, new_values: Vec<i64>) {
    match condition {
        Condition::Includes { values } | Condition::Excludes { values } => {
            *values = new_values;
        }
        _ => {}
    }
}

fn non_empty_string(value: FilterValue) -> Option<String> {
    let s = value.to_string();
    if s.is_empty() { None } else { Some(s) }
}
