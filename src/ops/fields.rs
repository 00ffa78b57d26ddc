//! The static classification of every filter key the engine understands.
//!
//! Catalog, conversion, and display all read this one table, so the three
//! can never disagree about a field's kind, label, or option catalog.

use crate::model::{FilterKind, ViewType};

/// Where a field's raw values resolve to display names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    /// No catalog (text, date, number, and flag fields)
    None,
    /// One catalog regardless of view
    Catalog(&'static str),
    /// A different catalog per view (`parent_id`: tasks on the tasks view,
    /// projects on the projects view)
    PerView(&'static [(ViewType, &'static str)]),
}

/// Which side of a logical date field a wire key addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    From,
    To,
}

/// One row of the field table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
    pub source: OptionSource,
    pub views: &'static [ViewType],
    /// Fixed two-state display labels for boolean-flag fields
    pub flag_labels: Option<(&'static str, &'static str)>,
}

impl FieldSpec {
    pub fn offered_on(&self, view: ViewType) -> bool {
        self.views.contains(&view)
    }

    pub fn is_flag(&self) -> bool {
        self.flag_labels.is_some()
    }

    /// The catalog resolving this field's values on the given view
    pub fn option_key_for(&self, view: ViewType) -> Option<&'static str> {
        match self.source {
            OptionSource::None => None,
            OptionSource::Catalog(key) => Some(key),
            OptionSource::PerView(table) => table
                .iter()
                .find(|(v, _)| *v == view)
                .map(|(_, key)| *key),
        }
    }

    /// Every catalog this field may resolve through, in table order
    pub fn option_keys(&self) -> Vec<&'static str> {
        match self.source {
            OptionSource::None => Vec::new(),
            OptionSource::Catalog(key) => vec![key],
            OptionSource::PerView(table) => table.iter().map(|(_, key)| *key).collect(),
        }
    }

    /// Lower-bound wire key of a logical date field (`due_date_from`)
    pub fn wire_from(&self) -> String {
        format!("{}_from", self.key)
    }

    /// Upper-bound wire key of a logical date field (`due_date_to`)
    pub fn wire_to(&self) -> String {
        format!("{}_to", self.key)
    }
}

use ViewType::{Projects, Tasks, TimeLogs, Users};

const ALL_VIEWS: &[ViewType] = &[Tasks, Projects, Users, TimeLogs];
const TASK_VIEWS: &[ViewType] = &[Tasks];
const TASK_PROJECT_VIEWS: &[ViewType] = &[Tasks, Projects];
const USER_VIEWS: &[ViewType] = &[Users];
const TIME_LOG_VIEWS: &[ViewType] = &[TimeLogs];

const PARENT_SOURCES: &[(ViewType, &str)] = &[(Tasks, "tasks"), (Projects, "projects")];

/// The full field table, in the order definitions are offered to the user
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "search",
        label: "Search",
        kind: FilterKind::Text,
        source: OptionSource::None,
        views: ALL_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "status_id",
        label: "Status",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("statuses"),
        views: TASK_PROJECT_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "priority_id",
        label: "Priority",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("priorities"),
        views: TASK_PROJECT_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "type_id",
        label: "Type",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("types"),
        views: TASK_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "assignee_id",
        label: "Assignee",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("users"),
        views: TASK_PROJECT_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "holder_id",
        label: "Holder",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("users"),
        views: TASK_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "created_by",
        label: "Created By",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("users"),
        views: TASK_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "parent_id",
        label: "Parent",
        kind: FilterKind::Dropdown,
        source: OptionSource::PerView(PARENT_SOURCES),
        views: TASK_PROJECT_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "project_id",
        label: "Project",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("projects"),
        views: &[Tasks, TimeLogs],
        flag_labels: None,
    },
    FieldSpec {
        key: "user_id",
        label: "User",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("users"),
        views: TIME_LOG_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "task_id",
        label: "Task",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("tasks"),
        views: TIME_LOG_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "role_id",
        label: "Role",
        kind: FilterKind::Dropdown,
        source: OptionSource::Catalog("roles"),
        views: USER_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "is_inactive",
        label: "Inactive",
        kind: FilterKind::Dropdown,
        source: OptionSource::None,
        views: USER_VIEWS,
        flag_labels: Some(("Active", "Inactive")),
    },
    FieldSpec {
        key: "start_date",
        label: "Start Date",
        kind: FilterKind::Date,
        source: OptionSource::None,
        views: TASK_PROJECT_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "due_date",
        label: "Due Date",
        kind: FilterKind::Date,
        source: OptionSource::None,
        views: TASK_PROJECT_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "created",
        label: "Created",
        kind: FilterKind::Date,
        source: OptionSource::None,
        views: ALL_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "min_hours",
        label: "Min Hours",
        kind: FilterKind::Number,
        source: OptionSource::None,
        views: TIME_LOG_VIEWS,
        flag_labels: None,
    },
    FieldSpec {
        key: "max_hours",
        label: "Max Hours",
        kind: FilterKind::Number,
        source: OptionSource::None,
        views: TIME_LOG_VIEWS,
        flag_labels: None,
    },
];

/// Look up a field by its direct key
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

/// The logical date fields, in table order
pub fn date_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|spec| spec.kind == FilterKind::Date)
}

/// Map a wire key like `due_date_from` back to its logical date field
pub fn logical_date_for(wire_key: &str) -> Option<(&'static FieldSpec, DateBound)> {
    if let Some(logical) = wire_key.strip_suffix("_from") {
        if let Some(spec) = field_spec(logical).filter(|s| s.kind == FilterKind::Date) {
            return Some((spec, DateBound::From));
        }
    }
    if let Some(logical) = wire_key.strip_suffix("_to") {
        if let Some(spec) = field_spec(logical).filter(|s| s.kind == FilterKind::Date) {
            return Some((spec, DateBound::To));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        let spec = field_spec("status_id").unwrap();
        assert_eq!(spec.label, "Status");
        assert_eq!(spec.kind, FilterKind::Dropdown);
        assert!(field_spec("unknown_key").is_none());
    }

    #[test]
    fn test_wire_key_expansion() {
        let spec = field_spec("due_date").unwrap();
        assert_eq!(spec.wire_from(), "due_date_from");
        assert_eq!(spec.wire_to(), "due_date_to");
    }

    #[test]
    fn test_logical_date_round_trip() {
        let (spec, bound) = logical_date_for("due_date_from").unwrap();
        assert_eq!(spec.key, "due_date");
        assert_eq!(bound, DateBound::From);

        let (spec, bound) = logical_date_for("created_to").unwrap();
        assert_eq!(spec.key, "created");
        assert_eq!(bound, DateBound::To);

        // `created_by` is a dropdown, not a date expansion
        assert!(logical_date_for("created_by").is_none());
        assert!(logical_date_for("status_id").is_none());
    }

    #[test]
    fn test_parent_resolves_per_view() {
        let spec = field_spec("parent_id").unwrap();
        assert_eq!(spec.option_key_for(ViewType::Tasks), Some("tasks"));
        assert_eq!(spec.option_key_for(ViewType::Projects), Some("projects"));
        assert_eq!(spec.option_key_for(ViewType::Users), None);
    }

    #[test]
    fn test_task_only_fields() {
        for key in ["holder_id", "created_by"] {
            let spec = field_spec(key).unwrap();
            assert!(spec.offered_on(ViewType::Tasks));
            assert!(!spec.offered_on(ViewType::Projects));
        }
    }

    #[test]
    fn test_flag_field() {
        let spec = field_spec("is_inactive").unwrap();
        assert!(spec.is_flag());
        assert_eq!(spec.flag_labels, Some(("Active", "Inactive")));
        assert_eq!(spec.option_key_for(ViewType::Users), None);
    }

    #[test]
    fn test_date_fields_in_table_order() {
        let keys: Vec<_> = date_fields().map(|s| s.key).collect();
        assert_eq!(keys, vec!["start_date", "due_date", "created"]);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, spec) in FIELDS.iter().enumerate() {
            assert!(
                !FIELDS[i + 1..].iter().any(|other| other.key == spec.key),
                "duplicate field key: {}",
                spec.key
            );
        }
    }
}
