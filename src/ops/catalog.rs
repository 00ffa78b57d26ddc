//! Builds the ordered list of filter definitions offered on a view.

use serde::{Deserialize, Serialize};

use super::fields::{self, FieldSpec};
use crate::model::{FilterKind, PanelOptions, ViewType};

/// One filterable field as offered to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub key: String,
    pub label: String,
    pub kind: FilterKind,
    /// Which option catalog resolves this field's raw values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_key: Option<String>,
}

impl FilterDefinition {
    fn from_spec(spec: &FieldSpec, view: ViewType) -> FilterDefinition {
        FilterDefinition {
            key: spec.key.to_string(),
            label: spec.label.to_string(),
            kind: spec.kind,
            option_key: spec.option_key_for(view).map(str::to_string),
        }
    }
}

/// The ordered filter definitions available on a view.
///
/// Pure and stable: the same view and options always produce the same
/// definitions in the same (field table) order, so the add-filter list
/// never jitters across renders. A dropdown definition appears only when
/// its backing catalog is present and non-empty; text, date, number, and
/// flag definitions are gated by the corresponding [`PanelOptions`] toggle.
pub fn available_filters(view: ViewType, options: &PanelOptions) -> Vec<FilterDefinition> {
    fields::FIELDS
        .iter()
        .filter(|spec| spec.offered_on(view))
        .filter(|spec| included(spec, view, options))
        .map(|spec| FilterDefinition::from_spec(spec, view))
        .collect()
}

fn included(spec: &FieldSpec, view: ViewType, options: &PanelOptions) -> bool {
    if spec.is_flag() {
        return options.inactive_toggle;
    }
    match spec.kind {
        FilterKind::Dropdown => spec
            .option_key_for(view)
            .is_some_and(|key| options.catalogs.has(key)),
        FilterKind::Text => options.search,
        FilterKind::Date => options.date_filters,
        FilterKind::Number => options.hours_filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterOption;

    fn status_options() -> Vec<FilterOption> {
        vec![
            FilterOption::new(1, "Active"),
            FilterOption::new(2, "Completed"),
        ]
    }

    fn keys(defs: &[FilterDefinition]) -> Vec<&str> {
        defs.iter().map(|d| d.key.as_str()).collect()
    }

    #[test]
    fn test_empty_catalog_suppresses_definition() {
        let options = PanelOptions::new()
            .with_catalog("statuses", Vec::new())
            .with_catalog("priorities", vec![FilterOption::new(1, "High")]);
        let defs = available_filters(ViewType::Tasks, &options);
        assert_eq!(keys(&defs), vec!["priority_id"]);
    }

    #[test]
    fn test_tasks_offer_holder_and_created_by() {
        let users = vec![FilterOption::new(7, "Ada")];
        let options = PanelOptions::new().with_catalog("users", users);

        let task_defs = available_filters(ViewType::Tasks, &options);
        assert_eq!(
            keys(&task_defs),
            vec!["assignee_id", "holder_id", "created_by"]
        );

        let project_defs = available_filters(ViewType::Projects, &options);
        assert_eq!(keys(&project_defs), vec!["assignee_id"]);
    }

    #[test]
    fn test_parent_option_key_differs_per_view() {
        let options = PanelOptions::new()
            .with_catalog("tasks", vec![FilterOption::new(1, "Fix crash")])
            .with_catalog("projects", vec![FilterOption::new(1, "Launch")]);

        let task_defs = available_filters(ViewType::Tasks, &options);
        let parent = task_defs.iter().find(|d| d.key == "parent_id").unwrap();
        assert_eq!(parent.option_key.as_deref(), Some("tasks"));

        let project_defs = available_filters(ViewType::Projects, &options);
        let parent = project_defs.iter().find(|d| d.key == "parent_id").unwrap();
        assert_eq!(parent.option_key.as_deref(), Some("projects"));
    }

    #[test]
    fn test_toggles_gate_non_dropdown_kinds() {
        let defs = available_filters(ViewType::Tasks, &PanelOptions::new());
        assert!(defs.is_empty());

        let options = PanelOptions::new().with_search().with_date_filters();
        let defs = available_filters(ViewType::Tasks, &options);
        assert_eq!(
            keys(&defs),
            vec!["search", "start_date", "due_date", "created"]
        );
    }

    #[test]
    fn test_inactive_toggle_is_users_only() {
        let options = PanelOptions::new().with_inactive_toggle();
        let user_defs = available_filters(ViewType::Users, &options);
        assert_eq!(keys(&user_defs), vec!["is_inactive"]);
        assert!(available_filters(ViewType::Tasks, &options).is_empty());
    }

    #[test]
    fn test_hours_filter_is_time_logs_only() {
        let options = PanelOptions::new().with_hours_filter();
        let defs = available_filters(ViewType::TimeLogs, &options);
        assert_eq!(keys(&defs), vec!["min_hours", "max_hours"]);
        assert!(available_filters(ViewType::Users, &options).is_empty());
    }

    #[test]
    fn test_stable_order_matches_field_table() {
        let options = PanelOptions::new()
            .with_catalog("statuses", status_options())
            .with_catalog("priorities", vec![FilterOption::new(1, "High")])
            .with_search()
            .with_date_filters();
        let defs = available_filters(ViewType::Tasks, &options);
        assert_eq!(
            keys(&defs),
            vec![
                "search",
                "status_id",
                "priority_id",
                "start_date",
                "due_date",
                "created"
            ]
        );
        // Same input, same output
        assert_eq!(defs, available_filters(ViewType::Tasks, &options));
    }
}
