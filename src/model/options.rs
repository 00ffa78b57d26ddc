use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::filter::ParseError;

/// The list view a filter panel is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Tasks,
    Projects,
    Users,
    TimeLogs,
}

impl ViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewType::Tasks => "tasks",
            ViewType::Projects => "projects",
            ViewType::Users => "users",
            ViewType::TimeLogs => "time_logs",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<ViewType, ParseError> {
        match s {
            "tasks" => Ok(ViewType::Tasks),
            "projects" => Ok(ViewType::Projects),
            "users" => Ok(ViewType::Users),
            "time_logs" => Ok(ViewType::TimeLogs),
            _ => Err(ParseError::View(s.to_string())),
        }
    }
}

/// One entry of an option catalog, as delivered by the consumer's API calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub id: i64,
    pub name: String,
}

impl FilterOption {
    pub fn new(id: i64, name: impl Into<String>) -> FilterOption {
        FilterOption {
            id,
            name: name.into(),
        }
    }
}

/// Lookup tables resolving raw dropdown ids to display names
///
/// Keyed by catalog name (`statuses`, `priorities`, `users`, `projects`,
/// `roles`, `types`, `tasks`). The consumer fills these from its own
/// network calls; a missing or empty catalog suppresses the corresponding
/// filter definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionCatalogs(IndexMap<String, Vec<FilterOption>>);

impl OptionCatalogs {
    pub fn new() -> OptionCatalogs {
        OptionCatalogs::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, options: Vec<FilterOption>) {
        self.0.insert(key.into(), options);
    }

    pub fn get(&self, key: &str) -> Option<&[FilterOption]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Whether a catalog is present and non-empty
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|opts| !opts.is_empty())
    }

    /// Resolve a raw id to its display name.
    ///
    /// Ids are matched as strings so a number that round-tripped through a
    /// query string still finds its option. `None` means the caller should
    /// fall back to the raw value.
    pub fn resolve(&self, key: &str, raw: &str) -> Option<&str> {
        self.0
            .get(key)?
            .iter()
            .find(|opt| opt.id.to_string() == raw.trim())
            .map(|opt| opt.name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<FilterOption>)> for OptionCatalogs {
    fn from_iter<I: IntoIterator<Item = (K, Vec<FilterOption>)>>(iter: I) -> OptionCatalogs {
        OptionCatalogs(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// What the consuming view makes available to the filter panel: the option
/// catalogs plus the toggles gating the non-dropdown definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelOptions {
    #[serde(default)]
    pub catalogs: OptionCatalogs,
    /// Offer the free-text search filter
    #[serde(default)]
    pub search: bool,
    /// Offer the logical date filters (`start_date`, `due_date`, `created`)
    #[serde(default)]
    pub date_filters: bool,
    /// Offer the inactive-only flag (users view)
    #[serde(default)]
    pub inactive_toggle: bool,
    /// Offer the hours range fields (time logs view)
    #[serde(default)]
    pub hours_filter: bool,
}

impl PanelOptions {
    pub fn new() -> PanelOptions {
        PanelOptions::default()
    }

    pub fn with_catalog(mut self, key: impl Into<String>, options: Vec<FilterOption>) -> Self {
        self.catalogs.insert(key, options);
        self
    }

    pub fn with_search(mut self) -> Self {
        self.search = true;
        self
    }

    pub fn with_date_filters(mut self) -> Self {
        self.date_filters = true;
        self
    }

    pub fn with_inactive_toggle(mut self) -> Self {
        self.inactive_toggle = true;
        self
    }

    pub fn with_hours_filter(mut self) -> Self {
        self.hours_filter = true;
        self
    }
}
