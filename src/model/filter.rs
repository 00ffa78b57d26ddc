use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value::FilterValue;

/// Error for the string-parsing seams of the model types
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unknown operator: {0}")]
    Operator(String),
    #[error("unknown filter kind: {0}")]
    Kind(String),
    #[error("unknown view type: {0}")]
    View(String),
}

/// The value kind of a filterable field, which determines the legal
/// operators and how values are typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Date,
    Dropdown,
    Number,
    Text,
}

impl FilterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Date => "date",
            FilterKind::Dropdown => "dropdown",
            FilterKind::Number => "number",
            FilterKind::Text => "text",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<FilterKind, ParseError> {
        match s {
            "date" => Ok(FilterKind::Date),
            "dropdown" => Ok(FilterKind::Dropdown),
            "number" => Ok(FilterKind::Number),
            "text" => Ok(FilterKind::Text),
            _ => Err(ParseError::Kind(s.to_string())),
        }
    }
}

/// A comparison operator on one editing row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    From,
    To,
    Between,
    Is,
    Includes,
    Excludes,
    Equals,
    Contains,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::From => "from",
            Operator::To => "to",
            Operator::Between => "between",
            Operator::Is => "is",
            Operator::Includes => "includes",
            Operator::Excludes => "excludes",
            Operator::Equals => "equals",
            Operator::Contains => "contains",
        }
    }

    /// The operator a freshly added row of this kind starts with
    pub fn default_for(kind: FilterKind) -> Operator {
        match kind {
            FilterKind::Date => Operator::From,
            FilterKind::Dropdown => Operator::Is,
            FilterKind::Number => Operator::Equals,
            FilterKind::Text => Operator::Contains,
        }
    }

    pub fn legal_for(self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Date => {
                matches!(self, Operator::From | Operator::To | Operator::Between)
            }
            FilterKind::Dropdown => {
                matches!(self, Operator::Is | Operator::Includes | Operator::Excludes)
            }
            FilterKind::Number => matches!(self, Operator::Equals),
            FilterKind::Text => matches!(self, Operator::Contains),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Operator, ParseError> {
        match s {
            "from" => Ok(Operator::From),
            "to" => Ok(Operator::To),
            "between" => Ok(Operator::Between),
            "is" => Ok(Operator::Is),
            "includes" => Ok(Operator::Includes),
            "excludes" => Ok(Operator::Excludes),
            "equals" => Ok(Operator::Equals),
            "contains" => Ok(Operator::Contains),
            _ => Err(ParseError::Operator(s.to_string())),
        }
    }
}

/// The operator-shaped value of one editing row
///
/// One variant per operator, each carrying exactly the fields that operator
/// needs, so a row can never hold a value family its operator doesn't use.
/// A variant with no value yet (`From { value: None }`, an empty `Includes`)
/// is a row the user just added; it contributes nothing to the applied map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "lowercase")]
pub enum Condition {
    From {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    To {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// A partial between (one bound set) contributes only that bound
    Between {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
    Is {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<FilterValue>,
    },
    Includes {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        values: Vec<i64>,
    },
    /// Accepted by the editor but not representable in the wire format:
    /// `to_applied_map` drops these rows entirely
    Excludes {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        values: Vec<i64>,
    },
    Equals {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<FilterValue>,
    },
    Contains {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        text: String,
    },
}

impl Condition {
    /// The valueless variant a freshly added row starts with
    pub fn empty_for(op: Operator) -> Condition {
        match op {
            Operator::From => Condition::From { value: None },
            Operator::To => Condition::To { value: None },
            Operator::Between => Condition::Between {
                from: None,
                to: None,
            },
            Operator::Is => Condition::Is { value: None },
            Operator::Includes => Condition::Includes { values: Vec::new() },
            Operator::Excludes => Condition::Excludes { values: Vec::new() },
            Operator::Equals => Condition::Equals { value: None },
            Operator::Contains => Condition::Contains {
                text: String::new(),
            },
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Condition::From { .. } => Operator::From,
            Condition::To { .. } => Operator::To,
            Condition::Between { .. } => Operator::Between,
            Condition::Is { .. } => Operator::Is,
            Condition::Includes { .. } => Operator::Includes,
            Condition::Excludes { .. } => Operator::Excludes,
            Condition::Equals { .. } => Operator::Equals,
            Condition::Contains { .. } => Operator::Contains,
        }
    }

    /// Whether this row carries no meaningful value yet
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::From { value } | Condition::To { value } => {
                value.as_deref().is_none_or(str::is_empty)
            }
            Condition::Between { from, to } => {
                from.as_deref().is_none_or(str::is_empty)
                    && to.as_deref().is_none_or(str::is_empty)
            }
            Condition::Is { value } | Condition::Equals { value } => {
                value.as_ref().is_none_or(FilterValue::is_falsy)
            }
            Condition::Includes { values } | Condition::Excludes { values } => values.is_empty(),
            Condition::Contains { text } => text.is_empty(),
        }
    }

    /// Primary value as a wire string, for structural comparison
    pub fn value_str(&self) -> Option<String> {
        match self {
            Condition::From { value } | Condition::To { value } => value.clone(),
            Condition::Between { from, .. } => from.clone(),
            Condition::Is { value } | Condition::Equals { value } => {
                value.as_ref().map(|v| v.to_string())
            }
            Condition::Contains { text } if !text.is_empty() => Some(text.clone()),
            Condition::Contains { .. } => None,
            Condition::Includes { .. } | Condition::Excludes { .. } => None,
        }
    }

    /// Secondary value (the upper bound of a between), for comparison
    pub fn value2_str(&self) -> Option<String> {
        match self {
            Condition::Between { to, .. } => to.clone(),
            _ => None,
        }
    }

    /// The multi-value set, where the operator carries one
    pub fn multi(&self) -> Option<&[i64]> {
        match self {
            Condition::Includes { values } | Condition::Excludes { values } => Some(values),
            _ => None,
        }
    }

    /// Switch this row to another operator, normalizing the value shape.
    ///
    /// Whatever survives the transition carries over: a single value seeds a
    /// multi-select, a multi-select collapses to its first element, a lone
    /// date bound becomes the matching side of a between.
    pub fn with_operator(self, op: Operator) -> Condition {
        if self.operator() == op {
            return self;
        }
        match op {
            Operator::From => {
                let value = match self {
                    Condition::To { value } => value,
                    Condition::Between { from, to } => from.or(to),
                    _ => None,
                };
                Condition::From { value }
            }
            Operator::To => {
                let value = match self {
                    Condition::From { value } => value,
                    Condition::Between { from, to } => to.or(from),
                    _ => None,
                };
                Condition::To { value }
            }
            Operator::Between => match self {
                Condition::From { value } => Condition::Between {
                    from: value,
                    to: None,
                },
                Condition::To { value } => Condition::Between {
                    from: None,
                    to: value,
                },
                _ => Condition::Between {
                    from: None,
                    to: None,
                },
            },
            Operator::Is => {
                let value = match self {
                    Condition::Includes { values } | Condition::Excludes { values } => {
                        values.first().map(|n| FilterValue::Number(*n))
                    }
                    Condition::Equals { value } => value,
                    Condition::Is { value } => value,
                    _ => None,
                };
                Condition::Is { value }
            }
            Operator::Includes | Operator::Excludes => {
                let values = match self {
                    Condition::Includes { values } | Condition::Excludes { values } => values,
                    Condition::Is { value } | Condition::Equals { value } => {
                        value.and_then(|v| v.as_i64()).map(|n| vec![n]).unwrap_or_default()
                    }
                    _ => Vec::new(),
                };
                if op == Operator::Includes {
                    Condition::Includes { values }
                } else {
                    Condition::Excludes { values }
                }
            }
            Operator::Equals => {
                let value = match self {
                    Condition::Is { value } | Condition::Equals { value } => value,
                    _ => None,
                };
                Condition::Equals { value }
            }
            Operator::Contains => {
                let text = match self {
                    Condition::Contains { text } => text,
                    Condition::Is {
                        value: Some(FilterValue::Text(s)),
                    } => s,
                    _ => String::new(),
                };
                Condition::Contains { text }
            }
        }
    }
}

/// One in-progress editing row in the filter panel
///
/// `id` is opaque and stable for the row's lifetime; reconciliation keeps
/// existing rows (and their ids) whenever the re-derived list is
/// structurally identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub id: String,
    pub field: String,
    #[serde(flatten)]
    pub condition: Condition,
}

impl ActiveFilter {
    pub fn new(id: impl Into<String>, field: impl Into<String>, condition: Condition) -> Self {
        ActiveFilter {
            id: id.into(),
            field: field.into(),
            condition,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.condition.is_empty()
    }

    /// Field-by-field equality ignoring ids: same field, operator, values
    /// as strings, and the same multi-value set regardless of order
    pub fn structurally_eq(&self, other: &ActiveFilter) -> bool {
        if self.field != other.field
            || self.condition.operator() != other.condition.operator()
            || self.condition.value_str() != other.condition.value_str()
            || self.condition.value2_str() != other.condition.value2_str()
        {
            return false;
        }
        match (self.condition.multi(), other.condition.multi()) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                let mut a = a.to_vec();
                let mut b = b.to_vec();
                a.sort_unstable();
                b.sort_unstable();
                a == b
            }
            _ => false,
        }
    }
}

/// Sequential id source for editing rows
///
/// Ids are generated once per row and never reused, even across
/// reconciliation passes that end up discarding their rows.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> IdGen {
        IdGen::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("f{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Operator ---

    #[test]
    fn test_operator_round_trip_str() {
        for op in [
            Operator::From,
            Operator::To,
            Operator::Between,
            Operator::Is,
            Operator::Includes,
            Operator::Excludes,
            Operator::Equals,
            Operator::Contains,
        ] {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_operator_parse_unknown() {
        let err = "near".parse::<Operator>().unwrap_err();
        assert_eq!(err.to_string(), "unknown operator: near");
    }

    #[test]
    fn test_default_operators() {
        assert_eq!(Operator::default_for(FilterKind::Date), Operator::From);
        assert_eq!(Operator::default_for(FilterKind::Dropdown), Operator::Is);
        assert_eq!(Operator::default_for(FilterKind::Number), Operator::Equals);
        assert_eq!(Operator::default_for(FilterKind::Text), Operator::Contains);
    }

    #[test]
    fn test_legal_operators() {
        assert!(Operator::Between.legal_for(FilterKind::Date));
        assert!(!Operator::Between.legal_for(FilterKind::Dropdown));
        assert!(Operator::Excludes.legal_for(FilterKind::Dropdown));
        assert!(!Operator::Contains.legal_for(FilterKind::Number));
        assert!(Operator::Contains.legal_for(FilterKind::Text));
    }

    // --- Condition emptiness ---

    #[test]
    fn test_fresh_conditions_are_empty() {
        for op in [
            Operator::From,
            Operator::To,
            Operator::Between,
            Operator::Is,
            Operator::Includes,
            Operator::Excludes,
            Operator::Equals,
            Operator::Contains,
        ] {
            assert!(Condition::empty_for(op).is_empty(), "{op} should be empty");
            assert_eq!(Condition::empty_for(op).operator(), op);
        }
    }

    #[test]
    fn test_partial_between_is_not_empty() {
        let cond = Condition::Between {
            from: Some("2024-01-01".to_string()),
            to: None,
        };
        assert!(!cond.is_empty());
    }

    // --- Operator transitions ---

    #[test]
    fn test_is_to_includes_seeds_from_value() {
        let cond = Condition::Is {
            value: Some(FilterValue::Number(2)),
        };
        assert_eq!(
            cond.with_operator(Operator::Includes),
            Condition::Includes { values: vec![2] }
        );
    }

    #[test]
    fn test_includes_to_is_collapses_to_first() {
        let cond = Condition::Includes { values: vec![1, 2] };
        assert_eq!(
            cond.with_operator(Operator::Is),
            Condition::Is {
                value: Some(FilterValue::Number(1)),
            }
        );
    }

    #[test]
    fn test_includes_to_excludes_keeps_values() {
        let cond = Condition::Includes { values: vec![1, 2] };
        assert_eq!(
            cond.with_operator(Operator::Excludes),
            Condition::Excludes { values: vec![1, 2] }
        );
    }

    #[test]
    fn test_from_to_between_carries_bound() {
        let cond = Condition::From {
            value: Some("2024-01-01".to_string()),
        };
        assert_eq!(
            cond.with_operator(Operator::Between),
            Condition::Between {
                from: Some("2024-01-01".to_string()),
                to: None,
            }
        );
    }

    #[test]
    fn test_between_to_single_bound_keeps_matching_side() {
        let cond = Condition::Between {
            from: Some("2024-01-01".to_string()),
            to: Some("2024-01-31".to_string()),
        };
        assert_eq!(
            cond.clone().with_operator(Operator::From),
            Condition::From {
                value: Some("2024-01-01".to_string()),
            }
        );
        assert_eq!(
            cond.with_operator(Operator::To),
            Condition::To {
                value: Some("2024-01-31".to_string()),
            }
        );
    }

    #[test]
    fn test_same_operator_is_identity() {
        let cond = Condition::Includes { values: vec![3] };
        assert_eq!(cond.clone().with_operator(Operator::Includes), cond);
    }

    // --- Structural equality ---

    #[test]
    fn test_structural_eq_ignores_id() {
        let a = ActiveFilter::new("f1", "status_id", Condition::Includes { values: vec![1, 2] });
        let b = ActiveFilter::new("f9", "status_id", Condition::Includes { values: vec![2, 1] });
        assert!(a.structurally_eq(&b));
    }

    #[test]
    fn test_structural_eq_detects_operator_change() {
        let a = ActiveFilter::new("f1", "status_id", Condition::Includes { values: vec![1] });
        let b = ActiveFilter::new(
            "f1",
            "status_id",
            Condition::Is {
                value: Some(FilterValue::Number(1)),
            },
        );
        assert!(!a.structurally_eq(&b));
    }

    #[test]
    fn test_structural_eq_compares_values_as_strings() {
        let a = ActiveFilter::new(
            "f1",
            "custom",
            Condition::Equals {
                value: Some(FilterValue::Number(7)),
            },
        );
        let b = ActiveFilter::new(
            "f2",
            "custom",
            Condition::Equals {
                value: Some(FilterValue::text("7")),
            },
        );
        assert!(a.structurally_eq(&b));
    }

    // --- Serde shape ---

    #[test]
    fn test_row_serializes_with_operator_tag() {
        let row = ActiveFilter::new(
            "f1",
            "due_date",
            Condition::Between {
                from: Some("2024-01-01".to_string()),
                to: Some("2024-01-31".to_string()),
            },
        );
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["operator"], "between");
        assert_eq!(json["field"], "due_date");
        assert_eq!(json["from"], "2024-01-01");
        assert_eq!(json["to"], "2024-01-31");
    }

    #[test]
    fn test_row_deserializes_without_optional_values() {
        let row: ActiveFilter =
            serde_json::from_str(r#"{"id":"f1","field":"status_id","operator":"is"}"#).unwrap();
        assert_eq!(row.condition, Condition::Is { value: None });
        assert!(row.is_empty());
    }

    // --- IdGen ---

    #[test]
    fn test_ids_are_unique_and_sequential() {
        let mut ids = IdGen::new();
        assert_eq!(ids.next_id(), "f1");
        assert_eq!(ids.next_id(), "f2");
        assert_eq!(ids.next_id(), "f3");
    }
}
