//! Filter expression engine for task and project list views.
//!
//! A list view owns a flat, wire-shaped [`AppliedFilterMap`] — the contract
//! with its list-fetching API. This crate keeps that map consistent with
//! the per-row editing model the filter panel works on
//! ([`ActiveFilter`]) and with the human-readable chip projection
//! ([`AppliedFilterChip`]):
//!
//! - [`available_filters`] lists the fields a view offers, given the
//!   option catalogs the consumer has loaded;
//! - [`to_active_filters`] / [`to_applied_map`] convert between map and
//!   rows, totally and idempotently;
//! - [`FilterStore`] holds one view's staged rows, reconciling them when
//!   the applied map changes externally;
//! - [`format_applied`] / [`format_active`] render chips, resolving
//!   dropdown ids to display names.

pub mod model;
pub mod ops;
pub mod store;

pub use model::{
    ActiveFilter, AppliedFilterMap, Condition, FilterKind, FilterOption, FilterValue, IdGen,
    Operator, OptionCatalogs, PanelOptions, ParseError, ViewType,
};
pub use ops::catalog::{FilterDefinition, available_filters};
pub use ops::convert::{same_rows, to_active_filters, to_applied_map};
pub use ops::display::{AppliedFilterChip, format_active, format_applied};
pub use store::{FilterPatch, FilterStore};
