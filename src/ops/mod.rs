pub mod catalog;
pub mod convert;
pub mod display;
pub mod fields;

pub use catalog::{FilterDefinition, available_filters};
pub use convert::{same_rows, to_active_filters, to_applied_map};
pub use display::{AppliedFilterChip, format_active, format_applied};
