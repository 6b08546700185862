pub mod mutators;
pub mod selectors;
pub mod spec;

/// Most recent records retained per user; older ones are evicted on save.
pub const HISTORY_CAP: i64 = 5;
