//! Static Scenario Content
//!
//! Immutable lookup tables: situations, choices and their error-category
//! tags, plus the route mapping that selects round-2 content.

pub mod catalog;
pub mod types;

pub use catalog::{phase_1_set, route_set, validate_catalog};
pub use types::{Choice, ErrorCategory, ScenarioRoute, Situation};
