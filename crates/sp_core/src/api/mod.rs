//! JSON Presentation-Adapter API
//!
//! String-in/string-out boundary for UI front-ends. Every request carries a
//! `schema_version` field and every handler takes the session context
//! explicitly; read-only views take it by shared reference so they cannot
//! mutate anything.

pub mod session_json;

pub use session_json::{
    process_analysis_view, process_answer, process_confirm, process_profile_count,
    process_simulation_view,
};
