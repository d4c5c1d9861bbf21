//! # sp_core - Construction-Site Prevention Training Engine
//!
//! Scripted risk-awareness situations with per-profile error tallies, a
//! two-round branching state machine, and team-level reporting, with a JSON
//! API for easy integration with UI front-ends.
//!
//! ## Features
//! - Static, startup-validated scenario catalog (round 1 + branched round 2)
//! - Per-profile state machine: Phase1 → Debrief1 → Phase2 → DebriefFinal
//! - Dominant-error branching with a deterministic tie-break
//! - Pure aggregation: per-profile totals, team averages, chart series

pub mod api;
pub mod content;
pub mod engine;
pub mod error;
pub mod profile;
pub mod report;
pub mod session;

// Re-export the main engine surface
pub use content::{validate_catalog, Choice, ErrorCategory, ScenarioRoute, Situation};
pub use engine::{
    active_situations, answer_current_situation, choose_dominant_error, confirm_debrief, progress,
    AnswerOutcome, Progress,
};
pub use error::{CoreError, Result};
pub use profile::{ErrorTally, HistoryEntry, Phase, ProfileState};
pub use report::{team_average, team_table, total_errors, RadarSeries, TeamAverage, TeamTable};
pub use session::{SessionContext, DEFAULT_PROFILES, MAX_PROFILES, MIN_PROFILES};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
