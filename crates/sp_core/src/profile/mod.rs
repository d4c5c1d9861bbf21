//! Per-Profile Training State
//!
//! One `ProfileState` per simulated individual: phase, position within the
//! active situation set, per-round error tallies and answer history.

use crate::content::{ErrorCategory, ScenarioRoute};
use serde::{Deserialize, Serialize};

/// Stage of the two-round scenario. Transitions only move forward:
/// `Phase1 → Debrief1 → Phase2 → DebriefFinal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "phase_1")]
    Phase1,
    #[serde(rename = "debrief_1")]
    Debrief1,
    #[serde(rename = "phase_2")]
    Phase2,
    #[serde(rename = "debrief_final")]
    DebriefFinal,
}

impl Phase {
    /// Phases in which the profile is answering situations.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Phase1 | Phase::Phase2)
    }
}

/// Per-category error counts. Every category is always present, starting at
/// zero; the backing array is indexed by `ErrorCategory::index()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ErrorTally {
    counts: [u32; ErrorCategory::COUNT],
}

impl ErrorTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: ErrorCategory) {
        self.counts[category.index()] += 1;
    }

    pub fn get(&self, category: ErrorCategory) -> u32 {
        self.counts[category.index()]
    }

    /// `(category, count)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorCategory, u32)> + '_ {
        ErrorCategory::ALL.iter().map(move |&category| (category, self.get(category)))
    }

    /// Sum over all categories.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Element-wise sum of two tallies.
    pub fn combined(&self, other: &ErrorTally) -> ErrorTally {
        let mut counts = [0u32; ErrorCategory::COUNT];
        for (index, slot) in counts.iter_mut().enumerate() {
            *slot = self.counts[index] + other.counts[index];
        }
        ErrorTally { counts }
    }
}

/// One answered situation. Appended per answer, never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based position within the phase's situation set.
    pub situation_number: usize,
    pub choice: String,
    pub error: Option<ErrorCategory>,
}

/// One simulated individual progressing independently through the scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileState {
    pub name: String,
    pub phase: Phase,
    /// Position within the active situation set; reset to 0 on every phase
    /// transition and meaningless in debrief phases.
    pub situation_index: usize,
    pub errors_phase_1: ErrorTally,
    pub errors_phase_2: ErrorTally,
    pub history_phase_1: Vec<HistoryEntry>,
    pub history_phase_2: Vec<HistoryEntry>,
    /// Round-2 branch. Fixed once when round 1 completes, never changed.
    pub route: Option<ScenarioRoute>,
}

impl ProfileState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phase: Phase::Phase1,
            situation_index: 0,
            errors_phase_1: ErrorTally::new(),
            errors_phase_2: ErrorTally::new(),
            history_phase_1: Vec::new(),
            history_phase_2: Vec::new(),
            route: None,
        }
    }

    /// Whether the profile has reached the terminal debrief.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::DebriefFinal
    }
}
