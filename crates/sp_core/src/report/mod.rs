//! Aggregation and Reporting
//!
//! Pure summaries derived from profile state on demand: per-profile totals,
//! team averages, and the chart/table series the analysis views render.
//! Nothing here mutates state and nothing is cached — the counts are tiny.

use crate::content::ErrorCategory;
use crate::profile::{ErrorTally, ProfileState};
use serde::Serialize;

/// Combined round-1 + round-2 tally for one profile.
pub fn total_errors(profile: &ProfileState) -> ErrorTally {
    profile.errors_phase_1.combined(&profile.errors_phase_2)
}

/// Per-category arithmetic mean of total errors across a set of profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TeamAverage {
    values: [f64; ErrorCategory::COUNT],
}

impl TeamAverage {
    pub fn get(&self, category: ErrorCategory) -> f64 {
        self.values[category.index()]
    }

    /// `(category, mean)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorCategory, f64)> + '_ {
        ErrorCategory::ALL.iter().map(move |&category| (category, self.get(category)))
    }
}

/// Team average over the given profiles (normally the visible slots).
/// An empty slice yields all-zero means.
pub fn team_average(profiles: &[ProfileState]) -> TeamAverage {
    let mut average = TeamAverage::default();
    if profiles.is_empty() {
        return average;
    }

    for profile in profiles {
        for (category, count) in total_errors(profile).iter() {
            average.values[category.index()] += count as f64;
        }
    }
    for value in &mut average.values {
        *value /= profiles.len() as f64;
    }
    average
}

/// Chart-ready error-profile series: category labels in declaration order,
/// one value per label, and the radial axis bound the original chart used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub title: String,
    pub labels: Vec<&'static str>,
    pub values: Vec<f64>,
    /// Radial axis upper bound: `max(values, 1) + 1`.
    pub axis_max: f64,
}

impl RadarSeries {
    fn new(title: String, values: Vec<f64>) -> Self {
        let peak = values.iter().cloned().fold(0.0, f64::max);
        let peak = if peak > 0.0 { peak } else { 1.0 };
        Self {
            title,
            labels: ErrorCategory::ALL.iter().map(|c| c.label()).collect(),
            values,
            axis_max: peak + 1.0,
        }
    }

    pub fn from_tally(title: impl Into<String>, tally: &ErrorTally) -> Self {
        Self::new(title.into(), tally.iter().map(|(_, count)| count as f64).collect())
    }

    pub fn from_average(title: impl Into<String>, average: &TeamAverage) -> Self {
        Self::new(title.into(), average.iter().map(|(_, mean)| mean).collect())
    }
}

/// One analysis-table row: a category with per-profile totals and team mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTableRow {
    pub category: ErrorCategory,
    pub per_profile: Vec<u32>,
    pub average: f64,
}

/// The per-profile error table of the analysis view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTable {
    pub profile_names: Vec<String>,
    pub rows: Vec<TeamTableRow>,
}

pub fn team_table(profiles: &[ProfileState]) -> TeamTable {
    let totals: Vec<ErrorTally> = profiles.iter().map(total_errors).collect();
    let average = team_average(profiles);

    TeamTable {
        profile_names: profiles.iter().map(|p| p.name.clone()).collect(),
        rows: ErrorCategory::ALL
            .iter()
            .map(|&category| TeamTableRow {
                category,
                per_profile: totals.iter().map(|t| t.get(category)).collect(),
                average: average.get(category),
            })
            .collect(),
    }
}
