//! Scenario Content Core Types
//!
//! Error-category taxonomy and the scripted situation/choice structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure mode a choice can be tagged with.
///
/// Declaration order is significant: it is both the tally/index order and the
/// tie-break order for dominant-error selection (first maximum wins). The
/// serialized form is the French display label shown to trainees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum ErrorCategory {
    #[serde(rename = "Non-respect des consignes")]
    IgnoredInstructions,
    #[serde(rename = "Négligence")]
    Negligence,
    #[serde(rename = "Communication insuffisante")]
    PoorCommunication,
    #[serde(rename = "Précipitation")]
    Haste,
    #[serde(rename = "Manque d'équipement")]
    MissingEquipment,
}

impl ErrorCategory {
    pub const COUNT: usize = 5;

    /// All categories in declaration order.
    pub const ALL: [ErrorCategory; Self::COUNT] = [
        ErrorCategory::IgnoredInstructions,
        ErrorCategory::Negligence,
        ErrorCategory::PoorCommunication,
        ErrorCategory::Haste,
        ErrorCategory::MissingEquipment,
    ];

    /// Position in declaration order; backs the array-based tally.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// French display label (also the serialized form).
    pub const fn label(self) -> &'static str {
        match self {
            ErrorCategory::IgnoredInstructions => "Non-respect des consignes",
            ErrorCategory::Negligence => "Négligence",
            ErrorCategory::PoorCommunication => "Communication insuffisante",
            ErrorCategory::Haste => "Précipitation",
            ErrorCategory::MissingEquipment => "Manque d'équipement",
        }
    }

    /// Whether dedicated round-2 content exists for this category.
    ///
    /// Categories without a dedicated set are folded into the catch-all by
    /// the dominant-error policy before any route is stored.
    pub const fn has_dedicated_set(self) -> bool {
        matches!(self, ErrorCategory::PoorCommunication | ErrorCategory::Haste)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Round-2 branch selector: a dominant category with dedicated content, or
/// the catch-all set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioRoute {
    Category(ErrorCategory),
    Autres,
}

impl ScenarioRoute {
    pub fn label(self) -> &'static str {
        match self {
            ScenarioRoute::Category(category) => category.label(),
            ScenarioRoute::Autres => "Autres",
        }
    }
}

impl fmt::Display for ScenarioRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable answer. `error: None` marks the correct choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub text: &'static str,
    pub error: Option<ErrorCategory>,
}

/// A scripted scenario prompt with its fixed, ordered set of choices.
#[derive(Debug, Clone, Copy)]
pub struct Situation {
    pub text: &'static str,
    pub choices: &'static [Choice],
}

impl Situation {
    /// The choice whose text matches exactly, if any.
    pub fn find_choice(&self, text: &str) -> Option<&'static Choice> {
        self.choices.iter().find(|c| c.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_matches_declaration_order() {
        let iterated: Vec<ErrorCategory> = ErrorCategory::iter().collect();
        assert_eq!(iterated.as_slice(), &ErrorCategory::ALL);
    }

    #[test]
    fn test_index_is_position_in_all() {
        for (position, category) in ErrorCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), position);
        }
    }

    #[test]
    fn test_serialized_form_is_french_label() {
        let json = serde_json::to_string(&ErrorCategory::Haste).unwrap();
        assert_eq!(json, "\"Précipitation\"");

        let parsed: ErrorCategory = serde_json::from_str("\"Négligence\"").unwrap();
        assert_eq!(parsed, ErrorCategory::Negligence);
    }

    #[test]
    fn test_route_labels() {
        assert_eq!(ScenarioRoute::Autres.label(), "Autres");
        assert_eq!(
            ScenarioRoute::Category(ErrorCategory::PoorCommunication).label(),
            "Communication insuffisante"
        );
    }
}
