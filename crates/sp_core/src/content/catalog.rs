//! Static Scenario Catalog
//!
//! The scripted content: one shared round-1 set and one round-2 set per
//! branch route. Content is immutable and defined at compile time; the
//! route lookup is total, so every route the dominant-error policy can
//! produce resolves to a set.

use super::types::{Choice, ErrorCategory, ScenarioRoute, Situation};
use crate::error::{CoreError, Result};

/// Round-1 situations, shared by every profile.
static PHASE_1: [Situation; 3] = [
    Situation {
        text: "1. Tu vois un collègue sans casque, que fais-tu ?",
        choices: &[
            Choice { text: "Lui rappeler immédiatement de le mettre", error: None },
            Choice { text: "Ne rien dire", error: Some(ErrorCategory::IgnoredInstructions) },
            Choice {
                text: "En parler après la pause",
                error: Some(ErrorCategory::PoorCommunication),
            },
        ],
    },
    Situation {
        text: "2. Tu dois soulever une charge lourde seul, que fais-tu ?",
        choices: &[
            Choice { text: "Demander de l’aide pour soulever", error: None },
            Choice { text: "Faire vite tout seul", error: Some(ErrorCategory::Haste) },
            Choice { text: "Ignorer le risque", error: Some(ErrorCategory::Negligence) },
        ],
    },
    Situation {
        text: "3. Une zone dangereuse a des panneaux masqués, que fais-tu ?",
        choices: &[
            Choice { text: "Signaler immédiatement au chef de chantier", error: None },
            Choice {
                text: "Continuer en faisant attention",
                error: Some(ErrorCategory::MissingEquipment),
            },
            Choice { text: "Ignorer", error: Some(ErrorCategory::Negligence) },
        ],
    },
];

/// Round-2 set for a dominant "Précipitation" profile.
static ROUTE_HASTE: [Situation; 3] = [
    Situation {
        text: "Tu dois monter un échafaudage avec un délai serré, que fais-tu ?",
        choices: &[
            Choice { text: "Je prends le temps de vérifier chaque élément", error: None },
            Choice {
                text: "Je monte rapidement sans tout revérifier",
                error: Some(ErrorCategory::Haste),
            },
            Choice { text: "Je délègue sans contrôler", error: Some(ErrorCategory::Negligence) },
        ],
    },
    Situation {
        text: "Un nouveau plan de sécurité vient d'être distribué :",
        choices: &[
            Choice { text: "Je le lis attentivement", error: None },
            Choice { text: "Je le feuillette rapidement", error: Some(ErrorCategory::Haste) },
            Choice {
                text: "Je le pose de côté pour plus tard",
                error: Some(ErrorCategory::Negligence),
            },
        ],
    },
    Situation {
        text: "Un engin fait un bruit étrange :",
        choices: &[
            Choice { text: "Je le signale et arrête de l'utiliser", error: None },
            Choice { text: "Je continue pour finir la tâche", error: Some(ErrorCategory::Haste) },
            Choice { text: "Je ne fais rien", error: Some(ErrorCategory::Negligence) },
        ],
    },
];

/// Round-2 set for a dominant "Communication insuffisante" profile.
static ROUTE_COMMUNICATION: [Situation; 3] = [
    Situation {
        text: "Tu remarques une erreur sur le plan d’intervention :",
        choices: &[
            Choice { text: "Je préviens mon responsable", error: None },
            Choice {
                text: "Je n'en parle qu'à un collègue",
                error: Some(ErrorCategory::PoorCommunication),
            },
            Choice { text: "Je fais avec sans signaler", error: Some(ErrorCategory::Negligence) },
        ],
    },
    Situation {
        text: "Un conflit entre collègues perturbe le chantier :",
        choices: &[
            Choice { text: "Je fais remonter l’information", error: None },
            Choice {
                text: "Je laisse chacun gérer",
                error: Some(ErrorCategory::PoorCommunication),
            },
            Choice { text: "J'ignore la situation", error: Some(ErrorCategory::Negligence) },
        ],
    },
    Situation {
        text: "Un nouvel arrivant ne comprend pas les consignes :",
        choices: &[
            Choice { text: "Je prends le temps de lui expliquer", error: None },
            Choice {
                text: "Je dis juste de suivre les autres",
                error: Some(ErrorCategory::PoorCommunication),
            },
            Choice { text: "Je l’ignore", error: Some(ErrorCategory::Negligence) },
        ],
    },
];

/// Round-2 fallback set, used whenever no category dominates clearly.
static ROUTE_AUTRES: [Situation; 3] = [
    Situation {
        text: "Une alarme incendie retentit :",
        choices: &[
            Choice { text: "Je suis les procédures à la lettre", error: None },
            Choice {
                text: "Je continue mon travail pensant à une fausse alerte",
                error: Some(ErrorCategory::Negligence),
            },
            Choice {
                text: "Je demande aux autres quoi faire",
                error: Some(ErrorCategory::PoorCommunication),
            },
        ],
    },
    Situation {
        text: "Un outil présenté comme dangereux est mal rangé :",
        choices: &[
            Choice { text: "Je le range et informe l'équipe", error: None },
            Choice {
                text: "Je le laisse en pensant qu'un autre le fera",
                error: Some(ErrorCategory::Negligence),
            },
            Choice {
                text: "Je le cache sans rien dire",
                error: Some(ErrorCategory::PoorCommunication),
            },
        ],
    },
    Situation {
        text: "La météo se dégrade rapidement :",
        choices: &[
            Choice { text: "Je suspend les activités risquées", error: None },
            Choice {
                text: "Je poursuis pour respecter le planning",
                error: Some(ErrorCategory::Haste),
            },
            Choice {
                text: "Je laisse les autres décider",
                error: Some(ErrorCategory::IgnoredInstructions),
            },
        ],
    },
];

/// The shared round-1 situation set.
pub fn phase_1_set() -> &'static [Situation] {
    &PHASE_1
}

/// Round-2 situation set for a route.
pub fn route_set(route: ScenarioRoute) -> &'static [Situation] {
    match route {
        ScenarioRoute::Category(ErrorCategory::Haste) => &ROUTE_HASTE,
        ScenarioRoute::Category(ErrorCategory::PoorCommunication) => &ROUTE_COMMUNICATION,
        // The dominant-error policy folds categories without dedicated
        // content into Autres before a route is ever stored.
        ScenarioRoute::Category(_) | ScenarioRoute::Autres => &ROUTE_AUTRES,
    }
}

/// Check the catalog invariants the engine relies on.
///
/// Each set must be non-empty; each situation needs at least two choices,
/// exactly one of them correct, and choice texts unique within the situation
/// (answers are matched by exact text). Front-ends run this once at startup.
pub fn validate_catalog() -> Result<()> {
    validate_set("phase 1", phase_1_set())?;
    for category in ErrorCategory::ALL {
        if category.has_dedicated_set() {
            validate_set(category.label(), route_set(ScenarioRoute::Category(category)))?;
        }
    }
    validate_set("Autres", route_set(ScenarioRoute::Autres))
}

fn validate_set(name: &str, set: &[Situation]) -> Result<()> {
    if set.is_empty() {
        return Err(CoreError::InvalidContent(format!("set '{}' is empty", name)));
    }

    for (index, situation) in set.iter().enumerate() {
        if situation.choices.len() < 2 {
            return Err(CoreError::InvalidContent(format!(
                "set '{}' situation {} has fewer than two choices",
                name,
                index + 1
            )));
        }

        let correct = situation.choices.iter().filter(|c| c.error.is_none()).count();
        if correct != 1 {
            return Err(CoreError::InvalidContent(format!(
                "set '{}' situation {} has {} correct choices, expected exactly one",
                name,
                index + 1,
                correct
            )));
        }

        for (i, choice) in situation.choices.iter().enumerate() {
            if situation.choices[..i].iter().any(|c| c.text == choice.text) {
                return Err(CoreError::InvalidContent(format!(
                    "set '{}' situation {} has duplicate choice text: {}",
                    name,
                    index + 1,
                    choice.text
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        validate_catalog().unwrap();
    }

    #[test]
    fn test_phase_1_has_three_situations() {
        assert_eq!(phase_1_set().len(), 3);
    }

    #[test]
    fn test_every_route_resolves() {
        for category in ErrorCategory::ALL {
            let set = route_set(ScenarioRoute::Category(category));
            assert!(!set.is_empty(), "no content for {}", category);
        }
        assert!(!route_set(ScenarioRoute::Autres).is_empty());
    }

    #[test]
    fn test_unmapped_categories_fold_to_autres() {
        let autres = route_set(ScenarioRoute::Autres);
        let negligence = route_set(ScenarioRoute::Category(ErrorCategory::Negligence));
        assert!(std::ptr::eq(autres, negligence));

        let haste = route_set(ScenarioRoute::Category(ErrorCategory::Haste));
        assert!(!std::ptr::eq(autres, haste));
    }

    #[test]
    fn test_validate_rejects_missing_correct_choice() {
        static BROKEN: [Situation; 1] = [Situation {
            text: "broken",
            choices: &[
                Choice { text: "a", error: Some(ErrorCategory::Negligence) },
                Choice { text: "b", error: Some(ErrorCategory::Haste) },
            ],
        }];
        assert!(validate_set("broken", &BROKEN).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_choice_text() {
        static DUPLICATED: [Situation; 1] = [Situation {
            text: "duplicated",
            choices: &[
                Choice { text: "même texte", error: None },
                Choice { text: "même texte", error: Some(ErrorCategory::Negligence) },
            ],
        }];
        assert!(validate_set("duplicated", &DUPLICATED).is_err());
    }
}
