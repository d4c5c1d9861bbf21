//! Scenario Engine
//!
//! Advances profiles through the two-round state machine: record an answer,
//! tally its error category, move to the next situation or the next phase,
//! and fix the round-2 branch when round 1 completes. Every operation takes
//! the session context explicitly and leaves state untouched on error.

use crate::content::{self, ErrorCategory, ScenarioRoute, Situation};
use crate::error::{CoreError, Result};
use crate::profile::{ErrorTally, HistoryEntry, Phase, ProfileState};
use crate::session::SessionContext;
use serde::Serialize;
use tracing::{debug, info};

/// Result of a successfully recorded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// More situations remain in the current phase.
    Advanced { next_index: usize },
    /// The phase's last situation was answered and the profile moved on.
    PhaseComplete { phase: Phase },
}

/// Position within the active situation set, for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based current situation number.
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        self.current as f64 / self.total as f64
    }
}

/// The situation set the profile is currently answering.
///
/// Rejected in debrief phases; in round 2 the branch route selects the set.
pub fn active_situations(profile: &ProfileState) -> Result<&'static [Situation]> {
    match profile.phase {
        Phase::Phase1 => Ok(content::phase_1_set()),
        Phase::Phase2 => {
            let route = profile
                .route
                .ok_or_else(|| CoreError::InvalidParameter("round-2 route not fixed".into()))?;
            Ok(content::route_set(route))
        }
        phase => Err(CoreError::PhaseMismatch { phase }),
    }
}

/// Progress within the active situation set.
pub fn progress(profile: &ProfileState) -> Result<Progress> {
    let set = active_situations(profile)?;
    Ok(Progress { current: profile.situation_index + 1, total: set.len() })
}

/// Dominant category of a tally, folded onto the round-2 routes.
///
/// An all-zero tally resolves to the catch-all, as does a dominant category
/// without dedicated round-2 content. Ties break on declaration order: the
/// first maximum encountered wins.
pub fn choose_dominant_error(tally: &ErrorTally) -> ScenarioRoute {
    if tally.total() == 0 {
        return ScenarioRoute::Autres;
    }

    let mut dominant = ErrorCategory::ALL[0];
    let mut dominant_count = tally.get(dominant);
    for &category in &ErrorCategory::ALL[1..] {
        let count = tally.get(category);
        if count > dominant_count {
            dominant = category;
            dominant_count = count;
        }
    }

    if dominant.has_dedicated_set() {
        ScenarioRoute::Category(dominant)
    } else {
        ScenarioRoute::Autres
    }
}

/// Record the answer to a profile's current situation and advance.
///
/// `choice_text` must exactly match one choice of the current situation;
/// anything else is rejected without touching state. Completing round 1
/// fixes the round-2 route from the round-1 tally and moves the profile to
/// the first debrief; completing round 2 moves it to the final debrief.
pub fn answer_current_situation(
    ctx: &mut SessionContext,
    slot: usize,
    choice_text: &str,
) -> Result<AnswerOutcome> {
    let outcome = {
        let profile = ctx.profile_mut(slot)?;
        let set = active_situations(profile)?;
        let situation = &set[profile.situation_index];
        let choice = situation
            .find_choice(choice_text)
            .ok_or_else(|| CoreError::InvalidChoice(choice_text.to_string()))?;

        let entry = HistoryEntry {
            situation_number: profile.situation_index + 1,
            choice: choice.text.to_string(),
            error: choice.error,
        };
        let (history, tally) = match profile.phase {
            Phase::Phase1 => (&mut profile.history_phase_1, &mut profile.errors_phase_1),
            Phase::Phase2 => (&mut profile.history_phase_2, &mut profile.errors_phase_2),
            // active_situations() already rejected the debrief phases.
            phase => return Err(CoreError::PhaseMismatch { phase }),
        };
        history.push(entry);
        if let Some(category) = choice.error {
            tally.record(category);
        }

        if profile.situation_index + 1 < set.len() {
            profile.situation_index += 1;
            debug!(
                "{}: answered situation {}, moving to {}",
                profile.name,
                profile.situation_index,
                profile.situation_index + 1
            );
            AnswerOutcome::Advanced { next_index: profile.situation_index }
        } else {
            profile.situation_index = 0;
            let next_phase = if profile.phase == Phase::Phase1 {
                let route = choose_dominant_error(&profile.errors_phase_1);
                profile.route = Some(route);
                info!("{}: round 1 complete, dominant error '{}'", profile.name, route);
                Phase::Debrief1
            } else {
                info!("{}: scenario complete", profile.name);
                Phase::DebriefFinal
            };
            profile.phase = next_phase;
            AnswerOutcome::PhaseComplete { phase: next_phase }
        }
    };

    ctx.mark_changed();
    Ok(outcome)
}

/// Debrief confirmation: move a profile from the round-1 debrief into
/// round 2. The route was already fixed when round 1 completed; the
/// confirmation step only exists so the user can view the chart first.
pub fn confirm_debrief(ctx: &mut SessionContext, slot: usize) -> Result<Phase> {
    {
        let profile = ctx.profile_mut(slot)?;
        if profile.phase != Phase::Debrief1 {
            return Err(CoreError::PhaseMismatch { phase: profile.phase });
        }

        profile.phase = Phase::Phase2;
        profile.situation_index = 0;
        let route = profile.route.map_or("?", ScenarioRoute::label);
        info!("{}: entering round 2 on route '{}'", profile.name, route);
    }

    ctx.mark_changed();
    Ok(Phase::Phase2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_correct(ctx: &mut SessionContext, slot: usize) -> AnswerOutcome {
        let profile = ctx.profile(slot).unwrap();
        let set = active_situations(profile).unwrap();
        let correct = set[profile.situation_index]
            .choices
            .iter()
            .find(|c| c.error.is_none())
            .unwrap()
            .text;
        answer_current_situation(ctx, slot, correct).unwrap()
    }

    #[test]
    fn test_dominant_error_all_zero_is_autres() {
        assert_eq!(choose_dominant_error(&ErrorTally::new()), ScenarioRoute::Autres);
    }

    #[test]
    fn test_dominant_error_tie_break_declaration_order() {
        // PoorCommunication is declared before Haste; both mapped to content.
        let mut tally = ErrorTally::new();
        tally.record(ErrorCategory::PoorCommunication);
        tally.record(ErrorCategory::PoorCommunication);
        tally.record(ErrorCategory::Haste);
        tally.record(ErrorCategory::Haste);

        assert_eq!(
            choose_dominant_error(&tally),
            ScenarioRoute::Category(ErrorCategory::PoorCommunication)
        );
    }

    #[test]
    fn test_dominant_error_unmapped_category_folds_to_autres() {
        let mut tally = ErrorTally::new();
        tally.record(ErrorCategory::Negligence);
        tally.record(ErrorCategory::Negligence);
        tally.record(ErrorCategory::Haste);

        assert_eq!(choose_dominant_error(&tally), ScenarioRoute::Autres);
    }

    #[test]
    fn test_answer_records_history_and_tally() {
        let mut ctx = SessionContext::new(3);

        let outcome = answer_current_situation(&mut ctx, 0, "Ne rien dire").unwrap();
        assert_eq!(outcome, AnswerOutcome::Advanced { next_index: 1 });

        let profile = ctx.profile(0).unwrap();
        assert_eq!(profile.history_phase_1.len(), 1);
        assert_eq!(profile.history_phase_1[0].situation_number, 1);
        assert_eq!(profile.history_phase_1[0].choice, "Ne rien dire");
        assert_eq!(
            profile.history_phase_1[0].error,
            Some(ErrorCategory::IgnoredInstructions)
        );
        assert_eq!(profile.errors_phase_1.get(ErrorCategory::IgnoredInstructions), 1);
        assert_eq!(profile.situation_index, 1);
    }

    #[test]
    fn test_answer_haste_choice_counts_precipitation() {
        let mut ctx = SessionContext::new(3);
        answer_correct(&mut ctx, 0);

        answer_current_situation(&mut ctx, 0, "Faire vite tout seul").unwrap();
        let profile = ctx.profile(0).unwrap();
        assert_eq!(profile.errors_phase_1.get(ErrorCategory::Haste), 1);
        assert_eq!(profile.history_phase_1[1].error, Some(ErrorCategory::Haste));
        assert_eq!(profile.situation_index, 2);
    }

    #[test]
    fn test_invalid_choice_rejected_without_mutation() {
        let mut ctx = SessionContext::new(3);
        let revision = ctx.revision();

        let err = answer_current_situation(&mut ctx, 0, "Pas une option").unwrap_err();
        assert!(matches!(err, CoreError::InvalidChoice(_)));

        let profile = ctx.profile(0).unwrap();
        assert!(profile.history_phase_1.is_empty());
        assert_eq!(profile.errors_phase_1.total(), 0);
        assert_eq!(profile.situation_index, 0);
        assert_eq!(ctx.revision(), revision);
    }

    #[test]
    fn test_all_correct_answers_reach_debrief_with_autres() {
        let mut ctx = SessionContext::new(3);

        answer_correct(&mut ctx, 0);
        answer_correct(&mut ctx, 0);
        let outcome = answer_correct(&mut ctx, 0);
        assert_eq!(outcome, AnswerOutcome::PhaseComplete { phase: Phase::Debrief1 });

        let profile = ctx.profile(0).unwrap();
        assert_eq!(profile.phase, Phase::Debrief1);
        assert_eq!(profile.situation_index, 0);
        assert_eq!(profile.errors_phase_1.total(), 0);
        assert_eq!(profile.route, Some(ScenarioRoute::Autres));

        // Confirmation flips into round 2 without touching the route.
        let phase = confirm_debrief(&mut ctx, 0).unwrap();
        assert_eq!(phase, Phase::Phase2);
        let profile = ctx.profile(0).unwrap();
        assert_eq!(profile.route, Some(ScenarioRoute::Autres));
        assert_eq!(profile.situation_index, 0);
    }

    #[test]
    fn test_haste_answers_branch_to_haste_route() {
        let mut ctx = SessionContext::new(3);

        answer_correct(&mut ctx, 0);
        answer_current_situation(&mut ctx, 0, "Faire vite tout seul").unwrap();
        answer_correct(&mut ctx, 0);

        let profile = ctx.profile(0).unwrap();
        assert_eq!(profile.phase, Phase::Debrief1);
        assert_eq!(profile.route, Some(ScenarioRoute::Category(ErrorCategory::Haste)));

        confirm_debrief(&mut ctx, 0).unwrap();
        let profile = ctx.profile(0).unwrap();
        let set = active_situations(profile).unwrap();
        assert!(set[0].text.contains("échafaudage"));
    }

    #[test]
    fn test_full_run_reaches_final_debrief() {
        let mut ctx = SessionContext::new(3);

        for _ in 0..3 {
            answer_correct(&mut ctx, 0);
        }
        confirm_debrief(&mut ctx, 0).unwrap();
        for _ in 0..2 {
            answer_correct(&mut ctx, 0);
        }
        let outcome = answer_correct(&mut ctx, 0);

        assert_eq!(outcome, AnswerOutcome::PhaseComplete { phase: Phase::DebriefFinal });
        let profile = ctx.profile(0).unwrap();
        assert!(profile.is_finished());
        assert_eq!(profile.history_phase_1.len(), 3);
        assert_eq!(profile.history_phase_2.len(), 3);
    }

    #[test]
    fn test_answer_rejected_in_debrief() {
        let mut ctx = SessionContext::new(3);
        for _ in 0..3 {
            answer_correct(&mut ctx, 0);
        }

        let err = answer_current_situation(&mut ctx, 0, "Ne rien dire").unwrap_err();
        assert!(matches!(err, CoreError::PhaseMismatch { phase: Phase::Debrief1 }));
    }

    #[test]
    fn test_confirm_rejected_outside_debrief_1() {
        let mut ctx = SessionContext::new(3);
        let err = confirm_debrief(&mut ctx, 0).unwrap_err();
        assert!(matches!(err, CoreError::PhaseMismatch { phase: Phase::Phase1 }));
    }

    #[test]
    fn test_profiles_are_independent() {
        let mut ctx = SessionContext::new(3);
        answer_current_situation(&mut ctx, 0, "Ne rien dire").unwrap();

        let untouched = ctx.profile(1).unwrap();
        assert!(untouched.history_phase_1.is_empty());
        assert_eq!(untouched.errors_phase_1.total(), 0);
    }

    #[test]
    fn test_progress_fraction() {
        let ctx = SessionContext::new(3);
        let progress = progress(ctx.profile(0).unwrap()).unwrap();
        assert_eq!(progress.current, 1);
        assert_eq!(progress.total, 3);
        assert!((progress.fraction() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        // A profile answers `picks[i] % choices` at each step until the
        // scenario finishes; engine invariants must hold throughout.
        proptest! {
            #[test]
            fn prop_tally_matches_history(picks in proptest::collection::vec(0usize..3, 6)) {
                let mut ctx = SessionContext::new(3);

                for &pick in &picks {
                    let profile = ctx.profile(0).unwrap();
                    if profile.phase == Phase::Debrief1 {
                        confirm_debrief(&mut ctx, 0).unwrap();
                    }
                    let profile = ctx.profile(0).unwrap();
                    if profile.is_finished() {
                        break;
                    }
                    let set = active_situations(profile).unwrap();
                    let situation = &set[profile.situation_index];
                    let text = situation.choices[pick % situation.choices.len()].text;
                    answer_current_situation(&mut ctx, 0, text).unwrap();

                    let profile = ctx.profile(0).unwrap();
                    let tagged_1 = profile
                        .history_phase_1
                        .iter()
                        .filter(|e| e.error.is_some())
                        .count() as u32;
                    let tagged_2 = profile
                        .history_phase_2
                        .iter()
                        .filter(|e| e.error.is_some())
                        .count() as u32;
                    prop_assert_eq!(profile.errors_phase_1.total(), tagged_1);
                    prop_assert_eq!(profile.errors_phase_2.total(), tagged_2);

                    if profile.phase.is_active() {
                        let set = active_situations(profile).unwrap();
                        prop_assert!(profile.situation_index < set.len());
                    } else {
                        prop_assert_eq!(profile.situation_index, 0);
                    }
                    if profile.phase != Phase::Phase1 {
                        prop_assert!(profile.route.is_some());
                    }
                }
            }
        }
    }
}
