//! Session JSON API
//!
//! Request/response types and handlers for the five operations a front-end
//! needs: configure the profile count, answer, confirm a debrief, and fetch
//! the simulation or analysis view payloads.

use crate::engine::{self, AnswerOutcome};
use crate::error::CoreError;
use crate::profile::{HistoryEntry, Phase};
use crate::report::{self, RadarSeries, TeamTable};
use crate::session::SessionContext;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

fn check_schema(schema_version: u8) -> Result<(), CoreError> {
    if schema_version != crate::SCHEMA_VERSION {
        return Err(CoreError::InvalidParameter(format!(
            "Unsupported schema version: {}",
            schema_version
        )));
    }
    Ok(())
}

fn parse_request<'a, T: Deserialize<'a>>(request_json: &'a str) -> Result<T, CoreError> {
    serde_json::from_str(request_json).map_err(|e| {
        error!("Failed to parse request: {}", e);
        CoreError::InvalidParameter(format!("Invalid JSON: {}", e))
    })
}

// ========================
// Profile Count
// ========================

#[derive(Debug, Deserialize)]
pub struct ProfileCountRequest {
    pub schema_version: u8,
    pub profile_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ProfileCountResponse {
    pub schema_version: u8,
    pub success: bool,
    /// Applied (clamped) count.
    pub profile_count: usize,
    pub profiles: Vec<String>,
}

pub fn process_profile_count(
    ctx: &mut SessionContext,
    request_json: &str,
) -> Result<String, CoreError> {
    let request: ProfileCountRequest = parse_request(request_json)?;
    check_schema(request.schema_version)?;

    let applied = ctx.set_profile_count(request.profile_count);
    if applied != request.profile_count {
        warn!("profile count {} clamped to {}", request.profile_count, applied);
    }

    let response = ProfileCountResponse {
        schema_version: crate::SCHEMA_VERSION,
        success: true,
        profile_count: applied,
        profiles: ctx.visible_profiles().iter().map(|p| p.name.clone()).collect(),
    };
    Ok(serde_json::to_string(&response)?)
}

// ========================
// Answer / Confirm
// ========================

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub schema_version: u8,
    /// 0-based visible profile slot.
    pub slot: usize,
    pub choice_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub schema_version: u8,
    pub success: bool,
    /// "advanced" or "phase_complete".
    pub outcome: String,
    pub phase: Phase,
    pub situation_index: usize,
    /// Redraw revision after the mutation.
    pub revision: u64,
}

pub fn process_answer(ctx: &mut SessionContext, request_json: &str) -> Result<String, CoreError> {
    let request: AnswerRequest = parse_request(request_json)?;
    check_schema(request.schema_version)?;

    info!("slot {}: answer '{}'", request.slot, request.choice_text);
    let outcome = engine::answer_current_situation(ctx, request.slot, &request.choice_text)?;
    let profile = ctx.profile(request.slot)?;

    let response = AnswerResponse {
        schema_version: crate::SCHEMA_VERSION,
        success: true,
        outcome: match outcome {
            AnswerOutcome::Advanced { .. } => "advanced".to_string(),
            AnswerOutcome::PhaseComplete { .. } => "phase_complete".to_string(),
        },
        phase: profile.phase,
        situation_index: profile.situation_index,
        revision: ctx.revision(),
    };
    Ok(serde_json::to_string(&response)?)
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub schema_version: u8,
    pub slot: usize,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub schema_version: u8,
    pub success: bool,
    pub phase: Phase,
    pub revision: u64,
}

pub fn process_confirm(ctx: &mut SessionContext, request_json: &str) -> Result<String, CoreError> {
    let request: ConfirmRequest = parse_request(request_json)?;
    check_schema(request.schema_version)?;

    let phase = engine::confirm_debrief(ctx, request.slot)?;
    let response = ConfirmResponse {
        schema_version: crate::SCHEMA_VERSION,
        success: true,
        phase,
        revision: ctx.revision(),
    };
    Ok(serde_json::to_string(&response)?)
}

// ========================
// Simulation View
// ========================

#[derive(Debug, Deserialize)]
pub struct SimulationViewRequest {
    pub schema_version: u8,
    pub slot: usize,
}

/// Payload for an active (answering) phase.
#[derive(Debug, Serialize)]
pub struct SituationJson {
    /// 1-based situation number.
    pub number: usize,
    pub total: usize,
    pub fraction: f64,
    pub text: String,
    pub choices: Vec<String>,
}

/// Payload for a debrief phase.
#[derive(Debug, Serialize)]
pub struct DebriefJson {
    pub title: String,
    pub radar: RadarSeries,
    pub dominant: String,
    /// Both rounds' history; only present in the final debrief.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_phase_1: Option<Vec<HistoryEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_phase_2: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Serialize)]
pub struct SimulationViewResponse {
    pub schema_version: u8,
    pub profile: String,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<SituationJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debrief: Option<DebriefJson>,
}

pub fn process_simulation_view(
    ctx: &SessionContext,
    request_json: &str,
) -> Result<String, CoreError> {
    let request: SimulationViewRequest = parse_request(request_json)?;
    check_schema(request.schema_version)?;

    let profile = ctx.profile(request.slot)?;
    let mut response = SimulationViewResponse {
        schema_version: crate::SCHEMA_VERSION,
        profile: profile.name.clone(),
        phase: profile.phase,
        situation: None,
        debrief: None,
    };

    match profile.phase {
        Phase::Phase1 | Phase::Phase2 => {
            let set = engine::active_situations(profile)?;
            let progress = engine::progress(profile)?;
            let situation = &set[profile.situation_index];
            response.situation = Some(SituationJson {
                number: progress.current,
                total: progress.total,
                fraction: progress.fraction(),
                text: situation.text.to_string(),
                choices: situation.choices.iter().map(|c| c.text.to_string()).collect(),
            });
        }
        Phase::Debrief1 => {
            let dominant = engine::choose_dominant_error(&profile.errors_phase_1);
            response.debrief = Some(DebriefJson {
                title: "Débriefing Round 1".to_string(),
                radar: RadarSeries::from_tally("Erreurs Round 1", &profile.errors_phase_1),
                dominant: dominant.label().to_string(),
                history_phase_1: None,
                history_phase_2: None,
            });
        }
        Phase::DebriefFinal => {
            let total = report::total_errors(profile);
            let dominant = engine::choose_dominant_error(&total);
            response.debrief = Some(DebriefJson {
                title: "Fin du scénario".to_string(),
                radar: RadarSeries::from_tally("Erreurs cumulées Round 1 & 2", &total),
                dominant: dominant.label().to_string(),
                history_phase_1: Some(profile.history_phase_1.clone()),
                history_phase_2: Some(profile.history_phase_2.clone()),
            });
        }
    }

    Ok(serde_json::to_string(&response)?)
}

// ========================
// Analysis View
// ========================

#[derive(Debug, Deserialize)]
pub struct AnalysisViewRequest {
    pub schema_version: u8,
    /// Optional profile slot for the individual drill-down.
    #[serde(default)]
    pub slot: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct IndividualJson {
    pub name: String,
    pub radar: RadarSeries,
    pub history_phase_1: Vec<HistoryEntry>,
    pub history_phase_2: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisViewResponse {
    pub schema_version: u8,
    pub team_radar: RadarSeries,
    pub team_table: TeamTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<IndividualJson>,
}

/// Read-only by construction: the context is taken by shared reference.
pub fn process_analysis_view(
    ctx: &SessionContext,
    request_json: &str,
) -> Result<String, CoreError> {
    let request: AnalysisViewRequest = parse_request(request_json)?;
    check_schema(request.schema_version)?;

    let profiles = ctx.visible_profiles();
    let average = report::team_average(profiles);

    let individual = match request.slot {
        Some(slot) => {
            let profile = ctx.profile(slot)?;
            Some(IndividualJson {
                name: profile.name.clone(),
                radar: RadarSeries::from_tally(
                    format!("Profil d'erreurs de {}", profile.name),
                    &report::total_errors(profile),
                ),
                history_phase_1: profile.history_phase_1.clone(),
                history_phase_2: profile.history_phase_2.clone(),
            })
        }
        None => None,
    };

    let response = AnalysisViewResponse {
        schema_version: crate::SCHEMA_VERSION,
        team_radar: RadarSeries::from_average("Profil d'erreurs moyen de l'équipe", &average),
        team_table: report::team_table(profiles),
        individual,
    };
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_count_clamps_and_lists_names() {
        let mut ctx = SessionContext::new(3);
        let request = json!({ "schema_version": 1, "profile_count": 42 }).to_string();

        let response = process_profile_count(&mut ctx, &request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["profile_count"], 10);
        assert_eq!(parsed["profiles"][0], "Employé 1");
        assert_eq!(parsed["profiles"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_answer_round_trip() {
        let mut ctx = SessionContext::new(3);
        let request = json!({
            "schema_version": 1,
            "slot": 0,
            "choice_text": "Ne rien dire"
        })
        .to_string();

        let response = process_answer(&mut ctx, &request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["outcome"], "advanced");
        assert_eq!(parsed["phase"], "phase_1");
        assert_eq!(parsed["situation_index"], 1);
    }

    #[test]
    fn test_answer_invalid_choice_is_error() {
        let mut ctx = SessionContext::new(3);
        let request = json!({
            "schema_version": 1,
            "slot": 0,
            "choice_text": "Pas une option"
        })
        .to_string();

        let err = process_answer(&mut ctx, &request).unwrap_err();
        assert!(matches!(err, CoreError::InvalidChoice(_)));
    }

    #[test]
    fn test_unsupported_schema_version_rejected() {
        let mut ctx = SessionContext::new(3);
        let request = json!({ "schema_version": 9, "profile_count": 3 }).to_string();
        let err = process_profile_count(&mut ctx, &request).unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let mut ctx = SessionContext::new(3);
        let err = process_answer(&mut ctx, "not json").unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter(_)));
    }

    #[test]
    fn test_simulation_view_active_phase() {
        let ctx = SessionContext::new(3);
        let request = json!({ "schema_version": 1, "slot": 0 }).to_string();

        let response = process_simulation_view(&ctx, &request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["phase"], "phase_1");
        assert_eq!(parsed["situation"]["number"], 1);
        assert_eq!(parsed["situation"]["total"], 3);
        assert_eq!(parsed["situation"]["choices"].as_array().unwrap().len(), 3);
        assert!(parsed.get("debrief").is_none());
    }

    #[test]
    fn test_simulation_view_debrief() {
        let mut ctx = SessionContext::new(3);
        for text in [
            "Lui rappeler immédiatement de le mettre",
            "Demander de l’aide pour soulever",
            "Signaler immédiatement au chef de chantier",
        ] {
            let request =
                json!({ "schema_version": 1, "slot": 0, "choice_text": text }).to_string();
            process_answer(&mut ctx, &request).unwrap();
        }

        let request = json!({ "schema_version": 1, "slot": 0 }).to_string();
        let response = process_simulation_view(&ctx, &request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["phase"], "debrief_1");
        assert_eq!(parsed["debrief"]["dominant"], "Autres");
        assert!(parsed["debrief"].get("history_phase_1").is_none());
    }

    #[test]
    fn test_analysis_view_is_read_only() {
        let ctx = SessionContext::new(3);
        let revision = ctx.revision();
        let request = json!({ "schema_version": 1, "slot": 1 }).to_string();

        let response = process_analysis_view(&ctx, &request).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(parsed["team_table"]["profile_names"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["individual"]["name"], "Employé 2");
        assert_eq!(ctx.revision(), revision);
    }
}
