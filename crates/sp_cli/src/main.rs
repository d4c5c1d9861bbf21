//! Prevention Simulator CLI
//!
//! Interactive terminal front-end over a single in-memory session: the
//! simulation view walks one profile at a time through the scripted
//! situations and debriefs, the analysis view shows team-level summaries.
//! Each user action triggers one synchronous state update followed by a
//! re-render; the session's revision counter decides when to redraw.

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use sp_core::{
    api, engine, report, Phase, ProfileState, RadarSeries, SessionContext,
};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "sp_cli")]
#[command(about = "Simulateur de prévention chantier - Multi-profils", long_about = None)]
struct Cli {
    /// Number of trainee profiles (3-10, values outside are clamped)
    #[arg(long, default_value_t = sp_core::DEFAULT_PROFILES)]
    profiles: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    sp_core::validate_catalog().context("scenario catalog failed validation")?;

    let mut ctx = SessionContext::new(cli.profiles);
    if ctx.profile_count() != cli.profiles {
        println!("⚠️  Nombre de profils ajusté à {}", ctx.profile_count());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("🏗️  Simulateur de prévention chantier - Multi-profils");
    loop {
        println!();
        println!("[1] Simulation  [2] Analyse  [q] Quitter");
        let Some(command) = prompt(&mut input, "> ")? else { break };
        match command.as_str() {
            "1" => simulation_view(&mut ctx, &mut input)?,
            "2" => analysis_view(&ctx, &mut input)?,
            "q" | "Q" => break,
            other => println!("Commande inconnue: {}", other),
        }
    }
    Ok(())
}

// ========================
// Simulation View
// ========================

fn simulation_view(ctx: &mut SessionContext, input: &mut impl BufRead) -> Result<()> {
    println!();
    println!("📋 Choix du profil");
    for (index, profile) in ctx.visible_profiles().iter().enumerate() {
        println!("  [{}] {}", index + 1, profile.name);
    }

    let Some(line) = prompt(input, "Profil à simuler > ")? else { return Ok(()) };
    let Some(slot) = parse_slot(&line, ctx.profile_count()) else {
        println!("Profil invalide: {}", line);
        return Ok(());
    };

    // Redraw only when the session actually changed (invalid input keeps
    // the current screen and just re-prompts).
    let mut rendered_at: Option<u64> = None;
    loop {
        if rendered_at != Some(ctx.revision()) {
            render_profile_screen(ctx.profile(slot)?)?;
            rendered_at = Some(ctx.revision());
        }

        match ctx.profile(slot)?.phase {
            Phase::Phase1 | Phase::Phase2 => {
                let Some(line) = prompt(input, "Votre choix (numéro, r pour revenir) > ")?
                else {
                    return Ok(());
                };
                if line == "r" {
                    return Ok(());
                }

                let profile = ctx.profile(slot)?;
                let situation_index = profile.situation_index;
                let set = engine::active_situations(profile)?;
                let choice = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| set[situation_index].choices.get(i));

                match choice {
                    Some(choice) => {
                        engine::answer_current_situation(ctx, slot, choice.text)?;
                    }
                    None => println!("Choix invalide: {}", line),
                }
            }
            Phase::Debrief1 => {
                let Some(line) =
                    prompt(input, "[Entrée] Passer à la suite du scénario  [r] Revenir > ")?
                else {
                    return Ok(());
                };
                match line.as_str() {
                    "" => {
                        engine::confirm_debrief(ctx, slot)?;
                    }
                    "r" => return Ok(()),
                    other => println!("Commande inconnue: {}", other),
                }
            }
            Phase::DebriefFinal => {
                let _ = prompt(input, "[Entrée] Revenir au menu > ")?;
                return Ok(());
            }
        }
    }
}

fn render_profile_screen(profile: &ProfileState) -> Result<()> {
    println!();
    match profile.phase {
        Phase::Phase1 | Phase::Phase2 => {
            let set = engine::active_situations(profile)?;
            let situation = &set[profile.situation_index];
            println!("=== {} ===", profile.name);
            println!("{}", render::progress_line(&engine::progress(profile)?));
            println!();
            println!("{}", situation.text);
            for (index, choice) in situation.choices.iter().enumerate() {
                println!("  [{}] {}", index + 1, choice.text);
            }
        }
        Phase::Debrief1 => {
            println!("📋 Débriefing Round 1 - {}", profile.name);
            let radar = RadarSeries::from_tally("Erreurs Round 1", &profile.errors_phase_1);
            print!("{}", render::bar_chart(&radar));
            let dominant = engine::choose_dominant_error(&profile.errors_phase_1);
            println!("Erreur dominante : {}", dominant);
        }
        Phase::DebriefFinal => {
            println!("✅ Fin du scénario - {}", profile.name);
            let total = report::total_errors(profile);
            let radar = RadarSeries::from_tally("Erreurs cumulées Round 1 & 2", &total);
            print!("{}", render::bar_chart(&radar));
            println!("Erreur dominante globale : {}", engine::choose_dominant_error(&total));
            println!();
            println!("Historique complet");
            println!("Round 1");
            print!("{}", render::history_table(&profile.history_phase_1));
            println!("Round 2");
            print!("{}", render::history_table(&profile.history_phase_2));
        }
    }
    Ok(())
}

// ========================
// Analysis View
// ========================

fn analysis_view(ctx: &SessionContext, input: &mut impl BufRead) -> Result<()> {
    loop {
        let profiles = ctx.visible_profiles();

        println!();
        println!("📊 Synthèse collective");
        let average = report::team_average(profiles);
        let radar = RadarSeries::from_average("Profil d'erreurs moyen de l'équipe", &average);
        print!("{}", render::bar_chart(&radar));
        println!();
        println!("Détail des erreurs par profil :");
        print!("{}", render::team_table(&report::team_table(profiles)));

        println!();
        println!(
            "[1-{}] Analyse individuelle  [j] Export JSON  [r] Revenir",
            profiles.len()
        );
        let Some(line) = prompt(input, "> ")? else { return Ok(()) };
        match line.as_str() {
            "r" => return Ok(()),
            "j" => {
                let request =
                    serde_json::json!({ "schema_version": sp_core::SCHEMA_VERSION }).to_string();
                println!("{}", api::process_analysis_view(ctx, &request)?);
            }
            other => match parse_slot(other, profiles.len()) {
                Some(slot) => render_individual(ctx.profile(slot)?),
                None => println!("Commande inconnue: {}", other),
            },
        }
    }
}

fn render_individual(profile: &ProfileState) {
    println!();
    println!("👷 {}", profile.name);
    let total = report::total_errors(profile);
    let radar =
        RadarSeries::from_tally(format!("Profil d'erreurs de {}", profile.name), &total);
    print!("{}", render::bar_chart(&radar));
    println!("Round 1");
    print!("{}", render::history_table(&profile.history_phase_1));
    println!("Round 2");
    print!("{}", render::history_table(&profile.history_phase_2));
}

// ========================
// Input Helpers
// ========================

/// One trimmed line from the user; `None` once input is exhausted.
fn prompt(input: &mut impl BufRead, text: &str) -> Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// 1-based slot number from user input, bounded by the visible count.
fn parse_slot(line: &str, count: usize) -> Option<usize> {
    line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).filter(|&slot| slot < count)
}
