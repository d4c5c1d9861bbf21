//! Text renderers for the simulation and analysis views.
//!
//! Pure string builders; the caller decides where they go. Widths are
//! computed over characters, not bytes, since every label is French.

use sp_core::{HistoryEntry, Progress, RadarSeries, TeamTable};

const BAR_WIDTH: usize = 30;

/// "Situation 2 / 3" with a proportional bar.
pub fn progress_line(progress: &Progress) -> String {
    let filled = ((progress.fraction() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "Situation {} / {}  [{}{}]",
        progress.current,
        progress.total,
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

/// Horizontal-bar rendering of an error-profile series, one line per
/// category, scaled to the series' radial axis bound.
pub fn bar_chart(series: &RadarSeries) -> String {
    let mut out = format!("{}\n", series.title);
    let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (label, value) in series.labels.iter().zip(&series.values) {
        let filled = ((value / series.axis_max) * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!(
            "  {}{}  {} {}\n",
            label,
            " ".repeat(label_width - label.chars().count()),
            "█".repeat(filled.min(BAR_WIDTH)),
            format_value(*value)
        ));
    }
    out
}

/// One line per answered situation: number, choice, error category.
pub fn history_table(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "  (aucune réponse)\n".to_string();
    }

    let choice_width = entries.iter().map(|e| e.choice.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in entries {
        let error = entry.error.map_or("-", |category| category.label());
        out.push_str(&format!(
            "  {} | {}{} | {}\n",
            entry.situation_number,
            entry.choice,
            " ".repeat(choice_width - entry.choice.chars().count()),
            error
        ));
    }
    out
}

/// Per-category error table: one column per profile plus the team mean.
pub fn team_table(table: &TeamTable) -> String {
    let label_width =
        table.rows.iter().map(|r| r.category.label().chars().count()).max().unwrap_or(0);

    let mut out = format!("  {}", " ".repeat(label_width));
    for name in &table.profile_names {
        out.push_str(&format!("  {}", name));
    }
    out.push_str("  Moyenne équipe\n");

    for row in &table.rows {
        let label = row.category.label();
        out.push_str(&format!("  {}{}", label, " ".repeat(label_width - label.chars().count())));
        for (name, count) in table.profile_names.iter().zip(&row.per_profile) {
            out.push_str(&format!("  {:>width$}", count, width = name.chars().count()));
        }
        out.push_str(&format!("  {:>14}\n", format_value(row.average)));
    }
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{:.2}", value)
    }
}
