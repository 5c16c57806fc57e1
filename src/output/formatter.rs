use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::leads::ScoredLead;
use crate::scoring::{Dimension, LeadScore, ScoreResult, Tier};

/// Tier name padded to a fixed width, colored when requested
fn format_tier(tier: Tier, use_colors: bool) -> String {
    let padded = format!("{:<6}", tier.as_str());
    if !use_colors {
        return padded;
    }
    match tier {
        Tier::High => padded.green().bold().to_string(),
        Tier::Medium => padded.yellow().to_string(),
        Tier::Low => padded.red().to_string(),
    }
}

/// One-line summary: total, tier and the five sub-scores
/// Format: "91/100 high   budget 30/30, urgency 25/25, ..."
pub fn format_score_summary(score: &LeadScore, use_colors: bool) -> String {
    let parts = Dimension::ALL
        .iter()
        .map(|d| {
            format!(
                "{} {}/{}",
                d.label().to_lowercase(),
                score.sub_score(*d),
                d.max_points()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let total = format!("{:>3}/100", score.total);
    if use_colors {
        format!("{} {} {}", total.bold(), format_tier(score.tier, true), parts.dimmed())
    } else {
        format!("{} {} {}", total, format_tier(score.tier, false), parts)
    }
}

/// Multi-line breakdown, one row per dimension with the answers that matched
pub fn format_breakdown(result: &ScoreResult, use_colors: bool) -> String {
    let mut lines = vec![format_score_summary(&result.score, use_colors)];

    for factor in &result.breakdown.factors {
        let points = format!("{:>2}/{:<2}", factor.points, factor.dimension.max_points());
        let detail = if factor.matched.is_empty() {
            "no answer".to_string()
        } else if factor.raw > factor.points {
            format!("{} (capped from {})", factor.matched.join(", "), factor.raw)
        } else {
            factor.matched.join(", ")
        };

        if use_colors {
            lines.push(format!(
                "  {:<15} {}  {}",
                factor.dimension.label(),
                points.bold(),
                detail.dimmed()
            ));
        } else {
            lines.push(format!(
                "  {:<15} {}  {}",
                factor.dimension.label(),
                points,
                detail
            ));
        }
    }

    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format ranked leads as a table with columns: Index, Total, Tier, Name, Source
/// No headers. Index column fits "99.", total column fits "100".
pub fn format_ranked_table(leads: &[ScoredLead], use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = "  ";

    leads
        .iter()
        .enumerate()
        .map(|(idx, lead)| {
            let index_str = format!("{:>2}.", idx + 1);
            let total_str = format!("{:>3}", lead.result.score.total);
            let tier_str = format_tier(lead.result.score.tier, use_colors);

            // index(3) + space + total(3) + separator + tier(6) + separator*2 + source
            let fixed_width = 3 + 1 + 3 + separator.len() * 3 + 6 + lead.source.len();
            let full_name = lead.display_name();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&full_name, width - fixed_width)
                }
                Some(_) => truncate_name(&full_name, 20),
                None => full_name,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    total_str.bold(),
                    separator,
                    tier_str,
                    separator,
                    name,
                    separator,
                    lead.source.underline()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, total_str, separator, tier_str, separator, name, separator, lead.source
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format leads as tab-separated values for scripting
/// Columns: total, tier, budget, urgency, company_size, tech_readiness, decision_maker, source
pub fn format_tsv(leads: &[ScoredLead]) -> String {
    leads
        .iter()
        .map(|lead| {
            let score = &lead.result.score;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                score.total,
                score.tier,
                score.budget,
                score.urgency,
                score.company_size,
                score.tech_readiness,
                score.decision_maker,
                lead.source
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output as JSON")
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}
