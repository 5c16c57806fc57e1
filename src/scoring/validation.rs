use std::collections::HashSet;

use super::config::ScoringConfig;
use super::factors::Dimension;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for dimension in Dimension::ALL {
        let key = dimension.config_key();
        let max = dimension.max_points();
        let signals = config.signals(dimension);

        let configured = match dimension {
            Dimension::Budget => config.budget.is_some(),
            Dimension::Urgency => config.urgency.is_some(),
            Dimension::CompanySize => config.company_size.is_some(),
            Dimension::TechReadiness => config.tech_readiness.is_some(),
            Dimension::DecisionMaker => config.decision_maker.is_some(),
        };
        if configured && signals.is_empty() {
            errors.push(format!("scoring.{}: must list at least one signal", key));
        }

        let mut seen_fields = HashSet::new();
        for (i, signal) in signals.iter().enumerate() {
            if !seen_fields.insert(signal.field) {
                errors.push(format!(
                    "scoring.{}[{}].field: '{}' is already used by this dimension",
                    key, i, signal.field
                ));
            }

            if signal.points.is_empty() {
                errors.push(format!("scoring.{}[{}].points: must not be empty", key, i));
            }

            let mut seen_answers = HashSet::new();
            for (answer, points) in &signal.points {
                if answer.trim().is_empty() {
                    errors.push(format!(
                        "scoring.{}[{}].points: answer must not be blank",
                        key, i
                    ));
                }
                if !seen_answers.insert(answer.trim().to_ascii_lowercase()) {
                    errors.push(format!(
                        "scoring.{}[{}].points.{}: duplicates another answer (case-insensitive)",
                        key, i, answer
                    ));
                }
                if *points > max {
                    errors.push(format!(
                        "scoring.{}[{}].points.{}: {} exceeds the {} maximum of {}",
                        key,
                        i,
                        answer,
                        points,
                        dimension.label().to_lowercase(),
                        max
                    ));
                }
            }
        }
    }

    if let Some(tiers) = config.tiers {
        if tiers.high > 100 {
            errors.push("scoring.tiers.high: must be at most 100".to_string());
        }
        if tiers.medium > 100 {
            errors.push("scoring.tiers.medium: must be at most 100".to_string());
        }
        if tiers.medium > tiers.high {
            errors.push(format!(
                "scoring.tiers: medium ({}) must not exceed high ({})",
                tiers.medium, tiers.high
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
