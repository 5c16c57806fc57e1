use serde::{Deserialize, Serialize};

use super::factors::{Dimension, Signal, TierThresholds};
use crate::form::FormField;

/// Main scoring configuration.
///
/// Each dimension is a list of signals; a dimension's sub-score is the sum of
/// its signals, capped at the dimension maximum. Dimensions left out of a
/// config file keep their default tables (see [`ScoringConfig::with_defaults`]).
///
/// Example YAML:
/// ```yaml
/// scoring:
///   budget:
///     - field: budgetRange
///       points: { under-10k: 5, 10k-25k: 10, over-100k: 30 }
///   tiers:
///     high: 75
///     medium: 45
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    #[serde(default)]
    pub budget: Option<Vec<Signal>>,

    #[serde(default)]
    pub urgency: Option<Vec<Signal>>,

    #[serde(default)]
    pub company_size: Option<Vec<Signal>>,

    #[serde(default)]
    pub tech_readiness: Option<Vec<Signal>>,

    #[serde(default)]
    pub decision_maker: Option<Vec<Signal>>,

    /// Tier cut-offs (default: high >= 70, medium >= 40)
    #[serde(default)]
    pub tiers: Option<TierThresholds>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            budget: Some(vec![Signal::new(
                FormField::BudgetRange,
                [
                    ("not-sure", 0),
                    ("under-10k", 5),
                    ("10k-25k", 10),
                    ("25k-50k", 18),
                    ("50k-100k", 24),
                    ("over-100k", 30),
                ],
            )]),
            urgency: Some(vec![Signal::new(
                FormField::Urgency,
                [
                    ("exploring", 0),
                    ("6-12-months", 4),
                    ("3-6-months", 8),
                    ("1-3-months", 15),
                    ("within-month", 20),
                    ("immediate", 25),
                ],
            )]),
            company_size: Some(vec![Signal::new(
                FormField::CompanySize,
                [
                    ("1-10", 4),
                    ("11-50", 8),
                    ("51-200", 12),
                    ("201-500", 16),
                    ("501-1000", 18),
                    ("1000+", 20),
                ],
            )]),
            tech_readiness: Some(vec![
                Signal::new(
                    FormField::PreviousAiExperience,
                    [
                        ("none", 0),
                        ("exploring", 3),
                        ("basic", 6),
                        ("intermediate", 8),
                        ("advanced", 10),
                    ],
                ),
                Signal::new(
                    FormField::DataReadiness,
                    [
                        ("none", 0),
                        ("scattered", 1),
                        ("organized", 3),
                        ("production", 5),
                    ],
                ),
            ]),
            decision_maker: Some(vec![Signal::new(
                FormField::DecisionMakers,
                [("no", 0), ("influencer", 3), ("shared", 6), ("yes", 10)],
            )]),
            tiers: Some(TierThresholds::default()),
        }
    }
}

impl ScoringConfig {
    /// Fill every dimension the config leaves unset with its default table.
    pub fn with_defaults(self) -> Self {
        let defaults = Self::default();
        Self {
            budget: self.budget.or(defaults.budget),
            urgency: self.urgency.or(defaults.urgency),
            company_size: self.company_size.or(defaults.company_size),
            tech_readiness: self.tech_readiness.or(defaults.tech_readiness),
            decision_maker: self.decision_maker.or(defaults.decision_maker),
            tiers: self.tiers.or(defaults.tiers),
        }
    }

    /// Signals for a dimension. An unset dimension has none and scores 0.
    pub fn signals(&self, dimension: Dimension) -> &[Signal] {
        let signals = match dimension {
            Dimension::Budget => &self.budget,
            Dimension::Urgency => &self.urgency,
            Dimension::CompanySize => &self.company_size,
            Dimension::TechReadiness => &self.tech_readiness,
            Dimension::DecisionMaker => &self.decision_maker,
        };
        signals.as_deref().unwrap_or(&[])
    }

    pub fn thresholds(&self) -> TierThresholds {
        self.tiers.unwrap_or_default()
    }

    /// Answers that earn points for a field, weakest first
    pub fn known_answers(&self, field: FormField) -> Vec<String> {
        let mut answers: Vec<(u32, &String)> = Dimension::ALL
            .iter()
            .flat_map(|d| self.signals(*d))
            .filter(|s| s.field == field)
            .flat_map(|s| s.points.iter().map(|(answer, points)| (*points, answer)))
            .collect();
        answers.sort();
        answers.dedup_by(|a, b| a.1.eq_ignore_ascii_case(b.1));
        answers.into_iter().map(|(_, answer)| answer.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        for dimension in Dimension::ALL {
            assert!(!config.signals(dimension).is_empty(), "{} has no signals", dimension);
        }
        assert_eq!(config.thresholds(), TierThresholds::default());
    }

    #[test]
    fn test_default_tables_saturate_each_dimension() {
        let config = ScoringConfig::default();

        for dimension in Dimension::ALL {
            let best: u32 = config.signals(dimension).iter().map(Signal::max_entry).sum();
            assert!(
                best >= dimension.max_points(),
                "{} can only reach {} of {}",
                dimension,
                best,
                dimension.max_points()
            );
        }
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
urgency:
  - field: urgency
    points:
      asap: 25
      later: 5
tiers:
  high: 80
  medium: 50
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.budget.is_none());
        assert_eq!(config.signals(Dimension::Urgency).len(), 1);
        assert_eq!(config.thresholds().high, 80);
        assert!(config.signals(Dimension::Budget).is_empty());
    }

    #[test]
    fn test_with_defaults_keeps_overrides() {
        let config = ScoringConfig {
            budget: None,
            urgency: Some(vec![Signal::new(FormField::Timeline, [("q1", 25)])]),
            company_size: None,
            tech_readiness: None,
            decision_maker: None,
            tiers: None,
        }
        .with_defaults();

        assert_eq!(config.signals(Dimension::Urgency)[0].field, FormField::Timeline);
        assert_eq!(
            config.signals(Dimension::Budget),
            ScoringConfig::default().signals(Dimension::Budget)
        );
        assert_eq!(config.thresholds(), TierThresholds::default());
    }

    #[test]
    fn test_known_answers_weakest_first() {
        let config = ScoringConfig::default();
        assert_eq!(
            config.known_answers(FormField::DecisionMakers),
            vec!["no", "influencer", "shared", "yes"]
        );
        assert!(config.known_answers(FormField::Email).is_empty());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.budget.is_none());
        assert!(config.tiers.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "weights: {}\n";
        assert!(serde_saphyr::from_str::<ScoringConfig>(yaml).is_err());
    }
}
