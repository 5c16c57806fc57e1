use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::ScoringConfig;
use super::factors::{Dimension, Signal, Tier};
use crate::form::ContactFormData;

/// Five sub-scores, their total and the derived tier.
///
/// `total` is always the sum of the sub-scores and each sub-score stays within
/// its dimension maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadScore {
    pub budget: u32,
    pub urgency: u32,
    pub company_size: u32,
    pub tech_readiness: u32,
    pub decision_maker: u32,
    pub total: u32,
    pub tier: Tier,
}

impl Default for LeadScore {
    fn default() -> Self {
        Self {
            budget: 0,
            urgency: 0,
            company_size: 0,
            tech_readiness: 0,
            decision_maker: 0,
            total: 0,
            tier: Tier::Low,
        }
    }
}

impl LeadScore {
    pub fn sub_score(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Budget => self.budget,
            Dimension::Urgency => self.urgency,
            Dimension::CompanySize => self.company_size,
            Dimension::TechReadiness => self.tech_readiness,
            Dimension::DecisionMaker => self.decision_maker,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub dimension: Dimension,
    pub matched: Vec<String>, // e.g. "budgetRange=over-100k (+30)"
    pub raw: u32,             // Sum of matched signals before capping
    pub points: u32,          // Sub-score after capping at the dimension max
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: LeadScore,
    pub breakdown: ScoreBreakdown,
}

/// Score a (possibly partial) form.
///
/// Unset fields and answers missing from a table contribute 0. Never fails.
pub fn calculate_score(form: &ContactFormData, config: &ScoringConfig) -> ScoreResult {
    let factors: Vec<FactorContribution> = Dimension::ALL
        .iter()
        .map(|dimension| evaluate_dimension(form, *dimension, config.signals(*dimension)))
        .collect();

    let points = |dimension: Dimension| {
        factors
            .iter()
            .find(|f| f.dimension == dimension)
            .map(|f| f.points)
            .unwrap_or(0)
    };

    let budget = points(Dimension::Budget);
    let urgency = points(Dimension::Urgency);
    let company_size = points(Dimension::CompanySize);
    let tech_readiness = points(Dimension::TechReadiness);
    let decision_maker = points(Dimension::DecisionMaker);
    let total = budget + urgency + company_size + tech_readiness + decision_maker;

    ScoreResult {
        score: LeadScore {
            budget,
            urgency,
            company_size,
            tech_readiness,
            decision_maker,
            total,
            tier: config.thresholds().tier_for(total),
        },
        breakdown: ScoreBreakdown { factors },
    }
}

/// Shorthand for [`calculate_score`] when the breakdown is not needed.
pub fn score_lead(form: &ContactFormData, config: &ScoringConfig) -> LeadScore {
    calculate_score(form, config).score
}

fn evaluate_dimension(
    form: &ContactFormData,
    dimension: Dimension,
    signals: &[Signal],
) -> FactorContribution {
    let mut raw: u32 = 0;
    let mut matched = Vec::new();

    for signal in signals {
        // Set fields count their strongest answer only
        let mut best: Option<(&str, u32)> = None;
        for answer in form.values(signal.field) {
            match signal.points_for(answer) {
                Some(points) => {
                    if best.map_or(true, |(_, b)| points > b) {
                        best = Some((answer, points));
                    }
                }
                None => debug!(field = %signal.field, answer, "no points for answer"),
            }
        }

        if let Some((answer, points)) = best {
            raw = raw.saturating_add(points);
            matched.push(format!("{}={} (+{})", signal.field, answer, points));
        }
    }

    FactorContribution {
        dimension,
        matched,
        raw,
        points: raw.min(dimension.max_points()),
    }
}
