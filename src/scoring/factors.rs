use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::form::FormField;

/// One weighted dimension of the lead-scoring rubric.
///
/// Maxima are fixed and sum to 100, so a total is always a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Budget,
    Urgency,
    CompanySize,
    TechReadiness,
    DecisionMaker,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Budget,
        Dimension::Urgency,
        Dimension::CompanySize,
        Dimension::TechReadiness,
        Dimension::DecisionMaker,
    ];

    pub fn max_points(self) -> u32 {
        match self {
            Dimension::Budget => 30,
            Dimension::Urgency => 25,
            Dimension::CompanySize => 20,
            Dimension::TechReadiness => 15,
            Dimension::DecisionMaker => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Budget => "Budget",
            Dimension::Urgency => "Urgency",
            Dimension::CompanySize => "Company size",
            Dimension::TechReadiness => "Tech readiness",
            Dimension::DecisionMaker => "Decision maker",
        }
    }

    /// Key used for this dimension in the config file
    pub fn config_key(self) -> &'static str {
        match self {
            Dimension::Budget => "budget",
            Dimension::Urgency => "urgency",
            Dimension::CompanySize => "company_size",
            Dimension::TechReadiness => "tech_readiness",
            Dimension::DecisionMaker => "decision_maker",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps the answers of one form field to points.
///
/// Example YAML:
/// ```yaml
/// field: budgetRange
/// points:
///   under-10k: 5
///   over-100k: 30
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Signal {
    pub field: FormField,
    pub points: BTreeMap<String, u32>,
}

impl Signal {
    pub fn new<I, K>(field: FormField, points: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Self {
            field,
            points: points.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Points for an answer, matched case-insensitively. `None` if the table
    /// has no entry for it.
    pub fn points_for(&self, answer: &str) -> Option<u32> {
        let answer = answer.trim();
        self.points
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(answer))
            .map(|(_, points)| *points)
    }

    pub fn max_entry(&self) -> u32 {
        self.points.values().copied().max().unwrap_or(0)
    }
}

/// Coarse sales priority of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum totals for the high and medium tiers. Anything below `medium` is low.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TierThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 70,
            medium: 40,
        }
    }
}

impl TierThresholds {
    pub fn tier_for(&self, total: u32) -> Tier {
        if total >= self.high {
            Tier::High
        } else if total >= self.medium {
            Tier::Medium
        } else {
            Tier::Low
        }
    }
}
