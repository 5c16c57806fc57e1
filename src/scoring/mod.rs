pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use config::*;
pub use factors::{Dimension, Signal, Tier, TierThresholds};
pub use engine::{calculate_score, score_lead, FactorContribution, LeadScore, ScoreBreakdown, ScoreResult};
pub use validation::validate_scoring;
