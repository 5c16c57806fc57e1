use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Scoring config with any dimension the file leaves out filled from the defaults
    pub fn effective_scoring(&self) -> ScoringConfig {
        match &self.scoring {
            Some(scoring) => scoring.clone().with_defaults(),
            None => ScoringConfig::default(),
        }
    }
}
