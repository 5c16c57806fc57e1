use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::form::{ContactFormData, FormField};
use crate::scoring::{calculate_score, ScoreResult, ScoringConfig};

/// How to read a lead file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
    /// Try JSON first, then YAML
    Auto,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                InputFormat::Yaml
            }
            _ => InputFormat::Auto,
        }
    }
}

/// Form answers plus where they came from (file name, `#N` for list entries)
#[derive(Debug, Clone, PartialEq)]
pub struct LeadInput {
    pub source: String,
    pub form: ContactFormData,
}

#[derive(Debug, Clone)]
pub struct ScoredLead {
    pub source: String,
    pub form: ContactFormData,
    pub result: ScoreResult,
}

impl ScoredLead {
    /// Short human name: "First Last (Company)", whatever parts are known
    pub fn display_name(&self) -> String {
        let person: Vec<String> = [FormField::FirstName, FormField::LastName]
            .iter()
            .filter_map(|f| self.form.display_value(*f))
            .collect();
        let company = self.form.display_value(FormField::CompanyName);

        match (person.is_empty(), company) {
            (false, Some(company)) => format!("{} ({})", person.join(" "), company),
            (false, None) => person.join(" "),
            (true, Some(company)) => company,
            (true, None) => self.source.clone(),
        }
    }
}

/// Parse one document holding either a single lead (an object) or a list of leads.
pub fn parse_leads(content: &str, format: InputFormat, source: &str) -> Result<Vec<LeadInput>> {
    let value: Value = match format {
        InputFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("Failed to parse {} as JSON", source))?,
        InputFormat::Yaml => serde_saphyr::from_str(content)
            .with_context(|| format!("Failed to parse {} as YAML", source))?,
        InputFormat::Auto => match serde_json::from_str(content) {
            Ok(value) => value,
            Err(json_err) => {
                debug!(source, error = %json_err, "not JSON, trying YAML");
                serde_saphyr::from_str(content)
                    .with_context(|| format!("Failed to parse {} as JSON or YAML", source))?
            }
        },
    };

    let leads = match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| LeadInput {
                source: format!("{}#{}", source, i + 1),
                form: ContactFormData::from_value(item),
            })
            .collect(),
        other => vec![LeadInput {
            source: source.to_string(),
            form: ContactFormData::from_value(&other),
        }],
    };

    Ok(leads)
}

pub fn load_leads(path: &Path) -> Result<Vec<LeadInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lead file at {}", path.display()))?;
    parse_leads(&content, InputFormat::from_path(path), &path.display().to_string())
}

pub fn read_leads<R: Read>(mut reader: R, source: &str) -> Result<Vec<LeadInput>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read {}", source))?;
    parse_leads(&content, InputFormat::Auto, source)
}

/// Score every lead and sort by total descending. Ties keep input order.
pub fn score_and_rank(leads: Vec<LeadInput>, config: &ScoringConfig) -> Vec<ScoredLead> {
    let mut scored: Vec<ScoredLead> = leads
        .into_iter()
        .map(|lead| {
            let result = calculate_score(&lead.form, config);
            ScoredLead {
                source: lead.source,
                form: lead.form,
                result,
            }
        })
        .collect();

    // Stable sort, so equal totals stay in input order
    scored.sort_by(|a, b| b.result.score.total.cmp(&a.result.score.total));
    scored
}
