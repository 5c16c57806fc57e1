use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use super::fields::{FieldKind, FormField};

/// Answers collected by the contact form.
///
/// Every field is optional until submission. Single answers are trimmed
/// strings; `services` and `currentTechStack` are sets. Deserializing goes
/// through [`ContactFormData::from_value`], so it accepts the same loose input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct ContactFormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub services: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_range: Option<String>,
    #[serde(
        default,
        rename = "previousAIExperience",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_ai_experience: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub current_tech_stack: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_readiness: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_makers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hear_about_us: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl ContactFormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build form data from an arbitrary JSON/YAML value.
    ///
    /// Never fails: unknown keys are ignored, numbers and booleans are coerced
    /// to strings, and values of the wrong shape are dropped.
    pub fn from_value(value: &Value) -> Self {
        let mut data = Self::new();

        let Some(object) = value.as_object() else {
            debug!("form input is not an object, treating as empty");
            return data;
        };

        for (key, raw) in object {
            let field = match key.parse::<FormField>() {
                Ok(field) => field,
                Err(_) => {
                    debug!(field = %key, "ignoring unknown form field");
                    continue;
                }
            };

            match field.kind() {
                FieldKind::Single => {
                    let coerced = match raw {
                        Value::Array(items) => items.iter().find_map(coerce_scalar),
                        other => coerce_scalar(other),
                    };
                    if coerced.is_none() && !raw.is_null() {
                        debug!(field = %field, "ignoring malformed value");
                    }
                    if let Some(slot) = data.single_mut(field) {
                        *slot = coerced;
                    }
                }
                FieldKind::Multi => {
                    let values: BTreeSet<String> = match raw {
                        Value::Array(items) => items.iter().filter_map(coerce_scalar).collect(),
                        other => coerce_scalar(other).into_iter().collect(),
                    };
                    if values.is_empty() && !raw.is_null() {
                        debug!(field = %field, "ignoring malformed value");
                    }
                    if let Some(slot) = data.multi_mut(field) {
                        *slot = values;
                    }
                }
            }
        }

        data
    }

    /// Set a field from raw user input.
    ///
    /// Blank input clears the field. For set fields the input is split on commas.
    pub fn set_field(&mut self, field: FormField, raw: &str) {
        match field.kind() {
            FieldKind::Single => {
                let trimmed = raw.trim();
                if let Some(slot) = self.single_mut(field) {
                    *slot = (!trimmed.is_empty()).then(|| trimmed.to_string());
                }
            }
            FieldKind::Multi => {
                if let Some(slot) = self.multi_mut(field) {
                    *slot = raw
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                }
            }
        }
    }

    pub fn clear_field(&mut self, field: FormField) {
        if let Some(slot) = self.single_mut(field) {
            *slot = None;
        } else if let Some(slot) = self.multi_mut(field) {
            slot.clear();
        }
    }

    /// All answers given for a field (zero or one for single fields)
    pub fn values(&self, field: FormField) -> Vec<&str> {
        if let Some(value) = self.single(field) {
            value.as_deref().into_iter().collect()
        } else if let Some(set) = self.multi(field) {
            set.iter().map(String::as_str).collect()
        } else {
            Vec::new()
        }
    }

    /// Single answer for a field, joining set fields with ", "
    pub fn display_value(&self, field: FormField) -> Option<String> {
        let values = self.values(field);
        (!values.is_empty()).then(|| values.join(", "))
    }

    pub fn is_present(&self, field: FormField) -> bool {
        !self.values(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| !self.is_present(*f))
    }

    fn single(&self, field: FormField) -> Option<&Option<String>> {
        let slot = match field {
            FormField::PrimaryChallenge => &self.primary_challenge,
            FormField::ChallengeDescription => &self.challenge_description,
            FormField::Urgency => &self.urgency,
            FormField::Timeline => &self.timeline,
            FormField::CompanyName => &self.company_name,
            FormField::CompanySize => &self.company_size,
            FormField::Industry => &self.industry,
            FormField::Role => &self.role,
            FormField::Website => &self.website,
            FormField::BudgetRange => &self.budget_range,
            FormField::PreviousAiExperience => &self.previous_ai_experience,
            FormField::DataReadiness => &self.data_readiness,
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::PreferredContact => &self.preferred_contact,
            FormField::DecisionMakers => &self.decision_makers,
            FormField::HearAboutUs => &self.hear_about_us,
            FormField::AdditionalNotes => &self.additional_notes,
            FormField::Services | FormField::CurrentTechStack => return None,
        };
        Some(slot)
    }

    fn single_mut(&mut self, field: FormField) -> Option<&mut Option<String>> {
        let slot = match field {
            FormField::PrimaryChallenge => &mut self.primary_challenge,
            FormField::ChallengeDescription => &mut self.challenge_description,
            FormField::Urgency => &mut self.urgency,
            FormField::Timeline => &mut self.timeline,
            FormField::CompanyName => &mut self.company_name,
            FormField::CompanySize => &mut self.company_size,
            FormField::Industry => &mut self.industry,
            FormField::Role => &mut self.role,
            FormField::Website => &mut self.website,
            FormField::BudgetRange => &mut self.budget_range,
            FormField::PreviousAiExperience => &mut self.previous_ai_experience,
            FormField::DataReadiness => &mut self.data_readiness,
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::PreferredContact => &mut self.preferred_contact,
            FormField::DecisionMakers => &mut self.decision_makers,
            FormField::HearAboutUs => &mut self.hear_about_us,
            FormField::AdditionalNotes => &mut self.additional_notes,
            FormField::Services | FormField::CurrentTechStack => return None,
        };
        Some(slot)
    }

    fn multi(&self, field: FormField) -> Option<&BTreeSet<String>> {
        match field {
            FormField::Services => Some(&self.services),
            FormField::CurrentTechStack => Some(&self.current_tech_stack),
            _ => None,
        }
    }

    fn multi_mut(&mut self, field: FormField) -> Option<&mut BTreeSet<String>> {
        match field {
            FormField::Services => Some(&mut self.services),
            FormField::CurrentTechStack => Some(&mut self.current_tech_stack),
            _ => None,
        }
    }
}

impl From<Value> for ContactFormData {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Coerce a scalar JSON value to a trimmed, non-empty string.
fn coerce_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some("no".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_known_fields() {
        let data = ContactFormData::from_value(&json!({
            "budgetRange": "over-100k",
            "previousAIExperience": "advanced",
            "services": ["strategy", "automation"],
        }));
        assert_eq!(data.budget_range.as_deref(), Some("over-100k"));
        assert_eq!(data.previous_ai_experience.as_deref(), Some("advanced"));
        assert_eq!(data.services.len(), 2);
    }

    #[test]
    fn test_from_value_ignores_unknown_fields() {
        let data = ContactFormData::from_value(&json!({
            "favouriteColour": "blue",
            "urgency": "immediate",
        }));
        assert_eq!(data.urgency.as_deref(), Some("immediate"));
    }

    #[test]
    fn test_from_value_treats_blank_as_absent() {
        let data = ContactFormData::from_value(&json!({
            "urgency": "   ",
            "budgetRange": null,
            "services": [],
        }));
        assert!(data.is_empty());
    }

    #[test]
    fn test_from_value_coerces_scalars() {
        let data = ContactFormData::from_value(&json!({
            "decisionMakers": true,
            "companySize": 50,
            "services": "strategy",
            "urgency": ["immediate", "exploring"],
        }));
        assert_eq!(data.decision_makers.as_deref(), Some("yes"));
        assert_eq!(data.company_size.as_deref(), Some("50"));
        assert!(data.services.contains("strategy"));
        assert_eq!(data.urgency.as_deref(), Some("immediate"));
    }

    #[test]
    fn test_from_value_drops_objects() {
        let data = ContactFormData::from_value(&json!({
            "budgetRange": { "min": 10, "max": 20 },
            "services": [{ "name": "x" }, "strategy"],
        }));
        assert!(data.budget_range.is_none());
        assert_eq!(data.services.len(), 1);
    }

    #[test]
    fn test_from_value_non_object_is_empty() {
        assert!(ContactFormData::from_value(&json!("hello")).is_empty());
        assert!(ContactFormData::from_value(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_set_field_trims_and_clears() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::Email, "  jane@example.com ");
        assert_eq!(data.email.as_deref(), Some("jane@example.com"));

        data.set_field(FormField::Email, "   ");
        assert!(data.email.is_none());
    }

    #[test]
    fn test_set_field_splits_sets() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::CurrentTechStack, "python, , aws,python");
        assert_eq!(data.values(FormField::CurrentTechStack), vec!["aws", "python"]);

        data.clear_field(FormField::CurrentTechStack);
        assert!(!data.is_present(FormField::CurrentTechStack));
    }

    #[test]
    fn test_serde_uses_web_form_keys() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::PreviousAiExperience, "basic");
        data.set_field(FormField::HearAboutUs, "podcast");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, json!({ "previousAIExperience": "basic", "hearAboutUs": "podcast" }));
    }

    #[test]
    fn test_deserialize_matches_from_value() {
        let input = json!({
            "budgetRange": 100000,
            "primaryChallenge": "   ",
            "urgency": "  immediate ",
            "services": "strategy",
            "decisionMakers": true,
            "companySize": { "min": 50 },
            "unknown": "ignored",
        });

        let data: ContactFormData = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(data, ContactFormData::from_value(&input));
        assert_eq!(data.budget_range.as_deref(), Some("100000"));
        assert!(!data.is_present(FormField::PrimaryChallenge));
        assert_eq!(data.urgency.as_deref(), Some("immediate"));
        assert_eq!(data.values(FormField::Services), vec!["strategy"]);
        assert_eq!(data.decision_makers.as_deref(), Some("yes"));
        assert!(data.company_size.is_none());
    }

    #[test]
    fn test_serialized_form_reads_back() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::Services, "strategy, training");
        data.set_field(FormField::PreviousAiExperience, "basic");

        let json = serde_json::to_string(&data).unwrap();
        let back: ContactFormData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
