use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use url::Url;

use super::data::ContactFormData;
use super::fields::FormField;

/// Field name to error message, as shown next to the form inputs
pub type FieldErrors = BTreeMap<FormField, String>;

/// The four pages of the contact wizard, in order.
///
/// Serialized as its 1-based ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "usize", try_from = "usize")]
pub enum WizardStep {
    Challenge,
    Company,
    Project,
    Contact,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Challenge,
        WizardStep::Company,
        WizardStep::Project,
        WizardStep::Contact,
    ];

    pub fn first() -> Self {
        WizardStep::Challenge
    }

    pub fn last() -> Self {
        WizardStep::Contact
    }

    /// 1-based position in the wizard
    pub fn ordinal(self) -> usize {
        match self {
            WizardStep::Challenge => 1,
            WizardStep::Company => 2,
            WizardStep::Project => 3,
            WizardStep::Contact => 4,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        WizardStep::ALL.get(ordinal.checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() - 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Challenge => "Your challenge",
            WizardStep::Company => "Your company",
            WizardStep::Project => "Your project",
            WizardStep::Contact => "How to reach you",
        }
    }

    /// Fields collected on this page, in display order
    pub fn fields(self) -> &'static [FormField] {
        match self {
            WizardStep::Challenge => &[
                FormField::PrimaryChallenge,
                FormField::ChallengeDescription,
                FormField::Urgency,
                FormField::Timeline,
            ],
            WizardStep::Company => &[
                FormField::CompanyName,
                FormField::CompanySize,
                FormField::Industry,
                FormField::Role,
                FormField::Website,
            ],
            WizardStep::Project => &[
                FormField::Services,
                FormField::BudgetRange,
                FormField::PreviousAiExperience,
                FormField::CurrentTechStack,
                FormField::DataReadiness,
            ],
            WizardStep::Contact => &[
                FormField::FirstName,
                FormField::LastName,
                FormField::Email,
                FormField::Phone,
                FormField::PreferredContact,
                FormField::DecisionMakers,
                FormField::HearAboutUs,
                FormField::AdditionalNotes,
            ],
        }
    }

    /// Fields that must be present before the wizard moves past this page
    pub fn required_fields(self) -> &'static [FormField] {
        match self {
            WizardStep::Challenge => &[FormField::PrimaryChallenge, FormField::Urgency],
            WizardStep::Company => &[FormField::CompanyName, FormField::CompanySize],
            WizardStep::Project => &[FormField::Services, FormField::BudgetRange],
            WizardStep::Contact => &[
                FormField::FirstName,
                FormField::Email,
                FormField::DecisionMakers,
            ],
        }
    }

    pub fn is_required(self, field: FormField) -> bool {
        self.required_fields().contains(&field)
    }
}

impl From<WizardStep> for usize {
    fn from(step: WizardStep) -> usize {
        step.ordinal()
    }
}

impl TryFrom<usize> for WizardStep {
    type Error = String;

    fn try_from(ordinal: usize) -> Result<Self, Self::Error> {
        WizardStep::from_ordinal(ordinal).ok_or_else(|| {
            format!(
                "Invalid step {} (expected 1 to {})",
                ordinal,
                WizardStep::ALL.len()
            )
        })
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} of {}: {}", self.ordinal(), WizardStep::ALL.len(), self.title())
    }
}

/// Check one page: required fields present, present fields well-formed.
pub fn validate_step(data: &ContactFormData, step: WizardStep) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in step.fields() {
        let field = *field;
        if !data.is_present(field) {
            if step.is_required(field) {
                errors.insert(field, format!("{} is required", field.label()));
            }
            continue;
        }
        if let Some(value) = data.display_value(field) {
            if let Err(message) = check_format(field, &value) {
                errors.insert(field, message);
            }
        }
    }

    errors
}

/// Validate every page, returning the first invalid step with its errors.
pub fn first_invalid_step(data: &ContactFormData) -> Option<(WizardStep, FieldErrors)> {
    WizardStep::ALL.iter().find_map(|step| {
        let errors = validate_step(data, *step);
        (!errors.is_empty()).then_some((*step, errors))
    })
}

fn check_format(field: FormField, value: &str) -> Result<(), String> {
    match field {
        FormField::Email => {
            if email_pattern().is_match(value) {
                Ok(())
            } else {
                Err("Please enter a valid email address".to_string())
            }
        }
        FormField::Website => check_website(value),
        FormField::Phone => {
            let digits = value.chars().filter(char::is_ascii_digit).count();
            if digits >= 7 {
                Ok(())
            } else {
                Err("Please enter a valid phone number".to_string())
            }
        }
        _ => Ok(()),
    }
}

fn check_website(value: &str) -> Result<(), String> {
    // Visitors usually leave off the scheme
    let parsed = match Url::parse(value) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", value)),
        Err(e) => Err(e),
    };

    match parsed {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => Ok(()),
        Ok(url) => Err(format!("Unsupported website scheme: {}", url.scheme())),
        Err(e) => Err(format!("Please enter a valid website ({})", e)),
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_ordinals() {
        assert_eq!(WizardStep::first().ordinal(), 1);
        assert_eq!(WizardStep::last().ordinal(), 4);
        assert_eq!(WizardStep::from_ordinal(0), None);
        assert_eq!(WizardStep::from_ordinal(5), None);
        assert_eq!(WizardStep::Challenge.next(), Some(WizardStep::Company));
        assert_eq!(WizardStep::Contact.next(), None);
        assert_eq!(WizardStep::Challenge.previous(), None);
    }

    #[test]
    fn test_every_field_on_exactly_one_step() {
        for field in FormField::ALL {
            let count = WizardStep::ALL
                .iter()
                .filter(|s| s.fields().contains(&field))
                .count();
            assert_eq!(count, 1, "{} appears on {} steps", field, count);
        }
    }

    #[test]
    fn test_required_fields_are_on_their_step() {
        for step in WizardStep::ALL {
            for field in step.required_fields() {
                assert!(step.fields().contains(field));
            }
        }
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = validate_step(&ContactFormData::new(), WizardStep::Challenge);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&FormField::Urgency], "Urgency is required");
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::CompanyName, "Acme");
        data.set_field(FormField::CompanySize, "11-50");
        assert!(validate_step(&data, WizardStep::Company).is_empty());
    }

    #[test]
    fn test_email_format() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::FirstName, "Jane");
        data.set_field(FormField::DecisionMakers, "yes");

        data.set_field(FormField::Email, "jane@example");
        let errors = validate_step(&data, WizardStep::Contact);
        assert!(errors.contains_key(&FormField::Email));

        data.set_field(FormField::Email, "jane@example.com");
        assert!(validate_step(&data, WizardStep::Contact).is_empty());
    }

    #[test]
    fn test_website_format() {
        assert!(check_website("example.com").is_ok());
        assert!(check_website("https://example.com/about").is_ok());
        assert!(check_website("ftp://example.com").is_err());
        assert!(check_website("http://").is_err());
    }

    #[test]
    fn test_phone_format() {
        assert!(check_format(FormField::Phone, "+1 (555) 010-2030").is_ok());
        assert!(check_format(FormField::Phone, "12345").is_err());
    }

    #[test]
    fn test_first_invalid_step() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::PrimaryChallenge, "automation");
        data.set_field(FormField::Urgency, "immediate");

        let (step, errors) = first_invalid_step(&data).unwrap();
        assert_eq!(step, WizardStep::Company);
        assert!(errors.contains_key(&FormField::CompanyName));
    }

    #[test]
    fn test_step_serializes_as_ordinal() {
        assert_eq!(serde_json::to_value(WizardStep::Challenge).unwrap(), 1);
        assert_eq!(serde_json::to_value(WizardStep::Contact).unwrap(), 4);
        assert_eq!(
            serde_json::from_value::<WizardStep>(serde_json::json!(3)).unwrap(),
            WizardStep::Project
        );
        assert!(serde_json::from_value::<WizardStep>(serde_json::json!(0)).is_err());
        assert!(serde_json::from_value::<WizardStep>(serde_json::json!(5)).is_err());
    }
}
