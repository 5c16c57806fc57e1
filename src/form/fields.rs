use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a field holds one answer or a set of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Single,
    Multi,
}

/// Every field the contact form collects.
///
/// Wire names are the camelCase keys the web form posts, e.g. `budgetRange`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    // Challenge
    PrimaryChallenge,
    ChallengeDescription,
    Urgency,
    Timeline,
    // Company
    CompanyName,
    CompanySize,
    Industry,
    Role,
    Website,
    // Project
    Services,
    BudgetRange,
    #[serde(rename = "previousAIExperience")]
    PreviousAiExperience,
    CurrentTechStack,
    DataReadiness,
    // Contact
    FirstName,
    LastName,
    Email,
    Phone,
    PreferredContact,
    DecisionMakers,
    HearAboutUs,
    AdditionalNotes,
}

impl FormField {
    pub const ALL: [FormField; 22] = [
        FormField::PrimaryChallenge,
        FormField::ChallengeDescription,
        FormField::Urgency,
        FormField::Timeline,
        FormField::CompanyName,
        FormField::CompanySize,
        FormField::Industry,
        FormField::Role,
        FormField::Website,
        FormField::Services,
        FormField::BudgetRange,
        FormField::PreviousAiExperience,
        FormField::CurrentTechStack,
        FormField::DataReadiness,
        FormField::FirstName,
        FormField::LastName,
        FormField::Email,
        FormField::Phone,
        FormField::PreferredContact,
        FormField::DecisionMakers,
        FormField::HearAboutUs,
        FormField::AdditionalNotes,
    ];

    /// Key used by the web form and in JSON/YAML input
    pub fn wire_name(self) -> &'static str {
        match self {
            FormField::PrimaryChallenge => "primaryChallenge",
            FormField::ChallengeDescription => "challengeDescription",
            FormField::Urgency => "urgency",
            FormField::Timeline => "timeline",
            FormField::CompanyName => "companyName",
            FormField::CompanySize => "companySize",
            FormField::Industry => "industry",
            FormField::Role => "role",
            FormField::Website => "website",
            FormField::Services => "services",
            FormField::BudgetRange => "budgetRange",
            FormField::PreviousAiExperience => "previousAIExperience",
            FormField::CurrentTechStack => "currentTechStack",
            FormField::DataReadiness => "dataReadiness",
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::PreferredContact => "preferredContact",
            FormField::DecisionMakers => "decisionMakers",
            FormField::HearAboutUs => "hearAboutUs",
            FormField::AdditionalNotes => "additionalNotes",
        }
    }

    /// Human label for prompts and error messages
    pub fn label(self) -> &'static str {
        match self {
            FormField::PrimaryChallenge => "Primary challenge",
            FormField::ChallengeDescription => "Challenge description",
            FormField::Urgency => "Urgency",
            FormField::Timeline => "Timeline",
            FormField::CompanyName => "Company name",
            FormField::CompanySize => "Company size",
            FormField::Industry => "Industry",
            FormField::Role => "Role",
            FormField::Website => "Website",
            FormField::Services => "Services",
            FormField::BudgetRange => "Budget range",
            FormField::PreviousAiExperience => "Previous AI experience",
            FormField::CurrentTechStack => "Current tech stack",
            FormField::DataReadiness => "Data readiness",
            FormField::FirstName => "First name",
            FormField::LastName => "Last name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::PreferredContact => "Preferred contact method",
            FormField::DecisionMakers => "Decision maker",
            FormField::HearAboutUs => "How did you hear about us",
            FormField::AdditionalNotes => "Additional notes",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FormField::Services | FormField::CurrentTechStack => FieldKind::Multi,
            _ => FieldKind::Single,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FormField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match FormField::ALL.iter().find(|f| f.wire_name() == s) {
            Some(field) => Ok(*field),
            None => bail!("Unknown form field: {}", s),
        }
    }
}
