use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::data::ContactFormData;
use super::fields::FormField;
use super::rules::{first_invalid_step, validate_step, FieldErrors, WizardStep};
use crate::scoring::{calculate_score, LeadScore, ScoringConfig};

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("{step} has {} invalid field(s)", .errors.len())]
    StepInvalid { step: WizardStep, errors: FieldErrors },

    #[error("Already on the last step; submit instead")]
    AlreadyAtLastStep,

    #[error("Submit is only available on the last step (currently on step {0})")]
    NotOnLastStep(usize),

    #[error("A submission is already in progress")]
    SubmissionInProgress,
}

/// A validated, scored lead ready to hand to the downstream router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub form_data: ContactFormData,
    pub lead_score: LeadScore,
    pub submitted_at: DateTime<Utc>,
}

/// State of the multi-step contact wizard.
///
/// The score is recomputed on every field change so callers can show it live.
/// Moving forward only happens once the current page validates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormState {
    pub current_step: WizardStep,
    pub form_data: ContactFormData,
    pub errors: FieldErrors,
    pub is_submitting: bool,
    pub lead_score: LeadScore,
    #[serde(skip)]
    scoring: ScoringConfig,
}

impl ContactFormState {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            current_step: WizardStep::first(),
            form_data: ContactFormData::new(),
            errors: FieldErrors::new(),
            is_submitting: false,
            lead_score: LeadScore::default(),
            scoring,
        }
    }

    /// Resume a wizard with answers that were already collected.
    pub fn with_data(scoring: ScoringConfig, form_data: ContactFormData) -> Self {
        let mut state = Self::new(scoring);
        state.form_data = form_data;
        state.rescore();
        state
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn set_field(&mut self, field: FormField, raw: &str) {
        self.form_data.set_field(field, raw);
        self.errors.remove(&field);
        self.rescore();
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.form_data.clear_field(field);
        self.errors.remove(&field);
        self.rescore();
    }

    pub fn validate_current_step(&self) -> FieldErrors {
        validate_step(&self.form_data, self.current_step)
    }

    /// Move to the next page if the current one validates.
    ///
    /// On failure the errors are stored on the state and the step is unchanged.
    pub fn advance(&mut self) -> Result<WizardStep, FormError> {
        let errors = self.validate_current_step();
        if !errors.is_empty() {
            debug!(
                step = self.current_step.ordinal(),
                invalid = errors.len(),
                "step rejected"
            );
            self.errors = errors.clone();
            return Err(FormError::StepInvalid {
                step: self.current_step,
                errors,
            });
        }

        let next = self
            .current_step
            .next()
            .ok_or(FormError::AlreadyAtLastStep)?;
        self.errors.clear();
        self.current_step = next;
        Ok(next)
    }

    /// Move back one page. Stays on the first page.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self.errors.clear();
        self.current_step
    }

    /// Re-validate every page, re-score and mark the form as submitting.
    ///
    /// If any page is invalid the wizard jumps back to the first bad page.
    pub fn begin_submit(&mut self) -> Result<LeadSubmission, FormError> {
        if self.is_submitting {
            return Err(FormError::SubmissionInProgress);
        }
        if self.current_step != WizardStep::last() {
            return Err(FormError::NotOnLastStep(self.current_step.ordinal()));
        }

        if let Some((step, errors)) = first_invalid_step(&self.form_data) {
            debug!(step = step.ordinal(), "submission rejected");
            self.current_step = step;
            self.errors = errors.clone();
            return Err(FormError::StepInvalid { step, errors });
        }

        self.rescore();
        self.errors.clear();
        self.is_submitting = true;

        info!(
            total = self.lead_score.total,
            tier = %self.lead_score.tier,
            "lead submitted"
        );

        Ok(LeadSubmission {
            form_data: self.form_data.clone(),
            lead_score: self.lead_score,
            submitted_at: Utc::now(),
        })
    }

    /// Finish a submission. A successful one discards the collected answers.
    pub fn finish_submit(&mut self, success: bool) {
        if success {
            let scoring = std::mem::take(&mut self.scoring);
            *self = Self::new(scoring);
        } else {
            self.is_submitting = false;
        }
    }

    fn rescore(&mut self) {
        self.lead_score = calculate_score(&self.form_data, &self.scoring).score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Tier;

    fn filled_state() -> ContactFormState {
        let mut state = ContactFormState::new(ScoringConfig::default());
        state.set_field(FormField::PrimaryChallenge, "automation");
        state.set_field(FormField::Urgency, "immediate");
        state.advance().unwrap();
        state.set_field(FormField::CompanyName, "Acme");
        state.set_field(FormField::CompanySize, "201-500");
        state.advance().unwrap();
        state.set_field(FormField::Services, "strategy, implementation");
        state.set_field(FormField::BudgetRange, "over-100k");
        state.set_field(FormField::PreviousAiExperience, "advanced");
        state.advance().unwrap();
        state.set_field(FormField::FirstName, "Jane");
        state.set_field(FormField::Email, "jane@acme.com");
        state.set_field(FormField::DecisionMakers, "yes");
        state
    }

    #[test]
    fn test_new_state() {
        let state = ContactFormState::new(ScoringConfig::default());
        assert_eq!(state.current_step.ordinal(), 1);
        assert!(state.form_data.is_empty());
        assert!(state.errors.is_empty());
        assert!(!state.is_submitting);
        assert_eq!(state.lead_score.total, 0);
        assert_eq!(state.lead_score.tier, Tier::Low);
    }

    #[test]
    fn test_set_field_updates_score() {
        let mut state = ContactFormState::new(ScoringConfig::default());
        state.set_field(FormField::BudgetRange, "over-100k");
        assert_eq!(state.lead_score.budget, 30);

        state.clear_field(FormField::BudgetRange);
        assert_eq!(state.lead_score.budget, 0);
    }

    #[test]
    fn test_advance_blocked_by_missing_fields() {
        let mut state = ContactFormState::new(ScoringConfig::default());
        state.set_field(FormField::PrimaryChallenge, "automation");

        let err = state.advance().unwrap_err();
        match err {
            FormError::StepInvalid { step, errors } => {
                assert_eq!(step, WizardStep::Challenge);
                assert!(errors.contains_key(&FormField::Urgency));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(state.current_step, WizardStep::Challenge);
        assert!(state.errors.contains_key(&FormField::Urgency));
    }

    #[test]
    fn test_setting_field_clears_its_error() {
        let mut state = ContactFormState::new(ScoringConfig::default());
        let _ = state.advance();
        assert_eq!(state.errors.len(), 2);

        state.set_field(FormField::Urgency, "exploring");
        assert_eq!(state.errors.len(), 1);
        assert!(!state.errors.contains_key(&FormField::Urgency));
    }

    #[test]
    fn test_back_stops_at_first_step() {
        let mut state = filled_state();
        assert_eq!(state.back(), WizardStep::Project);
        assert_eq!(state.back(), WizardStep::Company);
        assert_eq!(state.back(), WizardStep::Challenge);
        assert_eq!(state.back(), WizardStep::Challenge);
    }

    #[test]
    fn test_advance_past_last_step() {
        let mut state = filled_state();
        assert_eq!(state.advance(), Err(FormError::AlreadyAtLastStep));
    }

    #[test]
    fn test_submit_scores_lead() {
        let mut state = filled_state();
        let submission = state.begin_submit().unwrap();

        assert!(state.is_submitting);
        assert_eq!(submission.lead_score.total, 91);
        assert_eq!(submission.lead_score.tier, Tier::High);
        assert_eq!(submission.form_data.first_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_submit_twice_rejected() {
        let mut state = filled_state();
        state.begin_submit().unwrap();
        assert_eq!(state.begin_submit(), Err(FormError::SubmissionInProgress));
    }

    #[test]
    fn test_submit_requires_last_step() {
        let mut state = ContactFormState::new(ScoringConfig::default());
        assert_eq!(state.begin_submit(), Err(FormError::NotOnLastStep(1)));
    }

    #[test]
    fn test_submit_jumps_to_first_invalid_step() {
        let mut state = filled_state();
        // Earlier answer removed after moving on
        state.clear_field(FormField::CompanyName);

        let err = state.begin_submit().unwrap_err();
        assert!(matches!(err, FormError::StepInvalid { step: WizardStep::Company, .. }));
        assert_eq!(state.current_step, WizardStep::Company);
        assert!(!state.is_submitting);
    }

    #[test]
    fn test_finish_submit_success_resets() {
        let mut state = filled_state();
        state.begin_submit().unwrap();
        state.finish_submit(true);

        assert_eq!(state.current_step, WizardStep::Challenge);
        assert!(state.form_data.is_empty());
        assert!(!state.is_submitting);
        assert_eq!(state.lead_score, LeadScore::default());
    }

    #[test]
    fn test_finish_submit_failure_keeps_answers() {
        let mut state = filled_state();
        state.begin_submit().unwrap();
        state.finish_submit(false);

        assert!(!state.is_submitting);
        assert_eq!(state.current_step, WizardStep::Contact);
        assert!(state.begin_submit().is_ok());
    }

    #[test]
    fn test_with_data_scores_immediately() {
        let mut data = ContactFormData::new();
        data.set_field(FormField::Urgency, "immediate");
        let state = ContactFormState::with_data(ScoringConfig::default(), data);
        assert_eq!(state.lead_score.urgency, 25);
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = ContactFormState::new(ScoringConfig::default());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["currentStep"], 1);
        assert_eq!(json["isSubmitting"], false);
        assert_eq!(json["leadScore"]["total"], 0);

        let json = serde_json::to_value(filled_state()).unwrap();
        assert_eq!(json["currentStep"], 4);
    }

    #[test]
    fn test_with_data_blank_required_fields_still_rejected() {
        let data: ContactFormData =
            serde_json::from_value(serde_json::json!({ "primaryChallenge": "   ", "urgency": "  " }))
                .unwrap();
        let mut state = ContactFormState::with_data(ScoringConfig::default(), data);

        let err = state.advance().unwrap_err();
        assert!(matches!(err, FormError::StepInvalid { step: WizardStep::Challenge, .. }));
        assert!(state.errors.contains_key(&FormField::PrimaryChallenge));
        assert!(state.errors.contains_key(&FormField::Urgency));
    }
}
