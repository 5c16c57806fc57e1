pub mod config;
pub mod form;
pub mod leads;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod wizard;

pub use form::{ContactFormData, ContactFormState, FormField, LeadSubmission, WizardStep};
pub use scoring::{calculate_score, score_lead, LeadScore, ScoringConfig, Tier};
