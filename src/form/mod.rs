pub mod data;
pub mod fields;
pub mod rules;
pub mod state;

pub use data::ContactFormData;
pub use fields::{FieldKind, FormField};
pub use rules::{first_invalid_step, validate_step, FieldErrors, WizardStep};
pub use state::{ContactFormState, FormError, LeadSubmission};
