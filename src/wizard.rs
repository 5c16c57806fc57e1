use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::form::{ContactFormState, FieldErrors, FormError, FormField, LeadSubmission, WizardStep};
use crate::output::format_score_summary;

/// Line-based prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt user with a message and return their trimmed input, or None at end of input.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write output")
    }
}

/// What the user chose at the end of a page
enum StepAction {
    Continue,
    Back,
    Quit,
}

/// Walk the user through every page of the contact form.
///
/// Blank input keeps the current answer, `-` clears it. Returns the submission,
/// or None if the user quit or input ended first.
pub fn run_wizard<R: BufRead, W: Write>(
    state: &mut ContactFormState,
    prompter: &mut Prompter<R, W>,
    use_colors: bool,
) -> Result<Option<LeadSubmission>> {
    // Fields to re-ask after a rejected page; None asks the whole page
    let mut only: Option<Vec<FormField>> = None;

    loop {
        let step = state.current_step;
        prompter.say("")?;
        prompter.say(&step.to_string())?;

        let fields: Vec<FormField> = match only.take() {
            Some(fields) => fields,
            None => step.fields().to_vec(),
        };
        for field in fields {
            if !ask_field(state, prompter, step, field)? {
                return Ok(None);
            }
        }

        prompter.say(&format!(
            "Lead score: {}",
            format_score_summary(&state.lead_score, use_colors)
        ))?;

        let action = if step == WizardStep::last() {
            prompt_action(prompter, "[Enter] submit, b back, q quit: ")?
        } else {
            prompt_action(prompter, "[Enter] next, b back, q quit: ")?
        };

        match action {
            StepAction::Quit => return Ok(None),
            StepAction::Back => {
                state.back();
                continue;
            }
            StepAction::Continue => {}
        }

        let outcome = if step == WizardStep::last() {
            state.begin_submit().map(Some)
        } else {
            state.advance().map(|_| None)
        };

        match outcome {
            Ok(Some(submission)) => {
                state.finish_submit(true);
                return Ok(Some(submission));
            }
            Ok(None) => {}
            Err(FormError::StepInvalid { errors, .. }) => {
                report_errors(prompter, &errors)?;
                only = Some(errors.keys().copied().collect());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Ask for one field. Returns false when input has ended.
fn ask_field<R: BufRead, W: Write>(
    state: &mut ContactFormState,
    prompter: &mut Prompter<R, W>,
    step: WizardStep,
    field: FormField,
) -> Result<bool> {
    let mut message = field.label().to_string();

    let answers = state.scoring().known_answers(field);
    if !answers.is_empty() {
        message.push_str(&format!(" ({})", answers.join(", ")));
    }
    if step.is_required(field) {
        message.push_str(" *");
    }
    if let Some(current) = state.form_data.display_value(field) {
        message.push_str(&format!(" [{}]", current));
    }
    message.push_str(": ");

    let Some(input) = prompter.prompt(&message)? else {
        return Ok(false);
    };
    match input.as_str() {
        "" => {}
        "-" => state.clear_field(field),
        value => state.set_field(field, value),
    }
    Ok(true)
}

fn prompt_action<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    message: &str,
) -> Result<StepAction> {
    let action = match prompter.prompt(message)? {
        None => StepAction::Quit,
        Some(input) => match input.to_lowercase().as_str() {
            "b" | "back" => StepAction::Back,
            "q" | "quit" => StepAction::Quit,
            _ => StepAction::Continue,
        },
    };
    Ok(action)
}

fn report_errors<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    errors: &FieldErrors,
) -> Result<()> {
    for message in errors.values() {
        prompter.say(&format!("  Invalid: {}", message))?;
    }
    Ok(())
}
