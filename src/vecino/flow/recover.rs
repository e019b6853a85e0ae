//! Password recovery flow: email (code request gate), new password pair,
//! then the one-time code that confirms the reset. Completion does not
//! sign the user in; they are pointed back to the login action.

use crate::api::{ApiClient, OtpPurpose};
use crate::vecino::flow::{FlowError, FlowState, StepOutcome};
use crate::vecino::validate;
use secrecy::SecretString;
use tracing::warn;

/// Steps of the recovery flow, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoverStep {
    Email,
    Password,
    Code,
}

/// Result of the code-request gate on the email step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeRequestOutcome {
    Sent,
    Failed,
}

/// Result of the terminal reset call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    Done,
    Rejected,
    Failed,
}

/// Ticket for the email gate.
#[derive(Debug)]
pub struct EmailTicket {
    generation: u64,
    pub email: String,
}

/// Ticket for the terminal gate.
#[derive(Debug)]
pub struct ResetTicket {
    generation: u64,
    pub email: String,
    pub new_password: SecretString,
    pub otp: String,
}

/// State machine for the three-step recovery flow.
pub struct RecoveryFlow {
    state: FlowState<RecoverStep>,
    generation: u64,
    email: Option<String>,
    new_password: Option<SecretString>,
}

impl RecoveryFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FlowState::Collecting(RecoverStep::Email),
            generation: 0,
            email: None,
            new_password: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> FlowState<RecoverStep> {
        self.state
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == FlowState::Completed
    }

    /// Email the code was sent to, for the terminal prompt.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Step back one collection step, keeping drafts.
    pub fn back(&mut self) {
        if let FlowState::Collecting(step) = self.state {
            let previous = match step {
                RecoverStep::Email => return,
                RecoverStep::Password => RecoverStep::Email,
                RecoverStep::Code => RecoverStep::Password,
            };
            self.state = FlowState::Collecting(previous);
        }
    }

    /// Abandon the flow and discard any in-flight result on arrival.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = FlowState::Collecting(RecoverStep::Email);
        self.email = None;
        self.new_password = None;
    }

    /// Validate the email and open the code-request gate.
    pub fn begin_email(&mut self, email: &str) -> Result<EmailTicket, StepOutcome> {
        if self.state != FlowState::Collecting(RecoverStep::Email) {
            return Err(StepOutcome::NotReady);
        }

        let email = validate::normalize_email(email);

        let mut errors = validate::FieldErrors::default();
        validate::check_email(&email, &mut errors);
        if !errors.is_empty() {
            return Err(StepOutcome::Invalid(errors));
        }

        self.state = FlowState::Checking(RecoverStep::Email);

        Ok(EmailTicket {
            generation: self.generation,
            email,
        })
    }

    /// Fold the code-request result back in.
    pub fn apply_email(&mut self, ticket: EmailTicket, outcome: CodeRequestOutcome) -> StepOutcome {
        if ticket.generation != self.generation {
            return StepOutcome::Discarded;
        }

        match outcome {
            CodeRequestOutcome::Sent => {
                self.email = Some(ticket.email);
                self.state = FlowState::Collecting(RecoverStep::Password);
                StepOutcome::Advanced
            }
            CodeRequestOutcome::Failed => {
                self.state = FlowState::Collecting(RecoverStep::Email);
                StepOutcome::Failed(FlowError::Unavailable)
            }
        }
    }

    /// Email step end-to-end: validate and request the recovery code.
    pub async fn submit_email(&mut self, api: &ApiClient, email: &str) -> StepOutcome {
        let ticket = match self.begin_email(email) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let outcome = match api
            .request_code(&ticket.email, OtpPurpose::PasswordReset)
            .await
        {
            Ok(()) => CodeRequestOutcome::Sent,
            Err(err) => {
                warn!("recovery code request failed: {err}");
                CodeRequestOutcome::Failed
            }
        };

        self.apply_email(ticket, outcome)
    }

    /// New-password step: purely local.
    pub fn submit_password(
        &mut self,
        password: SecretString,
        confirm_password: &SecretString,
    ) -> StepOutcome {
        if self.state != FlowState::Collecting(RecoverStep::Password) {
            return StepOutcome::NotReady;
        }

        let mut errors = validate::FieldErrors::default();
        validate::check_password_pair(&password, confirm_password, &mut errors);
        if !errors.is_empty() {
            return StepOutcome::Invalid(errors);
        }

        self.new_password = Some(password);
        self.state = FlowState::Collecting(RecoverStep::Code);
        StepOutcome::Advanced
    }

    /// Validate the code and open the terminal gate with the accumulated
    /// draft.
    pub fn begin_code(&mut self, code: &str) -> Result<ResetTicket, StepOutcome> {
        if self.state != FlowState::Collecting(RecoverStep::Code) {
            return Err(StepOutcome::NotReady);
        }

        let code = code.trim();
        if let Err(errors) = validate::one_time_code(code) {
            return Err(StepOutcome::Invalid(errors));
        }

        let (Some(email), Some(new_password)) = (self.email.as_ref(), self.new_password.as_ref())
        else {
            return Err(StepOutcome::NotReady);
        };

        self.state = FlowState::Checking(RecoverStep::Code);

        Ok(ResetTicket {
            generation: self.generation,
            email: email.clone(),
            new_password: new_password.clone(),
            otp: code.to_string(),
        })
    }

    /// Fold the terminal-gate result back in. A rejected code keeps the
    /// flow on the code step for a fresh attempt.
    pub fn apply_code(&mut self, ticket: ResetTicket, outcome: ResetOutcome) -> StepOutcome {
        if ticket.generation != self.generation {
            return StepOutcome::Discarded;
        }

        match outcome {
            ResetOutcome::Done => {
                self.state = FlowState::Completed;
                StepOutcome::Completed
            }
            ResetOutcome::Rejected => {
                self.state = FlowState::Collecting(RecoverStep::Code);
                StepOutcome::Failed(FlowError::CodeRejected)
            }
            ResetOutcome::Failed => {
                self.state = FlowState::Collecting(RecoverStep::Code);
                StepOutcome::Failed(FlowError::Unavailable)
            }
        }
    }

    /// Terminal step end-to-end: validate the code and reset the password.
    pub async fn submit_code(&mut self, api: &ApiClient, code: &str) -> StepOutcome {
        let ticket = match self.begin_code(code) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let outcome = match api
            .reset_password(&ticket.email, &ticket.new_password, &ticket.otp)
            .await
        {
            Ok(()) => ResetOutcome::Done,
            Err(err) if err.is_client_error() => {
                warn!("password reset rejected: {err}");
                ResetOutcome::Rejected
            }
            Err(err) => {
                warn!("password reset failed: {err}");
                ResetOutcome::Failed
            }
        };

        self.apply_code(ticket, outcome)
    }
}

impl Default for RecoveryFlow {
    fn default() -> Self {
        Self::new()
    }
}
