//! Registration flow: contact (email + RUT) with a combined availability
//! pre-check, profile (names + password pair), then the one-time code that
//! creates the account. Drafts accumulate across steps and survive back
//! navigation; the terminal submission is the union of all drafts plus the
//! code.

use crate::api::{ApiClient, Availability, Identity, OtpPurpose, RegistrationSubmission};
use crate::vecino::flow::{FlowError, FlowState, StepOutcome};
use crate::vecino::session::SessionStore;
use crate::vecino::validate;
use crate::vecino::rut;
use secrecy::SecretString;
use tracing::warn;

/// Steps of the registration flow, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterStep {
    Contact,
    Profile,
    Code,
}

/// Result of the combined contact gate: availability pre-check followed by
/// the code request. A conflict short-circuits before any code is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactCheck {
    /// 404 on the pre-check and 2xx on the code request.
    Available,
    /// 200 on the pre-check: the email or document already has an account.
    AlreadyRegistered,
    /// Any other response on either call.
    Failed,
}

/// Result of the terminal account-creation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeOutcome {
    Created(Identity),
    Rejected,
    Failed,
}

/// Ticket for the contact gate. Carries the normalized values that will
/// become the draft if the gate passes, stamped with the generation the
/// check started under.
#[derive(Debug)]
pub struct ContactTicket {
    generation: u64,
    pub email: String,
    pub document_value: String,
}

/// Ticket for the terminal gate, carrying the full submission.
#[derive(Debug)]
pub struct CodeTicket {
    generation: u64,
    pub submission: RegistrationSubmission,
}

#[derive(Clone, Debug)]
struct ContactDraft {
    email: String,
    document_value: String,
}

#[derive(Clone, Debug)]
struct ProfileDraft {
    first_name: String,
    last_name: String,
    password: SecretString,
}

/// State machine for the three-step registration flow.
pub struct RegistrationFlow {
    state: FlowState<RegisterStep>,
    generation: u64,
    contact: Option<ContactDraft>,
    profile: Option<ProfileDraft>,
}

impl RegistrationFlow {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FlowState::Collecting(RegisterStep::Contact),
            generation: 0,
            contact: None,
            profile: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> FlowState<RegisterStep> {
        self.state
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == FlowState::Completed
    }

    /// Email from the accepted contact draft, shown when prompting for the
    /// code that was sent to it.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.contact.as_ref().map(|draft| draft.email.as_str())
    }

    #[must_use]
    pub fn document_value(&self) -> Option<&str> {
        self.contact.as_ref().map(|draft| draft.document_value.as_str())
    }

    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.profile.as_ref().map(|draft| draft.first_name.as_str())
    }

    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.profile.as_ref().map(|draft| draft.last_name.as_str())
    }

    /// Step back one collection step. Drafts are kept, so previously
    /// entered values survive the rewind. No-op while checking, completed
    /// or already on the first step.
    pub fn back(&mut self) {
        if let FlowState::Collecting(step) = self.state {
            let previous = match step {
                RegisterStep::Contact => return,
                RegisterStep::Profile => RegisterStep::Contact,
                RegisterStep::Code => RegisterStep::Profile,
            };
            self.state = FlowState::Collecting(previous);
        }
    }

    /// Abandon the flow: drop all drafts, return to the first step and bump
    /// the generation so any in-flight result is discarded on arrival.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = FlowState::Collecting(RegisterStep::Contact);
        self.contact = None;
        self.profile = None;
    }

    /// Validate the contact step and open its remote gate. The email is
    /// normalized and the document cleaned to canonical form before
    /// validation, exactly as they will be submitted.
    pub fn begin_contact(
        &mut self,
        email: &str,
        document_value: &str,
    ) -> Result<ContactTicket, StepOutcome> {
        if self.state != FlowState::Collecting(RegisterStep::Contact) {
            return Err(StepOutcome::NotReady);
        }

        let email = validate::normalize_email(email);
        let document_value = rut::clean(document_value);

        if let Err(errors) = validate::contact(&email, &document_value) {
            return Err(StepOutcome::Invalid(errors));
        }

        self.state = FlowState::Checking(RegisterStep::Contact);

        Ok(ContactTicket {
            generation: self.generation,
            email,
            document_value,
        })
    }

    /// Fold the contact-gate result back into the flow.
    pub fn apply_contact(&mut self, ticket: ContactTicket, check: ContactCheck) -> StepOutcome {
        if ticket.generation != self.generation {
            return StepOutcome::Discarded;
        }

        match check {
            ContactCheck::Available => {
                self.contact = Some(ContactDraft {
                    email: ticket.email,
                    document_value: ticket.document_value,
                });
                self.state = FlowState::Collecting(RegisterStep::Profile);
                StepOutcome::Advanced
            }
            ContactCheck::AlreadyRegistered => {
                self.state = FlowState::Collecting(RegisterStep::Contact);
                StepOutcome::Failed(FlowError::Conflict)
            }
            ContactCheck::Failed => {
                self.state = FlowState::Collecting(RegisterStep::Contact);
                StepOutcome::Failed(FlowError::Unavailable)
            }
        }
    }

    /// Contact step end-to-end: validate, pre-check availability, request
    /// the one-time code, advance. A conflict blocks before any code
    /// request is issued.
    pub async fn submit_contact(
        &mut self,
        api: &ApiClient,
        email: &str,
        document_value: &str,
    ) -> StepOutcome {
        let ticket = match self.begin_contact(email, document_value) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let check = run_contact_check(api, &ticket).await;
        self.apply_contact(ticket, check)
    }

    /// Profile step: purely local, no remote gate.
    pub fn submit_profile(
        &mut self,
        first_name: &str,
        last_name: &str,
        password: SecretString,
        confirm_password: &SecretString,
    ) -> StepOutcome {
        if self.state != FlowState::Collecting(RegisterStep::Profile) {
            return StepOutcome::NotReady;
        }

        if let Err(errors) = validate::profile(first_name, last_name, &password, confirm_password) {
            return StepOutcome::Invalid(errors);
        }

        self.profile = Some(ProfileDraft {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            password,
        });
        self.state = FlowState::Collecting(RegisterStep::Code);
        StepOutcome::Advanced
    }

    /// Validate the code and open the terminal gate with the accumulated
    /// draft.
    pub fn begin_code(&mut self, code: &str) -> Result<CodeTicket, StepOutcome> {
        if self.state != FlowState::Collecting(RegisterStep::Code) {
            return Err(StepOutcome::NotReady);
        }

        let code = code.trim();
        if let Err(errors) = validate::one_time_code(code) {
            return Err(StepOutcome::Invalid(errors));
        }

        let (Some(contact), Some(profile)) = (self.contact.as_ref(), self.profile.as_ref()) else {
            return Err(StepOutcome::NotReady);
        };

        self.state = FlowState::Checking(RegisterStep::Code);

        Ok(CodeTicket {
            generation: self.generation,
            submission: RegistrationSubmission {
                email: contact.email.clone(),
                document_value: contact.document_value.clone(),
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                password: profile.password.clone(),
                otp: code.to_string(),
            },
        })
    }

    /// Fold the terminal-gate result back in. Success commits the identity
    /// to the session store and completes the flow; a rejected code keeps
    /// the flow on the code step for a fresh attempt.
    pub fn apply_code(
        &mut self,
        ticket: CodeTicket,
        outcome: CodeOutcome,
        store: &SessionStore,
    ) -> StepOutcome {
        if ticket.generation != self.generation {
            return StepOutcome::Discarded;
        }

        match outcome {
            CodeOutcome::Created(identity) => {
                store.set_identity(Some(identity));
                self.state = FlowState::Completed;
                StepOutcome::Completed
            }
            CodeOutcome::Rejected => {
                self.state = FlowState::Collecting(RegisterStep::Code);
                StepOutcome::Failed(FlowError::CodeRejected)
            }
            CodeOutcome::Failed => {
                self.state = FlowState::Collecting(RegisterStep::Code);
                StepOutcome::Failed(FlowError::Unavailable)
            }
        }
    }

    /// Terminal step end-to-end: validate the code, create the account,
    /// commit the identity.
    pub async fn submit_code(
        &mut self,
        api: &ApiClient,
        store: &SessionStore,
        code: &str,
    ) -> StepOutcome {
        let ticket = match self.begin_code(code) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };

        let outcome = match api.register(&ticket.submission).await {
            Ok(identity) => CodeOutcome::Created(identity),
            Err(err) if err.is_client_error() => {
                warn!("registration rejected: {err}");
                CodeOutcome::Rejected
            }
            Err(err) => {
                warn!("registration failed: {err}");
                CodeOutcome::Failed
            }
        };

        self.apply_code(ticket, outcome, store)
    }
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the two calls behind the contact gate: availability pre-check, then
/// the code request only when the pre-check says available.
pub async fn run_contact_check(api: &ApiClient, ticket: &ContactTicket) -> ContactCheck {
    match api
        .validate_registration(&ticket.email, &ticket.document_value)
        .await
    {
        Ok(Availability::Registered) => ContactCheck::AlreadyRegistered,
        Ok(Availability::Available) => {
            match api.request_code(&ticket.email, OtpPurpose::Registration).await {
                Ok(()) => ContactCheck::Available,
                Err(err) => {
                    warn!("code request failed: {err}");
                    ContactCheck::Failed
                }
            }
        }
        Err(err) => {
            warn!("availability pre-check failed: {err}");
            ContactCheck::Failed
        }
    }
}
