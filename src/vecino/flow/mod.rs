//! Multi-step flow controllers. Each flow is an explicit state machine:
//! linearly ordered collection steps, a `Checking` sub-state while a remote
//! gate is outstanding, and a terminal `Completed` state. Remote gates are
//! ticketed: `begin_*` validates locally and hands out a ticket stamped
//! with the flow's current generation, the caller runs the network call,
//! and `apply_*` folds the result back in — discarding it when the flow
//! was reset while the request was in flight.

pub mod login;
pub mod recover;
pub mod register;

use crate::vecino::validate::FieldErrors;

/// Position of a flow: collecting input for a step, waiting on a remote
/// gate for it, or done. `Checking` refuses re-entry, so a second
/// submission while one is outstanding never reaches the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState<S> {
    Collecting(S),
    Checking(S),
    Completed,
}

/// User-facing flow failures beyond per-field validation. Every transport
/// or server failure is folded into one of these before it reaches the
/// user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowError {
    /// Email or document already registered.
    Conflict,
    /// The one-time code was rejected at the terminal step.
    CodeRejected,
    /// The server rejected the submitted credentials.
    BadCredentials,
    /// Transient or unknown failure; the user may retry later.
    Unavailable,
}

impl FlowError {
    /// Product copy for the failure.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            FlowError::Conflict => "Tu RUT o correo ya están registrados.",
            FlowError::CodeRejected => {
                "El código OTP que ingresaste no es válido o ha expirado. Intenta de nuevo más tarde."
            }
            FlowError::BadCredentials => "Credenciales inválidas. Por favor, inténtalo de nuevo.",
            FlowError::Unavailable => {
                "Estamos teniendo problemas en estos momentos, intenta más tarde."
            }
        }
    }

    /// Extra guidance shown with the failure, when there is a way out.
    #[must_use]
    pub fn remediation(self) -> Option<&'static str> {
        match self {
            FlowError::Conflict => Some(
                "Inicia sesión con `vecino login` o recupera tu contraseña con `vecino recover`.",
            ),
            _ => None,
        }
    }
}

/// Result of submitting a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step was accepted and the flow advanced.
    Advanced,
    /// The flow reached its terminal state.
    Completed,
    /// Local validation failed; no network call was issued.
    Invalid(FieldErrors),
    /// The server blocked or failed the step; the state is unchanged.
    Failed(FlowError),
    /// The submission does not match the flow's current state (wrong step,
    /// or a check is already outstanding).
    NotReady,
    /// The flow was reset while the request was in flight; the result was
    /// dropped without touching any state.
    Discarded,
}
