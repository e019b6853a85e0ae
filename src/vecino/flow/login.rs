//! Login: a single gated step. Validation, the credential exchange, and
//! committing the identity to the session store.

use crate::api::ApiClient;
use crate::vecino::flow::{FlowError, StepOutcome};
use crate::vecino::session::SessionStore;
use crate::vecino::validate;
use secrecy::SecretString;
use tracing::warn;

/// Validate credentials, exchange them for a session and commit the
/// returned identity. The server addresses accounts by username, which for
/// this portal is the normalized email.
pub async fn submit(
    api: &ApiClient,
    store: &SessionStore,
    email: &str,
    password: &SecretString,
) -> StepOutcome {
    if let Err(errors) = validate::login(email, password) {
        return StepOutcome::Invalid(errors);
    }

    match api.login(&validate::normalize_email(email), password).await {
        Ok(identity) => {
            store.set_identity(Some(identity));
            StepOutcome::Completed
        }
        Err(err) if err.is_client_error() => {
            warn!("login rejected: {err}");
            StepOutcome::Failed(FlowError::BadCredentials)
        }
        Err(err) => {
            warn!("login failed: {err}");
            StepOutcome::Failed(FlowError::Unavailable)
        }
    }
}
