//! Interactive password recovery.

use crate::api::ApiClient;
use crate::cli::actions::report;
use crate::cli::globals::GlobalArgs;
use crate::cli::prompt::{self, Submission};
use crate::vecino::flow::recover::{RecoverStep, RecoveryFlow};
use crate::vecino::flow::FlowState;
use crate::vecino::session::{self, SessionStore};
use anyhow::Result;

/// Handle the recover action
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let api = ApiClient::new(&globals.api_url)?;
    let store = SessionStore::new();
    session::bootstrap(&api, &store).await;

    println!("Recuperar contraseña.");
    println!("(escribe {} en cualquier campo para volver un paso)", prompt::BACK);

    let mut flow = RecoveryFlow::new();

    while !flow.is_completed() {
        match flow.state() {
            FlowState::Collecting(RecoverStep::Email) => {
                println!("Ingresa tu correo para recibir un código de recuperación.");

                let email = match prompt::text("Correo electrónico", flow.email())? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let outcome = flow.submit_email(&api, &email).await;
                report(&outcome);
            }
            FlowState::Collecting(RecoverStep::Password) => {
                println!("Ingresa tu nueva contraseña.");

                let password = match prompt::secret("Nueva contraseña")? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let confirm_password = match prompt::secret("Confirmar nueva contraseña")? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let outcome = flow.submit_password(password, &confirm_password);
                report(&outcome);
            }
            FlowState::Collecting(RecoverStep::Code) => {
                if let Some(email) = flow.email() {
                    println!("Ingresa el código enviado a {email} para confirmar el cambio.");
                }

                let code = match prompt::text("Código OTP", None)? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let outcome = flow.submit_code(&api, &code).await;
                report(&outcome);
            }
            FlowState::Checking(_) | FlowState::Completed => {}
        }
    }

    println!("¡Contraseña actualizada con éxito! Inicia sesión con `vecino login`.");

    Ok(())
}
