//! Interactive registration: contact, profile, then the emailed code.

use crate::api::ApiClient;
use crate::cli::actions::report;
use crate::cli::globals::GlobalArgs;
use crate::cli::prompt::{self, Submission};
use crate::vecino::flow::register::{RegisterStep, RegistrationFlow};
use crate::vecino::flow::FlowState;
use crate::vecino::rut;
use crate::vecino::session::{self, SessionStore};
use anyhow::Result;

/// Handle the register action
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let api = ApiClient::new(&globals.api_url)?;
    let store = SessionStore::new();
    session::bootstrap(&api, &store).await;

    if let Some(identity) = store.current() {
        println!("Ya iniciaste sesión como {}.", identity.email);
        return Ok(());
    }

    println!("Únete a la comunidad. Ingresa tu correo y RUT para comenzar.");
    println!("(escribe {} en cualquier campo para volver un paso)", prompt::BACK);

    let mut flow = RegistrationFlow::new();

    while !flow.is_completed() {
        match flow.state() {
            FlowState::Collecting(RegisterStep::Contact) => {
                let email = match prompt::text("Correo electrónico", flow.email())? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let document_default = flow.document_value().map(rut::format_for_display);
                let document = match prompt::text("RUT", document_default.as_deref())? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let outcome = flow.submit_contact(&api, &email, &document).await;
                report(&outcome);
            }
            FlowState::Collecting(RegisterStep::Profile) => {
                println!("Crea tu perfil. Ahora, una contraseña segura.");

                let first_name = match prompt::text("Nombre", flow.first_name())? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let last_name = match prompt::text("Apellido", flow.last_name())? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let password = match prompt::secret("Contraseña")? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let confirm_password = match prompt::secret("Confirmar contraseña")? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let outcome = flow.submit_profile(&first_name, &last_name, password, &confirm_password);
                report(&outcome);
            }
            FlowState::Collecting(RegisterStep::Code) => {
                if let Some(email) = flow.email() {
                    println!("Un último paso. Ingresa el código que enviamos a {email}.");
                }

                let code = match prompt::text("Código OTP", None)? {
                    Submission::Value(value) => value,
                    Submission::Back => {
                        flow.back();
                        continue;
                    }
                };

                let outcome = flow.submit_code(&api, &store, &code).await;
                report(&outcome);
            }
            FlowState::Checking(_) | FlowState::Completed => {}
        }
    }

    if let Some(identity) = store.current() {
        println!(
            "¡Cuenta creada! Bienvenido a la comunidad, {}.",
            identity.profile.first_name
        );
    }

    Ok(())
}
