//! Interactive login.

use crate::api::ApiClient;
use crate::cli::actions::report;
use crate::cli::globals::GlobalArgs;
use crate::cli::prompt::{self, Submission};
use crate::vecino::flow::{login, StepOutcome};
use crate::vecino::session::{self, SessionStore};
use anyhow::Result;

/// Handle the login action
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let api = ApiClient::new(&globals.api_url)?;
    let store = SessionStore::new();
    session::bootstrap(&api, &store).await;

    if let Some(identity) = store.current() {
        println!("Ya iniciaste sesión como {}.", identity.email);
        return Ok(());
    }

    println!("Bienvenido de vuelta. Ingresa tus credenciales para acceder a tu comunidad.");

    loop {
        let Submission::Value(email) = prompt::text("Correo electrónico", None)? else {
            continue;
        };
        let Submission::Value(password) = prompt::secret("Contraseña")? else {
            continue;
        };

        let outcome = login::submit(&api, &store, &email, &password).await;

        if outcome == StepOutcome::Completed {
            break;
        }
        report(&outcome);
    }

    if let Some(identity) = store.current() {
        println!("Hola, {}.", identity.profile.first_name);
    }

    Ok(())
}
