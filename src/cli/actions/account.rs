//! Session inspection and logout.

use crate::api::ApiClient;
use crate::cli::globals::GlobalArgs;
use crate::vecino::flow::FlowError;
use crate::vecino::session::{self, SessionStore};
use anyhow::Result;
use tracing::warn;

/// Handle the whoami action
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let api = ApiClient::new(&globals.api_url)?;
    let store = SessionStore::new();
    session::bootstrap(&api, &store).await;

    match store.current() {
        Some(identity) => {
            println!(
                "{} {} <{}>",
                identity.profile.first_name, identity.profile.last_name, identity.email
            );
            println!("Roles: {}", identity.roles.join(", "));
        }
        None => println!("No hay una sesión activa."),
    }

    Ok(())
}

/// Handle the logout action
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let api = ApiClient::new(&globals.api_url)?;
    let store = SessionStore::new();
    session::bootstrap(&api, &store).await;

    if !store.is_authenticated() {
        println!("No hay una sesión activa.");
        return Ok(());
    }

    match api.logout().await {
        Ok(()) => {
            store.clear();
            println!("Sesión cerrada.");
        }
        Err(err) => {
            warn!("logout failed: {err}");
            println!("{}", FlowError::Unavailable.message());
        }
    }

    Ok(())
}
