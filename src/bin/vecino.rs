use anyhow::Result;
use vecino::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    match action {
        Action::Register => actions::register::handle(&globals).await?,
        Action::Login => actions::login::handle(&globals).await?,
        Action::Recover => actions::recover::handle(&globals).await?,
        Action::Logout => actions::account::logout(&globals).await?,
        Action::Whoami => actions::account::whoami(&globals).await?,
    }

    Ok(())
}
