pub mod account;
pub mod login;
pub mod recover;
pub mod register;

use crate::vecino::flow::StepOutcome;

/// Action to perform, resolved from the CLI subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Login,
    Recover,
    Logout,
    Whoami,
}

/// Print a step outcome. Field errors are listed in place; flow failures
/// get the product message plus the remediation hint when there is one.
pub(crate) fn report(outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Invalid(errors) => {
            for (_, message) in errors.iter() {
                println!("  {message}");
            }
        }
        StepOutcome::Failed(error) => {
            println!("{}", error.message());
            if let Some(hint) = error.remediation() {
                println!("{hint}");
            }
        }
        _ => {}
    }
}
