use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Result};

pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let globals = GlobalArgs::new(
        matches
            .get_one("api-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow!("missing required argument: --api-url"))?,
    );

    let action = match matches.subcommand_name() {
        Some("register") => Action::Register,
        Some("login") => Action::Login,
        Some("recover") => Action::Recover,
        Some("logout") => Action::Logout,
        Some("whoami") => Action::Whoami,
        _ => return Err(anyhow!("missing subcommand")),
    };

    Ok((action, globals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn maps_subcommands_to_actions() {
        let cases = [
            ("register", Action::Register),
            ("login", Action::Login),
            ("recover", Action::Recover),
            ("logout", Action::Logout),
            ("whoami", Action::Whoami),
        ];

        for (name, expected) in cases {
            let matches = commands::new().get_matches_from(vec!["vecino", name]);
            let (action, globals) = handler(&matches).expect("dispatch");
            assert_eq!(action, expected);
            assert_eq!(globals.api_url, "http://localhost:3023/v1");
        }
    }

    #[test]
    fn carries_the_api_url_into_globals() {
        let matches = commands::new().get_matches_from(vec![
            "vecino",
            "--api-url",
            "https://portal.example.com/v1",
            "whoami",
        ]);
        let (_, globals) = handler(&matches).expect("dispatch");
        assert_eq!(globals.api_url, "https://portal.example.com/v1");
    }
}
