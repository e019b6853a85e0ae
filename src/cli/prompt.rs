//! Line-based prompting for the interactive flows. `:volver` at any prompt
//! rewinds one step, mirroring the "Volver" controls of the portal.

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::io::{self, BufRead, Write};

/// Sentinel the user types to step back.
pub const BACK: &str = ":volver";

/// What the user answered at a prompt.
pub enum Submission<T> {
    Value(T),
    Back,
}

/// Prompt for a line of text. An empty answer returns the default when one
/// is given.
pub fn text(label: &str, default: Option<&str>) -> Result<Submission<String>> {
    let value = match default {
        Some(default) => ask(&format!("{label} [{default}]"))?,
        None => ask(label)?,
    };

    if value.trim() == BACK {
        return Ok(Submission::Back);
    }

    match default {
        Some(default) if value.trim().is_empty() => Ok(Submission::Value(default.to_string())),
        _ => Ok(Submission::Value(value)),
    }
}

/// Prompt for a secret. The value goes straight into a `SecretString`; it
/// is never logged or echoed back by this program.
pub fn secret(label: &str) -> Result<Submission<SecretString>> {
    let value = ask(label)?;

    if value.trim() == BACK {
        return Ok(Submission::Back);
    }

    Ok(Submission::Value(SecretString::from(value)))
}

fn ask(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read input")?;

    if read == 0 {
        return Err(anyhow!("unexpected end of input"));
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
