//! Interactive prompts
//!
//! Used to fill in credentials that were not passed as flags, and to
//! confirm destructive commands.

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Read a line of visible input
pub fn prompt(label: &str) -> Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        bail!("{} is required (no terminal to prompt on)", label);
    }

    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a line without echoing it
pub fn prompt_secret(label: &str) -> Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        bail!("{} is required (no terminal to prompt on)", label);
    }

    print!("{}: ", label);
    io::stdout().flush()?;

    enable_raw_mode()?;
    let result = read_hidden();
    disable_raw_mode()?;
    println!();

    result
}

fn read_hidden() -> Result<String> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("Cancelled");
            }
            KeyCode::Esc => bail!("Cancelled"),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}
