//! Configure command implementation
//!
//! Prompts for the access id and key and stores them in the credentials
//! file used by every later export.

use crate::config::{expand_home, Credentials, ExporterConfig};
use crate::domain::{Result, SumoError};
use clap::Args;
use std::io::{self, BufRead, Write};

/// Arguments for the configure command
#[derive(Args, Debug)]
pub struct ConfigureArgs {}

impl ConfigureArgs {
    /// Execute the configure command
    pub async fn execute(&self, config: &ExporterConfig) -> anyhow::Result<i32> {
        let path = expand_home(&config.api.credentials_file);
        tracing::info!(path = %path.display(), "Configuring credentials");

        println!("Initializing sumo-export...");
        println!();
        println!("To get started, we'll need your Sumo Logic credentials.");

        let stdin = io::stdin();
        let credentials = prompt_credentials(&mut stdin.lock(), &mut io::stdout())?;
        credentials.save(&path)?;

        println!();
        println!("Your API credentials are stored in the file: {}", path.display());
        println!("Run sumo-export --help for usage information.");
        Ok(0)
    }
}

/// Ask for identity and secret until both are non-empty
///
/// # Errors
///
/// Returns [`SumoError::Configuration`] if input ends before both values are read.
pub fn prompt_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Credentials> {
    loop {
        let identity = prompt(input, output, "Enter your access id or email: ")?;
        let secret = prompt(input, output, "Enter your access key or password: ")?;

        if !identity.is_empty() && !secret.is_empty() {
            return Ok(Credentials::new(identity, secret));
        }

        writeln!(output)?;
        writeln!(output, "Your Sumo Logic credentials are needed to continue!")?;
        writeln!(output)?;
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SumoError::Configuration(
            "Input closed before credentials were entered".to_string(),
        ));
    }
    Ok(line.trim().to_string())
}
