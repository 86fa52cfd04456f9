pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "csrf")]
#[command(about = "CSRF CLI - issue and check tokens with the service's configured secret")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate a fresh token")]
    Token {
        #[arg(long, help = "Print the response header object instead of the bare token")]
        headers: bool,
    },

    #[command(about = "Check a token; exits non-zero when it is rejected")]
    Verify {
        #[arg(help = "Token to verify")]
        token: String,
        #[arg(long, help = "Maximum token age in milliseconds (defaults to CSRF_MAX_AGE_MS)")]
        max_age_ms: Option<i64>,
    },

    #[command(about = "Verify a token and show its nonce, timestamp and issue time")]
    Inspect {
        #[arg(help = "Token to inspect")]
        token: String,
        #[arg(long, help = "Maximum token age in milliseconds (defaults to CSRF_MAX_AGE_MS)")]
        max_age_ms: Option<i64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let guard = crate::config::init()?.csrf_guard();

    match cli.command {
        Commands::Token { headers } => commands::token::generate(&guard, headers, output_format),
        Commands::Verify { token, max_age_ms } => {
            commands::token::verify(&guard, &token, max_age_ms, output_format)
        }
        Commands::Inspect { token, max_age_ms } => {
            commands::token::inspect(&guard, &token, max_age_ms, output_format)
        }
    }
}
