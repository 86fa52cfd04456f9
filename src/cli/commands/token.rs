use serde_json::json;

use crate::cli::utils::{output_rejection, output_valid, print_json};
use crate::cli::OutputFormat;
use crate::csrf::{CsrfGuard, TokenParts};

pub fn generate(guard: &CsrfGuard, headers: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    if headers {
        return print_json(&guard.issue_headers());
    }

    let token = guard.codec().generate();
    match output_format {
        OutputFormat::Json => print_json(&json!({ "token": token })),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

pub fn verify(
    guard: &CsrfGuard,
    token: &str,
    max_age_ms: Option<i64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    check(guard, token, max_age_ms, &output_format)?;
    output_valid(&output_format, None)
}

pub fn inspect(
    guard: &CsrfGuard,
    token: &str,
    max_age_ms: Option<i64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let parts = check(guard, token, max_age_ms, &output_format)?;
    let issued_at = parts.issued_at().map(|at| at.to_rfc3339());

    match output_format {
        OutputFormat::Json => output_valid(
            &output_format,
            Some(json!({
                "nonce": parts.nonce,
                "timestamp_ms": parts.timestamp_ms,
                "issued_at": issued_at,
            })),
        ),
        OutputFormat::Text => {
            println!("nonce:     {}", parts.nonce);
            println!("timestamp: {}", parts.timestamp_ms);
            println!("issued at: {}", issued_at.as_deref().unwrap_or("out of range"));
            Ok(())
        }
    }
}

fn check(
    guard: &CsrfGuard,
    token: &str,
    max_age_ms: Option<i64>,
    output_format: &OutputFormat,
) -> anyhow::Result<TokenParts> {
    let max_age_ms = max_age_ms.unwrap_or_else(|| guard.max_age_ms());

    guard.codec().inspect(token, max_age_ms).or_else(|e| {
        output_rejection(output_format, &e)?;
        anyhow::bail!("token rejected: {}", e)
    })
}
