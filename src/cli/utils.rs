use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::csrf::TokenError;

/// Printed on stdout for an accepted token in text mode.
pub const VALID: &str = "valid";

/// Stable code for scripts matching on `--json` output.
pub fn rejection_code(error: &TokenError) -> &'static str {
    match error {
        TokenError::Malformed => "MALFORMED",
        TokenError::SignatureMismatch => "SIGNATURE_MISMATCH",
        TokenError::InvalidTimestamp => "INVALID_TIMESTAMP",
        TokenError::Expired { .. } => "EXPIRED",
        TokenError::FromFuture { .. } => "FROM_FUTURE",
    }
}

fn valid_json(details: Option<Value>) -> Value {
    let mut verdict = json!({ "valid": true });
    if let (Some(Value::Object(fields)), Some(object)) = (details, verdict.as_object_mut()) {
        object.extend(fields);
    }
    verdict
}

fn rejection_json(error: &TokenError) -> Value {
    json!({
        "valid": false,
        "error": error.to_string(),
        "error_code": rejection_code(error),
    })
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report an accepted token. Text mode prints `valid` alone; JSON merges
/// `details` (an object) into `{ "valid": true }`.
pub fn output_valid(output_format: &OutputFormat, details: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&valid_json(details)),
        OutputFormat::Text => {
            println!("{}", VALID);
            Ok(())
        }
    }
}

/// Report a rejected token: JSON on stdout, or the reason on stderr.
pub fn output_rejection(output_format: &OutputFormat, error: &TokenError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => print_json(&rejection_json(error)),
        OutputFormat::Text => {
            eprintln!("invalid: {}", error);
            Ok(())
        }
    }
}
