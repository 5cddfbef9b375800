//! Human-readable refusals and structured JSON error formatting.

use bolus_core::error::DoseError;
use serde_json::json;

/// Stable name for a refusal kind.
pub fn error_kind_name(e: &DoseError) -> &'static str {
    match e {
        DoseError::InvalidInput(_) => "InvalidInput",
        DoseError::InvalidTimestamp(_) => "InvalidTimestamp",
        DoseError::InvalidConfiguration(_) => "InvalidConfiguration",
        DoseError::Source(_) => "Source",
    }
}

/// Map an eyre::Report to an explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(de) = err.downcast_ref::<DoseError>() {
        return match de {
            DoseError::InvalidInput(msg) => format!(
                "Dose refused: invalid input ({msg}).\nNo dose was calculated.\nHow to fix: Check the glucose, carbohydrate and trend values; they must be finite and carbs must not be negative."
            ),
            DoseError::InvalidTimestamp(msg) => format!(
                "Dose refused: invalid timestamp ({msg}).\nNo dose was calculated.\nLikely causes: Log entries dated after --now, clock skew, or an insulin log that is not sorted oldest first.\nHow to fix: Correct the log or the evaluation time and retry."
            ),
            DoseError::InvalidConfiguration(msg) => format!(
                "Dose refused: invalid configuration ({msg}).\nNo dose was calculated.\nHow to fix: Edit the [safety]/[profile] values in the config file, then rerun check-config."
            ),
            DoseError::Source(msg) => format!(
                "Dose refused: an external data source failed ({msg}).\nNo dose was calculated.\nHow to fix: Restore the source and retry; no fallback dose is ever substituted."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("must have headers") {
        return format!(
            "Invalid CSV headers. Insulin logs need 'timestamp,dose'; CGM exports need 'timestamp,glucose'.\nDetail: {msg}"
        );
    }
    if lower.contains("config") {
        return format!(
            "Dose refused: configuration problem.\nDetail: {msg}\nHow to fix: Edit the config file and run check-config."
        );
    }

    let cause = err
        .chain()
        .nth(1)
        .map(|src| format!(" Cause: {src}"))
        .unwrap_or_default();
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Detail: {msg}"
    )
}

/// Map a refusal kind to a stable exit code; other errors return 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<DoseError>() {
        Some(DoseError::InvalidInput(_)) => 3,
        Some(DoseError::InvalidTimestamp(_)) => 4,
        Some(DoseError::InvalidConfiguration(_)) => 5,
        Some(DoseError::Source(_)) => 6,
        None => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    let reason = err
        .downcast_ref::<DoseError>()
        .map(error_kind_name)
        .unwrap_or("Error");
    json!({ "reason": reason, "refused": true, "message": humanize(err) }).to_string()
}
