//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use valve_core::error::BuildError;

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingLink => {
                "What happened: The controller was built without a device link.\nLikely causes: Startup wiring skipped the connection step.\nHow to fix: This is a bug; please report it with --log-level=debug output.".to_string()
            }
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read ({msg}).\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass an existing file with --config, or omit it to use built-in defaults."
        );
    }

    if lower.contains("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this program ({msg}).\nLikely causes: Typo in a key, or a value of the wrong type (e.g. baud as a string).\nHow to fix: Edit the TOML and try again."
        );
    }

    if lower.starts_with("serial.") || lower.starts_with("logging.") {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range value in the TOML or on the command line.\nHow to fix: Edit the config file or the overriding flag, then rerun."
        );
    }

    if lower.contains("log level") {
        return format!(
            "What happened: {msg}.\nHow to fix: Use one of error, warn, info, debug, trace."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = err.to_string();
    let reason = if msg.to_ascii_lowercase().contains("config")
        || msg.starts_with("serial.")
        || msg.starts_with("logging.")
    {
        "Config"
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
