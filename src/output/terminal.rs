// Colored terminal output for moderation verdicts, usage and errors.
//
// The server's verdict shape is opaque to the client, so the display picks
// out the fields it recognizes and lists the rest as compact JSON.

use colored::Colorize;
use serde_json::Value;

use super::truncate_chars;
use crate::error::Error;
use crate::types::{ModerationResult, UsageResponse};

/// Longest value shown inline before it's cut off.
const MAX_VALUE_CHARS: usize = 80;

/// Verdict fields shown in the header rather than in the field list.
const HEADLINE_FIELDS: [&str; 2] = ["isClean", "severity"];

/// Display a moderation verdict in the terminal.
pub fn display_moderation(result: &ModerationResult) {
    println!("\n{}", "=== Moderation Result ===".bold());

    match result.get("isClean").and_then(Value::as_bool) {
        Some(true) => println!("  Verdict: {}", "clean".green().bold()),
        Some(false) => println!("  Verdict: {}", "flagged".red().bold()),
        None => println!("  Verdict: {}", "unknown".dimmed()),
    }
    if let Some(severity) = result.get("severity").and_then(Value::as_str) {
        println!("  Severity: {}", colorize_severity(severity));
    }

    let fields = detail_fields(result);
    if !fields.is_empty() {
        println!();
        for (key, value) in fields {
            println!("  {:<24} {}", key.as_str().dimmed(), value);
        }
    }
    println!();
}

/// Display account usage in the terminal.
pub fn display_usage(usage: &UsageResponse) {
    println!("\n{}", "=== SafeComms Usage ===".bold());
    println!("  Tier: {}", usage.tier.as_deref().unwrap_or("?").bold());

    if let Some(rate_limit) = &usage.rate_limit {
        println!("  Rate limit: {rate_limit} requests/min");
    }

    let used = usage
        .tokens_used
        .as_ref()
        .map_or_else(|| "0".to_string(), |n| n.to_string());
    match &usage.token_limit {
        Some(Some(limit)) => println!("  Tokens: {used} / {limit}"),
        Some(None) => println!("  Tokens: {used} (no limit)"),
        None => println!("  Tokens: {used}"),
    }

    if let Some(remaining) = &usage.remaining_tokens {
        let exhausted = remaining.as_f64().is_some_and(|n| n <= 0.0);
        let remaining_str = if exhausted {
            remaining.to_string().red().to_string()
        } else {
            remaining.to_string().green().to_string()
        };
        println!("  Remaining: {remaining_str}");
    }
    println!();
}

/// Display a failed call, including the problem body when the server sent one.
pub fn display_error(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    if let Some(api_error) = error.as_client_error() {
        if let Some(status) = api_error.status {
            eprintln!("  Status: {status}");
        }
        if let Some(problem) = &api_error.problem {
            if let Some(title) = problem.title() {
                eprintln!("  Title: {title}");
            }
            if let Some(problem_type) = problem.problem_type() {
                eprintln!("  Type: {}", problem_type.dimmed());
            }
        }
        if api_error.is_rate_limited() {
            eprintln!(
                "  {}",
                "Rate limited. Run `safecomms usage` to check your limits.".yellow()
            );
        }
    }
}

/// Non-headline fields of a verdict as `(key, compact value)` pairs, sorted by key.
pub fn detail_fields(result: &ModerationResult) -> Vec<(String, String)> {
    let Some(object) = result.as_object() else {
        return vec![(
            "result".to_string(),
            truncate_chars(&result.to_string(), MAX_VALUE_CHARS),
        )];
    };

    object
        .iter()
        .filter(|(key, _)| !HEADLINE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), truncate_chars(&rendered, MAX_VALUE_CHARS))
        })
        .collect()
}

fn colorize_severity(severity: &str) -> String {
    match severity.to_ascii_lowercase().as_str() {
        "none" => severity.green().to_string(),
        "low" => severity.yellow().to_string(),
        "medium" => severity.bright_red().to_string(),
        "high" | "critical" => severity.red().bold().to_string(),
        _ => severity.normal().to_string(),
    }
}
