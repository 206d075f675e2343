//! SQL extraction from LLM replies.
//!
//! Models are asked for exactly one SQL statement, but replies arrive in
//! varied shapes: bare SQL, a ```sql fence, or a plain ``` fence. The
//! extraction tolerates all three and rejects anything that does not
//! reduce to a single non-empty statement.

use crate::error::{QueryscopeError, Result};

/// Extracts exactly one SQL statement from an LLM reply.
///
/// Returns `MalformedModelOutput` if the reply is empty after
/// extraction, or if it contains more than one statement.
pub fn extract_sql(response: &str) -> Result<String> {
    let candidate = extract_code_block(response, "sql")
        .or_else(|| extract_code_block(response, ""))
        .unwrap_or_else(|| response.to_string());

    let sql = candidate.trim();
    if sql.is_empty() {
        return Err(QueryscopeError::malformed_output(
            "model reply contained no SQL statement",
        ));
    }

    // A single trailing semicolon is fine; any other separator means the
    // model returned multiple statements.
    let stripped = sql.strip_suffix(';').unwrap_or(sql).trim_end();
    if contains_statement_separator(stripped) {
        return Err(QueryscopeError::malformed_output(
            "model reply contained more than one SQL statement",
        ));
    }
    if stripped.is_empty() {
        return Err(QueryscopeError::malformed_output(
            "model reply contained no SQL statement",
        ));
    }

    Ok(stripped.to_string())
}

/// Returns true if the text contains a semicolon outside quoted
/// string literals and quoted identifiers. A doubled quote inside a
/// literal toggles the state twice, so `''` escapes fall out naturally.
fn contains_statement_separator(sql: &str) -> bool {
    let mut in_single = false;
    let mut in_double = false;

    for c in sql.chars() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            ';' if !in_single && !in_double => return true,
            _ => {}
        }
    }

    false
}

/// Extracts content from the first markdown code block with the given
/// language. Pass an empty string to match blocks without a language
/// specifier.
fn extract_code_block(text: &str, lang: &str) -> Option<String> {
    let start_pattern = format!("```{lang}");

    let start_idx = text.find(&start_pattern)?;

    // Content begins after the newline that closes the opening fence.
    let content_start = text[start_idx + start_pattern.len()..]
        .find('\n')
        .map(|i| start_idx + start_pattern.len() + i + 1)?;

    // A bare ``` followed by text before the newline is a different
    // language's block, not a plain fence.
    if lang.is_empty() {
        let after_fence = &text[start_idx + 3..content_start - 1];
        if !after_fence.trim().is_empty() {
            return None;
        }
    }

    let end_idx = text[content_start..].find("```")?;

    Some(text[content_start..content_start + end_idx].to_string())
}
