//! Best-effort extraction of a JSON string array from model output.
//!
//! Models are told to answer with a bare JSON array but regularly wrap it in
//! markdown fences or a sentence of prose. Cleaning removes the fences and
//! blank lines; extraction then finds the first bracketed region that parses
//! as a JSON array.

use serde_json::Value;

/// Why a response could not be turned into subtasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The text was not valid JSON.
    Json(String),
    /// Valid JSON, but not an array.
    NotAList,
    /// An array with no usable entries.
    EmptyList,
}

/// Trims the text, strips ```` ```json ```` / ```` ``` ```` markers together
/// with the whitespace that follows them, and drops blank lines.
#[must_use]
pub fn clean_response(text: &str) -> String {
    let mut unfenced = String::with_capacity(text.len());
    let mut rest = text.trim();
    while let Some(pos) = rest.find("```") {
        unfenced.push_str(&rest[..pos]);
        let after = &rest[pos + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        rest = after.trim_start();
    }
    unfenced.push_str(rest);

    unfenced.lines().filter(|line| !line.trim().is_empty()).collect::<Vec<_>>().join("\n")
}

/// Returns the first balanced `[...]` region that parses as a JSON array.
///
/// Brackets inside JSON string literals are ignored while balancing.
#[must_use]
pub fn extract_array(text: &str) -> Option<&str> {
    text.match_indices('[').find_map(|(start, _)| {
        let end = balanced_end(&text[start..])?;
        let candidate = &text[start..start + end];
        serde_json::from_str::<Vec<Value>>(candidate).is_ok().then_some(candidate)
    })
}

/// Byte length of the balanced region starting at `s[0] == '['`.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Cleans `text`, extracts the array and validates its shape.
///
/// String entries are used as-is (trimmed); other JSON values are rendered
/// as JSON text. Blank entries are dropped before the emptiness check.
///
/// # Errors
///
/// Returns a [`ParseFailure`] describing why no subtasks could be read.
pub fn parse_subtasks(text: &str) -> Result<Vec<String>, ParseFailure> {
    let cleaned = clean_response(text);
    let candidate = extract_array(&cleaned).unwrap_or(&cleaned);

    let value: Value =
        serde_json::from_str(candidate).map_err(|e| ParseFailure::Json(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(ParseFailure::NotAList);
    };

    let items: Vec<String> = entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(ParseFailure::EmptyList);
    }
    Ok(items)
}
