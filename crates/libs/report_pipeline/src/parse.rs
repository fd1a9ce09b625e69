use serde_json::Value;
use thiserror::Error;

/// No balanced JSON payload could be located in the model's response.
/// Carries the original raw text for operator diagnosis; callers must never
/// silently substitute a default.
#[derive(Error, Debug)]
#[error("no parsable JSON payload in model response")]
pub struct MalformedResponse {
    pub raw: String,
}

/// Best-effort extraction of the JSON object/array a model was instructed to
/// emit. The upstream model is not contractually guaranteed to honor "JSON
/// only" instructions, so this tolerates code fences and prose wrappers.
///
/// 1. Trim and attempt a direct parse.
/// 2. Strip markdown code-fence markers and retry.
/// 3. Slice from the first `{`/`[` to the last `}`/`]` and retry.
pub fn parse_model_json(raw: &str) -> Result<Value, MalformedResponse> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let unfenced = strip_code_fences(trimmed);
    if let Ok(value) = serde_json::from_str(unfenced.trim()) {
        return Ok(value);
    }

    if let (Some(start), Some(end)) = (unfenced.find(['{', '[']), unfenced.rfind(['}', ']']))
        && end > start
        && let Ok(value) = serde_json::from_str(&unfenced[start..=end])
    {
        return Ok(value);
    }

    Err(MalformedResponse {
        raw: raw.to_string(),
    })
}

/// Remove a leading ```` ```json ```` (or bare ```` ``` ````) line and a
/// trailing fence.
fn strip_code_fences(s: &str) -> String {
    let mut result = s.to_string();
    if result.starts_with("```") {
        result = match result.find('\n') {
            Some(first_newline) => result[first_newline + 1..].to_string(),
            None => result.trim_start_matches('`').to_string(),
        };
    }
    if result.trim_end().ends_with("```") {
        let trimmed = result.trim_end();
        result = trimmed[..trimmed.len() - 3].trim_end().to_string();
    }
    result
}
