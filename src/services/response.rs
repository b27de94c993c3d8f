use serde::Deserialize;

use crate::captions::model::{Caption, CaptionId};
use crate::foundation::error::{RelingoError, RelingoResult};

#[derive(Debug, Deserialize)]
struct RawCaption {
    #[serde(default)]
    id: Option<serde_json::Value>,
    start: f64,
    end: f64,
    text: String,
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`, `JSON`, ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn caption_id(raw: Option<serde_json::Value>) -> RelingoResult<CaptionId> {
    match raw {
        None | Some(serde_json::Value::Null) => Ok(CaptionId::generate()),
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(CaptionId(s)),
        Some(serde_json::Value::Number(n)) => Ok(CaptionId(n.to_string())),
        Some(other) => Err(RelingoError::validation(format!(
            "unusable caption id {other}"
        ))),
    }
}

/// Parse a collaborator's JSON caption list (`[{id, start, end, text}]`).
///
/// The JSON may be wrapped in a markdown code fence. Numeric ids are kept as their decimal text
/// and missing ids are generated. Anything that does not parse into valid captions is a service
/// error of `operation`; an empty list is a valid result.
pub fn parse_caption_response(operation: &str, text: &str) -> RelingoResult<Vec<Caption>> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(RelingoError::service(operation, "empty response"));
    }
    let raw: Vec<RawCaption> = serde_json::from_str(body)
        .map_err(|e| RelingoError::service(operation, format!("malformed caption list: {e}")))?;

    raw.into_iter()
        .map(|r| Caption::new(caption_id(r.id)?, r.start, r.end, r.text))
        .collect::<RelingoResult<Vec<_>>>()
        .map_err(|e| e.into_service(operation))
}

#[cfg(test)]
#[path = "../../tests/unit/services/response.rs"]
mod tests;
