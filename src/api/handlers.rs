//! HTTP request handlers.

use axum::{
    body::Bytes,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use serde::Deserialize;
use serde_json::Value;

use crate::api::pretty::PrettyJson;
use crate::api::types::RequestMetadata;
use crate::error::{EchoError, EchoResult};
use crate::AppState;

/// Report request metadata on GET, echo the JSON body otherwise.
///
/// Bound as the router fallback, so every path and method lands here.
pub async fn echo(State(state): State<AppState>, request: Request) -> EchoResult<Response> {
    if request.method() == Method::GET {
        let metadata = RequestMetadata::capture(&request, &state, chrono::Utc::now());
        return Ok(PrettyJson(metadata).into_response());
    }

    let body = read_body(request, state.max_body_bytes).await?;
    let value = parse_json(&body)?;

    tracing::debug!(bytes = body.len(), "Echoing JSON body");

    Ok(PrettyJson(value).into_response())
}

/// Buffer the whole request body, refusing more than `limit` bytes.
async fn read_body(request: Request, limit: usize) -> EchoResult<Bytes> {
    axum::body::to_bytes(request.into_body(), limit)
        .await
        .map_err(|e| {
            let source = e.into_inner();
            if source.downcast_ref::<LengthLimitError>().is_some() {
                EchoError::PayloadTooLarge { limit }
            } else {
                EchoError::BodyRead(source.to_string())
            }
        })
}

/// Deepest array/object nesting accepted in a request body.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Decode any JSON value from a request body.
///
/// Anything else (empty, malformed, non-UTF-8, trailing data, or nested
/// deeper than [`MAX_NESTING_DEPTH`]) is reported as `InvalidJson`.
pub fn parse_json(body: &[u8]) -> EchoResult<Value> {
    if nesting_depth(body) > MAX_NESTING_DEPTH {
        return Err(EchoError::InvalidJson);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))
        .map_err(|_| EchoError::InvalidJson)?;
    de.end().map_err(|_| EchoError::InvalidJson)?;

    Ok(value)
}

/// Maximum bracket nesting in `body`, ignoring brackets inside strings.
///
/// Stops counting once past [`MAX_NESTING_DEPTH`].
fn nesting_depth(body: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in body {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
                if max > MAX_NESTING_DEPTH {
                    break;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_accepts_every_value_kind() {
        assert_eq!(parse_json(b"null").unwrap(), Value::Null);
        assert_eq!(parse_json(b"true").unwrap(), json!(true));
        assert_eq!(parse_json(b" 42 ").unwrap(), json!(42));
        assert_eq!(parse_json(b"\"a/b\"").unwrap(), json!("a/b"));
        assert_eq!(parse_json(b"[1,2,3]").unwrap(), json!([1, 2, 3]));
        assert_eq!(
            parse_json(br#"{"a":1,"b":[2,3]}"#).unwrap(),
            json!({"a": 1, "b": [2, 3]})
        );
    }

    #[test]
    fn test_parse_json_rejects_bad_input() {
        for body in [
            &b""[..],
            &b"   "[..],
            &b"not json"[..],
            &b"{"[..],
            &b"[1,]"[..],
            &b"\xff\xfe"[..],
        ] {
            assert!(
                matches!(parse_json(body), Err(EchoError::InvalidJson)),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn test_nesting_depth_ignores_brackets_in_strings() {
        assert_eq!(nesting_depth(b"1"), 0);
        assert_eq!(nesting_depth(br#"{"a":[[1],{"b":[]}]}"#), 4);
        assert_eq!(nesting_depth(br#"["[[[{", "\"]]]"]"#), 1);
    }

    #[test]
    fn test_parse_json_depth_cap() {
        let nested = |depth: usize| format!("{}{}", "[".repeat(depth), "]".repeat(depth));

        assert!(parse_json(nested(MAX_NESTING_DEPTH).as_bytes()).is_ok());
        assert!(matches!(
            parse_json(nested(MAX_NESTING_DEPTH + 1).as_bytes()),
            Err(EchoError::InvalidJson)
        ));
    }

    #[test]
    fn test_parse_json_rejects_trailing_data() {
        assert!(matches!(parse_json(b"[1] [2]"), Err(EchoError::InvalidJson)));
        assert!(parse_json(b"[1]\n").is_ok());
    }

    #[test]
    fn test_parse_json_keeps_large_numbers_exact() {
        let body = b"[123456789012345678901234567890, 0.1000000000000000055511151231257827]";
        let value = parse_json(body).unwrap();

        let echoed = serde_json::to_string(&value).unwrap();
        assert_eq!(echoed, "[123456789012345678901234567890,0.1000000000000000055511151231257827]");
    }
}
