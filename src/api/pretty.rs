//! Pretty-printed JSON responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

const INDENT: &[u8] = b"    ";

/// Served when a value cannot be serialized.
const SERIALIZATION_FAILURE_BODY: &str = "{\n    \"message\": \"Internal Server Error\"\n}";

/// JSON response body, indented with four spaces.
///
/// Unlike `axum::Json` the output is human-readable. `/` is emitted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyJson<T>(pub T);

/// Serialize `value` with four-space indentation and no trailing newline.
pub fn to_pretty_vec<T>(value: &T) -> serde_json::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    Ok(buf)
}

impl<T> IntoResponse for PrettyJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        match to_pretty_vec(&self.0) {
            Ok(buf) => (
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                buf,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )],
                    SERIALIZATION_FAILURE_BODY,
                )
                    .into_response()
            }
        }
    }
}
