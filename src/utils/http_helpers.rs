use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;

pub const APPLICATION_JSON: &str = "application/json";

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    /// Renders `{"error": "<message>"}`. The message is JSON-escaped since it
    /// may carry arbitrary collector stderr, and non-ASCII is written as
    /// `\uXXXX` so the body is plain ASCII.
    pub fn body(&self) -> String {
        let message = serde_json::to_string(&self.message).unwrap_or_else(|_| "\"\"".to_string());
        format!("{{\"error\": {}}}", escape_non_ascii(&message))
    }
}

fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, [(CONTENT_TYPE, APPLICATION_JSON)], self.body()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_keeps_the_single_error_key_layout() {
        let err = HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Script failed: oops");
        assert_eq!(err.body(), r#"{"error": "Script failed: oops"}"#);
    }

    #[test]
    fn body_escapes_quotes_and_newlines() {
        let err = HTTPError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Script failed: line \"1\"\n\\path",
        );
        let parsed: serde_json::Value = serde_json::from_str(&err.body()).unwrap();
        assert_eq!(parsed["error"], "Script failed: line \"1\"\n\\path");
    }

    #[test]
    fn body_escapes_non_ascii() {
        let err = HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "Script failed: café 🔥");
        assert_eq!(
            err.body(),
            r#"{"error": "Script failed: caf\u00e9 \ud83d\udd25"}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&err.body()).unwrap();
        assert_eq!(parsed["error"], "Script failed: café 🔥");
    }

    #[test]
    fn response_has_status_and_json_content_type() {
        let response = HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);
    }
}
