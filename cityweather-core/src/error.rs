use std::{error::Error as StdError, fmt};

/// Which upstream endpoint a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CurrentWeather,
    Forecast,
    Icon,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::CurrentWeather => "current weather",
            Endpoint::Forecast => "forecast",
            Endpoint::Icon => "icon",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single query attempt.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Transport-level failure: connect, DNS, timeout, reading the body.
    #[error("{endpoint} request failed: {}", error_chain(.cause))]
    Request {
        endpoint: Endpoint,
        #[source]
        cause: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
        body: String,
    },

    /// 2xx response whose body is not what we expect.
    #[error("unexpected {endpoint} payload: {detail}")]
    UnexpectedPayload { endpoint: Endpoint, detail: String },
}

impl QueryError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            QueryError::Request { endpoint, .. }
            | QueryError::Status { endpoint, .. }
            | QueryError::UnexpectedPayload { endpoint, .. } => *endpoint,
        }
    }

    /// True for transport and HTTP-status failures.
    pub fn is_request_error(&self) -> bool {
        matches!(self, QueryError::Request { .. } | QueryError::Status { .. })
    }

    /// Transport failure; the URL is dropped since its query carries the API key.
    pub(crate) fn request(endpoint: Endpoint, cause: reqwest::Error) -> Self {
        QueryError::Request { endpoint, cause: cause.without_url() }
    }

    pub(crate) fn payload(endpoint: Endpoint, detail: impl fmt::Display) -> Self {
        QueryError::UnexpectedPayload { endpoint, detail: detail.to_string() }
    }
}

/// `reqwest` hides the interesting part (e.g. "Connection refused") in the
/// source chain; flatten it so the displayed message carries the cause.
fn error_chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = inner.source();
    }
    out
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("{\"cod\":401}"), "{\"cod\":401}");
    }

    #[test]
    fn truncate_cuts_long_bodies_on_char_boundary() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn payload_errors_are_not_request_errors() {
        let err = QueryError::payload(Endpoint::Forecast, "missing field `list`");
        assert!(!err.is_request_error());
        assert_eq!(err.endpoint(), Endpoint::Forecast);
        assert_eq!(err.to_string(), "unexpected forecast payload: missing field `list`");
    }

    #[test]
    fn status_errors_are_request_errors() {
        let err = QueryError::Status {
            endpoint: Endpoint::CurrentWeather,
            status: reqwest::StatusCode::NOT_FOUND,
            body: "{\"cod\":\"404\",\"message\":\"city not found\"}".into(),
        };
        assert!(err.is_request_error());
        assert!(err.to_string().contains("404 Not Found"));
        assert!(err.to_string().contains("city not found"));
    }
}
