use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;

/// The outcome of a dispatched call.
///
/// Retryable statuses that outlived every retry are returned here as well,
/// check [`Response::is_success`] before using the body.
#[derive(Debug, Clone)]
pub struct Response {
    /// Url the request was sent to, with query.
    pub url: String,
    /// HTTP method.
    pub method: Method,
    /// Payload that was signed and sent.
    pub raw_request: String,
    /// Headers that were sent, including `authorization`.
    pub headers: HeaderMap,
    /// Status of the last attempt.
    pub status: StatusCode,
    /// Body of the last attempt.
    pub raw_response: String,
    /// `raw_response` parsed as JSON. `None` for empty or non JSON bodies.
    pub response: Option<serde_json::Value>,
    /// Value of `x-amz-pay-request-id`, useful for support cases.
    pub request_id: Option<String>,
    /// Attempts after the first one.
    pub retries: u32,
    /// Time spent in the call, retry waits included.
    pub duration: Duration,
}

impl Response {
    /// Whether the service accepted the call: 200, 201 or 202.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn response(status: u16) -> Response {
        Response {
            url: "https://pay-api.amazon.com/live/v2/charges".to_string(),
            method: Method::POST,
            raw_request: "{}".to_string(),
            headers: HeaderMap::new(),
            status: StatusCode::from_u16(status).unwrap(),
            raw_response: String::new(),
            response: None,
            request_id: None,
            retries: 0,
            duration: Duration::ZERO,
        }
    }

    #[test_case(200, true)]
    #[test_case(201, true)]
    #[test_case(202, true)]
    #[test_case(204, false)]
    #[test_case(400, false)]
    #[test_case(503, false)]
    fn test_is_success(status: u16, expected: bool) {
        assert_eq!(response(status).is_success(), expected);
    }
}
