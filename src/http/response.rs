use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

use super::rate::{parse_rate, Rate, HEADER_RATE_REMAINING};
use crate::error::{Error, ErrorBody, ErrorResponse, RateLimitError};

/// Metadata of an API response together with the rate counters parsed from it.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    rate: Rate,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url) -> Self {
        let rate = parse_rate(&headers);
        Self {
            status,
            headers,
            url,
            rate,
        }
    }

    pub(crate) fn from_reqwest(res: &reqwest::Response) -> Self {
        Self::new(res.status(), res.headers().clone(), res.url().clone())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }
}

/// Check a response for errors.
///
/// Any status outside 200..=299 is an error. A 429 whose remaining counter
/// is exactly `0` becomes [`Error::RateLimit`]; everything else becomes
/// [`Error::Api`]. Error bodies that do not match [`ErrorBody`] are ignored.
pub fn check_response(response: &Response, body: &[u8]) -> Result<(), Error> {
    if response.status.is_success() {
        return Ok(());
    }
    Err(classify_error(response, body))
}

pub(crate) fn classify_error(response: &Response, body: &[u8]) -> Error {
    let error = ErrorResponse {
        response: response.clone(),
        body: serde_json::from_slice::<ErrorBody>(body).ok(),
    };

    let exhausted = response
        .headers
        .get(HEADER_RATE_REMAINING)
        .is_some_and(|v| v.as_bytes() == b"0");
    if response.status == StatusCode::TOO_MANY_REQUESTS && exhausted {
        return Error::RateLimit(RateLimitError {
            rate: response.rate,
            error,
        });
    }
    Error::Api(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(status: u16, pairs: &[(&'static str, &str)]) -> Response {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(*k, v.parse().unwrap());
        }
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            h,
            Url::parse("https://api.uphold.com/v0/me").unwrap(),
        )
    }

    #[test]
    fn status_matrix() {
        for code in 100u16..600 {
            let res = check_response(&envelope(code, &[]), b"");
            assert_eq!(res.is_ok(), (200..=299).contains(&code), "status {code}");
        }
    }

    #[test]
    fn rate_limit_requires_zero_remaining() {
        let headers = [
            ("x-ratelimit-limit", "300"),
            ("x-ratelimit-remaining", "0"),
            ("x-ratelimit-reset", "1451606400"),
            ("retry-after", "30"),
        ];
        let err = check_response(&envelope(429, &headers), b"").unwrap_err();
        let Error::RateLimit(rl) = err else {
            panic!("expected rate limit error");
        };
        assert_eq!(rl.rate.limit, 300);
        assert_eq!(rl.rate.remaining, 0);
        assert_eq!(rl.rate.reset_at.unwrap().timestamp(), 1_451_606_400);
        assert_eq!(rl.rate.retry_after, 30);
        assert_eq!(rl.error.response.status(), StatusCode::TOO_MANY_REQUESTS);

        let err =
            check_response(&envelope(429, &[("x-ratelimit-remaining", "5")]), b"").unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        let err = check_response(&envelope(429, &[]), b"").unwrap_err();
        assert!(matches!(err, Error::Api(_)));
        assert!(!err.is_rate_limited());
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn structured_body_is_parsed() {
        let body = br#"{"message":"Validation Failed","errors":[{"resource":"card","field":"label","code":"required"}]}"#;
        let err = check_response(&envelope(400, &[]), body).unwrap_err();
        let api = err.api_error().unwrap();
        assert_eq!(api.message(), Some("Validation Failed"));
        assert_eq!(api.errors()[0].code, "required");
        assert!(api.block().is_none());
        assert_eq!(err.to_string(), "API error: 400 Bad Request: Validation Failed");
    }

    #[test]
    fn junk_body_is_ignored() {
        let err = check_response(&envelope(502, &[]), b"<html>bad gateway</html>").unwrap_err();
        let api = err.api_error().unwrap();
        assert!(api.body.is_none());
        assert_eq!(api.response.status(), StatusCode::BAD_GATEWAY);
    }
}
