//! Status codes reported by the remote catalog service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code carried in every response envelope.
///
/// The wire value is a bare integer; codes the client does not know about
/// are preserved in [`StatusCode::Other`] so they can be reported verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StatusCode {
    Ok,
    InvalidApiKey,
    ObjectNotFound,
    UrlFormatError,
    JsonpCallbackMissing,
    FilterError,
    SubscriberOnlyVideo,
    Other(i32),
}

impl StatusCode {
    pub fn code(self) -> i32 {
        match self {
            StatusCode::Ok => 1,
            StatusCode::InvalidApiKey => 100,
            StatusCode::ObjectNotFound => 101,
            StatusCode::UrlFormatError => 102,
            StatusCode::JsonpCallbackMissing => 103,
            StatusCode::FilterError => 104,
            StatusCode::SubscriberOnlyVideo => 105,
            StatusCode::Other(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            1 => StatusCode::Ok,
            100 => StatusCode::InvalidApiKey,
            101 => StatusCode::ObjectNotFound,
            102 => StatusCode::UrlFormatError,
            103 => StatusCode::JsonpCallbackMissing,
            104 => StatusCode::FilterError,
            105 => StatusCode::SubscriberOnlyVideo,
            other => StatusCode::Other(other),
        }
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::Ok => "OK",
            StatusCode::InvalidApiKey => "invalid API key",
            StatusCode::ObjectNotFound => "object not found",
            StatusCode::UrlFormatError => "URL format error",
            StatusCode::JsonpCallbackMissing => "JSONP callback missing",
            StatusCode::FilterError => "filter error",
            StatusCode::SubscriberOnlyVideo => "subscriber-only video",
            StatusCode::Other(_) => "unrecognized status",
        };
        write!(f, "{} ({})", self.code(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        for code in [1, 100, 101, 102, 103, 104, 105] {
            let status = StatusCode::from(code);
            assert_eq!(status.code(), code);
            assert!(!matches!(status, StatusCode::Other(_)));
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let status = StatusCode::from(42);
        assert_eq!(status, StatusCode::Other(42));
        assert_eq!(status.code(), 42);
    }

    #[test]
    fn test_serde_uses_raw_integer() {
        let json = serde_json::to_string(&StatusCode::InvalidApiKey).unwrap();
        assert_eq!(json, "100");

        let status: StatusCode = serde_json::from_str("1").unwrap();
        assert_eq!(status, StatusCode::Ok);
        assert!(status.is_ok());
    }
}
