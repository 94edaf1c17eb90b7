//! Response envelope returned by the remote catalog for any entity kind.

use crate::status::StatusCode;
use serde::{Deserialize, Serialize};

/// One remote response describing a page of results plus paging counters
/// and status.
///
/// Produced once per remote call and consumed immediately by the mediator
/// or data source; never persisted as-is. The paging counters are the
/// authority for continuation offsets: `offset` and `limit` echo the
/// request, `number_of_page_results` is how many items this page actually
/// holds, and `number_of_total_results` is the service's current view of
/// the full result set size (which may drift between calls).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status_code: StatusCode,
    /// Human-readable status text; `"OK"` on success.
    pub error: String,
    pub limit: u32,
    pub offset: u32,
    pub number_of_page_results: u32,
    pub number_of_total_results: u32,
    pub results: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn is_ok(&self) -> bool {
        self.status_code.is_ok()
    }

    /// Whether this page is the last one for forward pagination.
    pub fn end_of_results(&self) -> bool {
        self.offset + self.number_of_page_results >= self.number_of_total_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_shape() {
        let json = r#"{
            "status_code": 1,
            "error": "OK",
            "limit": 100,
            "offset": 0,
            "number_of_page_results": 2,
            "number_of_total_results": 2,
            "results": [10, 20]
        }"#;
        let envelope: Envelope<i64> = serde_json::from_str(json).unwrap();
        assert!(envelope.is_ok());
        assert_eq!(envelope.results, vec![10, 20]);
        assert!(envelope.end_of_results());
    }

    #[test]
    fn test_end_of_results_with_more_pages() {
        let envelope = Envelope::<i64> {
            status_code: StatusCode::Ok,
            error: "OK".to_string(),
            limit: 5,
            offset: 0,
            number_of_page_results: 5,
            number_of_total_results: 12,
            results: vec![1, 2, 3, 4, 5],
        };
        assert!(!envelope.end_of_results());
    }

    #[test]
    fn test_non_ok_status() {
        let json = r#"{
            "status_code": 100,
            "error": "Invalid API Key",
            "limit": 0,
            "offset": 0,
            "number_of_page_results": 0,
            "number_of_total_results": 0,
            "results": []
        }"#;
        let envelope: Envelope<i64> = serde_json::from_str(json).unwrap();
        assert!(!envelope.is_ok());
        assert_eq!(envelope.status_code, StatusCode::InvalidApiKey);
        assert_eq!(envelope.error, "Invalid API Key");
    }
}
