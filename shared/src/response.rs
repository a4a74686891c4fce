//! API Response types
//!
//! Every non-streaming backend endpoint answers with the same envelope:
//! ```json
//! {
//!     "code": 200,
//!     "message": "成功",
//!     "data": { ... },
//!     "timestamp": 1718000000000
//! }
//! ```
//! `code == 200` means `data` follows the endpoint contract; any other code is
//! an application-level error regardless of the HTTP status.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Success sentinel carried in `code`
pub const API_CODE_SUCCESS: i32 = 200;

/// Unified response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Response code (200 = success, others = domain error codes)
    pub code: i32,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Response data (null for void endpoints and failures)
    pub data: Option<T>,
    /// Server time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl<T> Envelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            code: API_CODE_SUCCESS,
            message: "成功".to_string(),
            data: Some(data),
            timestamp: Some(crate::util::now_millis()),
        }
    }

    /// Create a failure envelope
    pub fn failed(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            timestamp: Some(crate::util::now_millis()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == API_CODE_SUCCESS
    }

    /// Split into the tagged outcome
    pub fn into_outcome(self) -> EnvelopeOutcome<T> {
        if self.is_success() {
            EnvelopeOutcome::Success {
                data: self.data,
                message: self.message,
                timestamp: self.timestamp,
            }
        } else {
            EnvelopeOutcome::Failure {
                code: self.code,
                message: self.message,
            }
        }
    }
}

/// Validated envelope: success with data, or domain error with code and message
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome<T> {
    Success {
        data: Option<T>,
        message: String,
        timestamp: Option<i64>,
    },
    Failure {
        code: i32,
        message: String,
    },
}

/// Body could not be read as an envelope
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("response body is not JSON: {0}")]
    NotJson(#[source] serde_json::Error),

    #[error("response envelope is malformed: {0}")]
    Malformed(String),

    #[error("envelope data does not match the endpoint contract: {0}")]
    Data(#[source] serde_json::Error),
}

/// Envelope whose `data` has not been bound to an endpoint type yet
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    code: i32,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    timestamp: Option<i64>,
}

impl EnvelopeOutcome<Value> {
    /// Validate a response body as an envelope.
    ///
    /// The body must be a JSON object with an integer `code`. Failure envelopes
    /// keep their message; `data` is only interpreted on success.
    pub fn parse(body: &[u8]) -> Result<Self, EnvelopeError> {
        let value: Value = serde_json::from_slice(body).map_err(EnvelopeError::NotJson)?;
        if !value.is_object() {
            return Err(EnvelopeError::Malformed("expected a JSON object".into()));
        }
        match value.get("code") {
            Some(code) if code.is_i64() || code.is_u64() => {}
            Some(_) => return Err(EnvelopeError::Malformed("`code` is not an integer".into())),
            None => return Err(EnvelopeError::Malformed("missing `code`".into())),
        }
        let raw: RawEnvelope = serde_json::from_value(value)
            .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

        let envelope = Envelope {
            code: raw.code,
            message: raw.message.unwrap_or_default(),
            data: if raw.data.is_null() { None } else { Some(raw.data) },
            timestamp: raw.timestamp,
        };
        Ok(envelope.into_outcome())
    }

    /// Bind success data to the endpoint type
    pub fn bind<T: DeserializeOwned>(self) -> Result<EnvelopeOutcome<T>, EnvelopeError> {
        match self {
            EnvelopeOutcome::Success {
                data,
                message,
                timestamp,
            } => {
                let data = data
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(EnvelopeError::Data)?;
                Ok(EnvelopeOutcome::Success {
                    data,
                    message,
                    timestamp,
                })
            }
            EnvelopeOutcome::Failure { code, message } => {
                Ok(EnvelopeOutcome::Failure { code, message })
            }
        }
    }
}

/// Paged list payload used by the IAM services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData<T> {
    pub records: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub page_count: u32,
}

impl<T> PageData<T> {
    pub fn new(records: Vec<T>, page: u32, capacity: u32, total: u64) -> Self {
        let page_count = if capacity == 0 {
            0
        } else {
            total.div_ceil(capacity as u64) as u32
        };
        Self {
            records,
            total,
            page,
            capacity,
            page_count,
        }
    }
}

/// Paged list payload used by the platform services (`current`/`size`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub records: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = br#"{"code":200,"message":"ok","data":{"id":"1"},"timestamp":1}"#;
        let outcome = EnvelopeOutcome::parse(body).unwrap();
        match outcome {
            EnvelopeOutcome::Success { data, timestamp, .. } => {
                assert_eq!(data.unwrap()["id"], "1");
                assert_eq!(timestamp, Some(1));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_parse_failure_keeps_message() {
        let body = r#"{"code":4105,"message":"Token无效或已过期","data":null}"#.as_bytes();
        let outcome = EnvelopeOutcome::parse(body).unwrap();
        assert_eq!(
            outcome,
            EnvelopeOutcome::Failure {
                code: 4105,
                message: "Token无效或已过期".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            EnvelopeOutcome::parse(b"<html>"),
            Err(EnvelopeError::NotJson(_))
        ));
        assert!(matches!(
            EnvelopeOutcome::parse(b"[1,2]"),
            Err(EnvelopeError::Malformed(_))
        ));
        assert!(matches!(
            EnvelopeOutcome::parse(br#"{"message":"x"}"#),
            Err(EnvelopeError::Malformed(_))
        ));
        assert!(matches!(
            EnvelopeOutcome::parse(br#"{"code":"200"}"#),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_bind_data_type() {
        let outcome = EnvelopeOutcome::parse(br#"{"code":200,"message":"","data":[1,2,3]}"#)
            .unwrap()
            .bind::<Vec<u32>>()
            .unwrap();
        match outcome {
            EnvelopeOutcome::Success { data, .. } => assert_eq!(data, Some(vec![1, 2, 3])),
            other => panic!("unexpected outcome: {:?}", other),
        }

        let mismatch = EnvelopeOutcome::parse(br#"{"code":200,"data":"text"}"#)
            .unwrap()
            .bind::<Vec<u32>>();
        assert!(matches!(mismatch, Err(EnvelopeError::Data(_))));
    }

    #[test]
    fn test_null_data_is_none() {
        let outcome = EnvelopeOutcome::parse(r#"{"code":200,"message":"成功","data":null}"#.as_bytes())
            .unwrap()
            .bind::<()>()
            .unwrap();
        assert!(matches!(outcome, EnvelopeOutcome::Success { data: None, .. }));
    }

    #[test]
    fn test_page_count() {
        let page = PageData::new(vec![1, 2], 1, 10, 21);
        assert_eq!(page.page_count, 3);
        let empty: PageData<u8> = PageData::new(vec![], 1, 0, 5);
        assert_eq!(empty.page_count, 0);
    }
}
