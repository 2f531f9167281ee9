use base64::{Engine, engine::general_purpose::STANDARD as Base64};
use serde::{Deserialize, Serialize};

use crate::model::AccessScope;

/// Body of the record-upload POST sent to the hosted backend.
///
/// Field names are fixed by the backend contract, hence the camelCase rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub patient: String,
    pub file_content: String,
}

impl UploadRequest {
    /// Build a request from raw file bytes, base64-encoding the content.
    pub fn from_bytes(patient: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            patient: patient.into(),
            file_content: Base64.encode(bytes),
        }
    }
}

/// Canonical upload response shape.
///
/// The backend historically answered in several divergent shapes; this pair
/// of fields is the one contract the app accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub record_id: String,
    pub content_hash: String,
}

/// Payload describing a consent grant exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRequest {
    pub doctor: String,
    pub scope: AccessScope,
    pub expiry: u64,
}

/// Acknowledgement returned by the (simulated) consent exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_request_uses_camel_case_and_base64() {
        let request = UploadRequest::from_bytes("0xabc", b"hello");
        let json = serde_json::to_string(&request).expect("encode request");
        assert!(json.contains("\"patient\":\"0xabc\""));
        assert!(json.contains("\"fileContent\":\"aGVsbG8=\""));
    }

    #[test]
    fn upload_response_parses_backend_fields() {
        let json = r#"{"recordId":"rec-123","contentHash":"0xfeed"}"#;
        let response: UploadResponse = serde_json::from_str(json).expect("decode response");
        assert_eq!(response.record_id, "rec-123");
        assert_eq!(response.content_hash, "0xfeed");
    }

    #[test]
    fn consent_request_carries_wire_scope() {
        let request = ConsentRequest {
            doctor: String::from("0x742d"),
            scope: AccessScope::All,
            expiry: 1_755_043_200,
        };
        let json = serde_json::to_string(&request).expect("encode consent");
        assert!(json.contains("\"scope\":\"ALL\""));
        assert!(json.contains("\"expiry\":1755043200"));
    }
}
