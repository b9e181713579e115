//! Decoding of the browser callbacks posted by the ACS.
//!
//! Both the 3DS Method completion (`threeDSMethodData`) and the challenge
//! result (`cres`) arrive as a form field holding base64-encoded JSON.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ThreeDsError;

/// Form field posted to the method notification URL.
pub const METHOD_DATA_PARAM: &str = "threeDSMethodData";
/// Form field posted to the challenge notification URL.
pub const CHALLENGE_RESPONSE_PARAM: &str = "cres";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNotification {
    #[serde(rename = "threeDSServerTransID", default)]
    pub three_ds_server_trans_id: String,
}

/// Challenge response (CRes) relayed by the cardholder's browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeResponse {
    #[serde(rename = "threeDSServerTransID", default)]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "acsTransID", default)]
    pub acs_trans_id: String,
    #[serde(rename = "challengeCompletionInd", default)]
    pub challenge_completion_ind: String,
    #[serde(rename = "messageType", default)]
    pub message_type: String,
    #[serde(rename = "messageVersion", default)]
    pub message_version: String,
    #[serde(rename = "transStatus", default)]
    pub trans_status: String,
}

/// Decode a notification field value into `T`.
///
/// The value may still be percent-encoded, may carry `=` padding, and may use
/// either the standard or the URL-safe base64 alphabet.
pub fn decode_notification<T: DeserializeOwned>(value: &str) -> Result<T, ThreeDsError> {
    let unescaped = urlencoding::decode(value).map_err(|e| {
        ThreeDsError::InvalidRequest(format!("failed to unescape notification data: {e}"))
    })?;

    // A '+' that was not percent-encoded turns into ' ' during form decoding.
    let normalized: String = unescaped
        .chars()
        .filter(|c| *c != '=' && !c.is_ascii_control())
        .map(|c| match c {
            ' ' | '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let json = STANDARD_NO_PAD.decode(&normalized).map_err(|e| {
        ThreeDsError::InvalidRequest(format!("failed to decode base64 notification data: {e}"))
    })?;

    serde_json::from_slice(&json).map_err(|e| {
        ThreeDsError::InvalidRequest(format!("failed to parse notification JSON: {e}"))
    })
}

/// Encode a notification payload the way an ACS posts it (padded standard base64).
pub fn encode_notification<T: Serialize>(payload: &T) -> Result<String, ThreeDsError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| ThreeDsError::InvalidRequest(format!("failed to encode notification: {e}")))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_padded_standard_base64() {
        // {"threeDSServerTransID":"T1"}
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(br#"{"threeDSServerTransID":"T1"}"#);
        assert!(encoded.ends_with('='));

        let decoded: MethodNotification = decode_notification(&encoded).unwrap();
        assert_eq!(decoded.three_ds_server_trans_id, "T1");
    }

    #[test]
    fn decodes_percent_encoded_value() {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(br#"{"threeDSServerTransID":"T1"}"#);
        let escaped = urlencoding::encode(&encoded).into_owned();
        assert_ne!(escaped, encoded);

        let decoded: MethodNotification = decode_notification(&escaped).unwrap();
        assert_eq!(decoded.three_ds_server_trans_id, "T1");
    }

    #[test]
    fn decodes_url_safe_alphabet() {
        let cres = ChallengeResponse {
            three_ds_server_trans_id: "T1".into(),
            trans_status: "Y".into(),
            // Forces '+' / '/' in the standard encoding.
            acs_trans_id: "~~~???>>>".into(),
            ..Default::default()
        };
        let json = serde_json::to_vec(&cres).unwrap();
        let url_safe = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&json);

        let decoded: ChallengeResponse = decode_notification(&url_safe).unwrap();
        assert_eq!(decoded, cres);
    }

    #[test]
    fn encode_then_decode_challenge_response() {
        let cres = ChallengeResponse {
            three_ds_server_trans_id: "T9".into(),
            trans_status: "N".into(),
            message_type: "CRes".into(),
            ..Default::default()
        };
        let encoded = encode_notification(&cres).unwrap();
        let decoded: ChallengeResponse = decode_notification(&encoded).unwrap();
        assert_eq!(decoded, cres);
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_notification::<MethodNotification>("not*base64!").unwrap_err();
        assert!(matches!(err, ThreeDsError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_non_json_payload() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"hello");
        let err = decode_notification::<MethodNotification>(&encoded).unwrap_err();
        assert!(matches!(err, ThreeDsError::InvalidRequest(_)));
    }
}
