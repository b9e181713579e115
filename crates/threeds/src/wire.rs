//! JSON shapes exchanged with the remote 3DS server.
//!
//! Only the fields this integration reads or must send are modelled; unknown
//! response fields are ignored.

use serde::{Deserialize, Serialize};

/// Common response wrapper: `{"status": 200, "message": ..., "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "status", default)]
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRequest {
    pub transaction_id: String,
    pub pan: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponseData {
    #[serde(rename = "transactionId", default)]
    pub transaction_id: String,
    #[serde(rename = "threeDSServerTransID", default)]
    pub three_ds_server_trans_id: String,
    #[serde(
        rename = "threeDSMethodURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub three_ds_method_url: Option<String>,
    #[serde(rename = "versionRecommendation", default)]
    pub version_recommendation: String,
}

impl VersionResponseData {
    /// The 3DS Method URL, treating an empty string as absent.
    pub fn method_url(&self) -> Option<&str> {
        self.three_ds_method_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub timestamp: i64,
    pub customer_id: String,
    pub transaction_id: String,
    pub areq_data: AReqData,
}

/// The authentication request (AReq) body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AReqData {
    #[serde(rename = "messageCategory")]
    pub message_category: String,
    #[serde(rename = "messageVersion")]
    pub message_version: String,
    #[serde(rename = "deviceChannel")]
    pub device_channel: String,
    #[serde(rename = "threeDSRequestorID")]
    pub three_ds_requestor_id: String,
    #[serde(rename = "threeDSRequestorName")]
    pub three_ds_requestor_name: String,
    #[serde(rename = "threeDSRequestorURL")]
    pub three_ds_requestor_url: String,
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "threeDSRequestorAuthenticationInd")]
    pub three_ds_requestor_authentication_ind: String,
    #[serde(rename = "threeDSCompInd")]
    pub three_ds_comp_ind: String,
    #[serde(rename = "acquirerMerchantID")]
    pub acquirer_merchant_id: String,
    #[serde(rename = "acquirerBIN")]
    pub acquirer_bin: String,
    pub pan: String,
    #[serde(rename = "cardExpiryDate", skip_serializing_if = "String::is_empty")]
    pub card_expiry_date: String,
    #[serde(rename = "merchantCountryCode")]
    pub merchant_country_code: String,
    #[serde(rename = "merchantName")]
    pub merchant_name: String,
    pub mcc: String,
    #[serde(rename = "purchaseAmount")]
    pub purchase_amount: String,
    #[serde(rename = "purchaseCurrency")]
    pub purchase_currency: String,
    #[serde(rename = "purchaseExponent")]
    pub purchase_exponent: String,
    #[serde(rename = "purchaseDate")]
    pub purchase_date: String,
    #[serde(rename = "browserAcceptHeader")]
    pub browser_accept_header: String,
    #[serde(rename = "browserJavaEnabled")]
    pub browser_java_enabled: bool,
    #[serde(rename = "browserJavascriptEnabled")]
    pub browser_javascript_enabled: bool,
    #[serde(rename = "browserLanguage")]
    pub browser_language: String,
    #[serde(rename = "browserColorDepth")]
    pub browser_color_depth: String,
    #[serde(rename = "browserScreenHeight")]
    pub browser_screen_height: String,
    #[serde(rename = "browserScreenWidth")]
    pub browser_screen_width: String,
    #[serde(rename = "browserTZ")]
    pub browser_tz: String,
    #[serde(rename = "browserUserAgent")]
    pub browser_user_agent: String,
    #[serde(rename = "notificationURL")]
    pub notification_url: String,
}

/// The authentication response (ARes) body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateResponseData {
    #[serde(rename = "messageVersion", default)]
    pub message_version: String,
    #[serde(rename = "threeDSServerTransID", default)]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "acsTransID", default)]
    pub acs_trans_id: String,
    #[serde(rename = "acsURL", default)]
    pub acs_url: String,
    #[serde(rename = "dsTransID", default)]
    pub ds_trans_id: String,
    #[serde(rename = "transStatus", default)]
    pub trans_status: String,
    #[serde(rename = "transStatusReason", default)]
    pub trans_status_reason: String,
    #[serde(rename = "authenticationValue", default)]
    pub authentication_value: String,
    #[serde(default)]
    pub eci: String,
    #[serde(rename = "errorCode", default, skip_serializing_if = "String::is_empty")]
    pub error_code: String,
    #[serde(
        rename = "errorDescription",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub error_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRequest {
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: String,
}

/// The final result (RReq) of a challenged authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultResponseData {
    #[serde(rename = "threeDSServerTransID", default)]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "messageVersion", default)]
    pub message_version: String,
    #[serde(rename = "transStatus", default)]
    pub trans_status: String,
    #[serde(rename = "transStatusReason", default)]
    pub trans_status_reason: String,
    #[serde(rename = "authenticationValue", default)]
    pub authentication_value: String,
    #[serde(default)]
    pub eci: String,
    #[serde(rename = "challengeCancel", default)]
    pub challenge_cancel: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCard {
    pub test_pan: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_response_parses_vendor_names() {
        let body = r#"{
            "status": 200,
            "timestamp": 1650000000,
            "data": {
                "transactionId": "merchant-tx",
                "threeDSServerTransID": "T1",
                "threeDSMethodURL": "https://acs.example/method",
                "versionRecommendation": "2.1.0"
            }
        }"#;
        let env: Envelope<VersionResponseData> = serde_json::from_str(body).unwrap();
        assert_eq!(env.code, 200);
        let data = env.data.unwrap();
        assert_eq!(data.three_ds_server_trans_id, "T1");
        assert_eq!(data.method_url(), Some("https://acs.example/method"));
        assert_eq!(data.version_recommendation, "2.1.0");
    }

    #[test]
    fn empty_method_url_counts_as_absent() {
        let data = VersionResponseData {
            three_ds_method_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(data.method_url(), None);
        assert_eq!(VersionResponseData::default().method_url(), None);
    }

    #[test]
    fn envelope_without_data() {
        let env: Envelope<ResultResponseData> =
            serde_json::from_str(r#"{"status": 500, "message": "boom"}"#).unwrap();
        assert!(env.data.is_none());
        assert_eq!(env.message.as_deref(), Some("boom"));
    }

    #[test]
    fn areq_uses_emvco_field_names() {
        let areq = AReqData {
            three_ds_comp_ind: "Y".into(),
            browser_tz: "-60".into(),
            notification_url: "http://localhost/challenge-notification".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&areq).unwrap();
        assert_eq!(json["threeDSCompInd"], "Y");
        assert_eq!(json["browserTZ"], "-60");
        assert_eq!(json["notificationURL"], "http://localhost/challenge-notification");
        assert_eq!(json["browserJavaEnabled"], false);
        assert!(json.get("cardExpiryDate").is_none());
    }
}
