//! JSON shapes exchanged with the merchant's own front-end.

use serde::{Deserialize, Serialize};

use threeds::{
    AuthenticationOutcome, AuthenticationRequest, BrowserEnvironment, ThreeDsError, VersionLookup,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub account_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message_version: String,
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub transaction_id: String,
    #[serde(rename = "threeDSMethodURL", skip_serializing_if = "Option::is_none")]
    pub three_ds_method_url: Option<String>,
    #[serde(rename = "methodNotificationURL")]
    pub method_notification_url: String,
}

impl From<VersionLookup> for CheckoutResponse {
    fn from(lookup: VersionLookup) -> Self {
        Self {
            message_version: lookup.protocol_version,
            three_ds_server_trans_id: lookup.transaction_id,
            transaction_id: lookup.merchant_transaction_id,
            three_ds_method_url: lookup.fingerprint_url,
            method_notification_url: lookup.method_notification_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthenticateRequest {
    pub message_version: String,
    #[serde(rename = "threeDSServerTransID")]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "productSKU")]
    pub product_sku: String,
    pub product_quantity: i64,
    pub account_number: String,
    pub card_expiry_date: String,
    pub browser_data: Option<BrowserData>,
}

/// Browser attributes as collected by the front-end script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserData {
    pub browser_accept_header: String,
    pub browser_java_enabled: bool,
    pub browser_javascript_enabled: bool,
    pub browser_language: String,
    pub browser_color_depth: i32,
    pub browser_screen_height: u32,
    pub browser_screen_width: u32,
    #[serde(rename = "browserTZ")]
    pub browser_tz: i32,
    pub browser_user_agent: String,
}

impl AuthenticateRequest {
    /// A purchase needs a product and a non-zero quantity.
    pub fn validate(&self) -> Result<(), ThreeDsError> {
        if self.product_quantity <= 0 {
            return Err(ThreeDsError::InvalidRequest(
                "product quantity must be positive".to_string(),
            ));
        }
        if self.product_sku.trim().is_empty() {
            return Err(ThreeDsError::InvalidRequest(
                "no product selected".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to the orchestrator's input. The `Accept` header of the
    /// browser's own request replaces whatever the script reported.
    pub fn into_flow_request(self, accept_header: Option<&str>) -> AuthenticationRequest {
        let browser = self.browser_data.map(|b| BrowserEnvironment {
            accept_header: accept_header
                .map(str::to_string)
                .unwrap_or(b.browser_accept_header),
            user_agent: b.browser_user_agent,
            color_depth: b.browser_color_depth,
            screen_height: b.browser_screen_height,
            screen_width: b.browser_screen_width,
            timezone_offset: b.browser_tz,
            language: b.browser_language,
            java_enabled: b.browser_java_enabled,
            javascript_enabled: b.browser_javascript_enabled,
        });

        AuthenticationRequest {
            transaction_id: self.three_ds_server_trans_id,
            protocol_version: self.message_version,
            account_number: self.account_number,
            card_expiry_date: self.card_expiry_date,
            browser,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub status: String,
    #[serde(rename = "threeDSServerTransID", skip_serializing_if = "String::is_empty")]
    pub three_ds_server_trans_id: String,
    #[serde(rename = "acsTransID", skip_serializing_if = "String::is_empty")]
    pub acs_trans_id: String,
    #[serde(rename = "acsURL", skip_serializing_if = "String::is_empty")]
    pub acs_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl From<AuthenticationOutcome> for AuthenticateResponse {
    fn from(outcome: AuthenticationOutcome) -> Self {
        let status = outcome.as_str().to_string();
        match outcome {
            AuthenticationOutcome::ChallengeRequired(details) => Self {
                status,
                three_ds_server_trans_id: details.transaction_id,
                acs_trans_id: details.acs_transaction_id,
                acs_url: details.acs_url,
                message_version: details.protocol_version,
                error: String::new(),
            },
            _ => Self {
                status,
                ..Default::default()
            },
        }
    }
}
