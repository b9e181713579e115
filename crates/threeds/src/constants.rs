/// Default base URL of the remote 3DS server.
pub const DEFAULT_API_URL: &str = "https://pci.ravelin.com";

/// Remote 3DS server endpoints.
pub const VERSION_ENDPOINT: &str = "/3ds/version";
pub const AUTHENTICATE_ENDPOINT: &str = "/3ds/authenticate";
pub const RESULT_ENDPOINT: &str = "/3ds/result";
pub const TEST_CARDS_ENDPOINT: &str = "/3ds/testcards";

/// Merchant-facing endpoints. The two notification paths are handed to the
/// ACS so the cardholder's browser can call back into the merchant.
pub const CHECKOUT_PATH: &str = "/checkout";
pub const AUTHENTICATE_PATH: &str = "/authenticate";
pub const METHOD_NOTIFICATION_PATH: &str = "/method-notification";
pub const CHALLENGE_NOTIFICATION_PATH: &str = "/challenge-notification";
pub const TEST_CARDS_PATH: &str = "/test-cards";

/// Protocol versions this integration knows how to interpret.
pub const SUPPORTED_MESSAGE_VERSIONS: [&str; 2] = ["2.1.0", "2.2.0"];

/// Payment authentication.
pub const MESSAGE_CATEGORY_PAYMENT: &str = "01";
/// Browser-based flow.
pub const DEVICE_CHANNEL_BROWSER: &str = "02";
/// Payment transaction.
pub const REQUESTOR_AUTHENTICATION_IND_PAYMENT: &str = "01";

/// Format of `purchaseDate` in the authentication request (UTC).
pub const PURCHASE_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_MESSAGE_VERSIONS.contains(&version)
}

/// Fixed merchant, requestor and acquirer identification sent with every
/// authentication request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantProfile {
    pub requestor_id: String,
    pub requestor_name: String,
    pub requestor_url: String,
    pub acquirer_bin: String,
    pub acquirer_merchant_id: String,
    pub merchant_country_code: String,
    pub merchant_name: String,
    pub mcc: String,
    pub purchase_amount: String,
    pub purchase_currency: String,
    pub purchase_exponent: String,
}

impl Default for MerchantProfile {
    /// Example values for the demo merchant. A live integration populates these
    /// from its own acquirer agreement and basket.
    fn default() -> Self {
        Self {
            requestor_id: "example-3ds-merchant".to_string(),
            requestor_name: "Example 3DS Merchant".to_string(),
            requestor_url: "https://www.ravelin.com/example-merchant".to_string(),
            acquirer_bin: "000000999".to_string(),
            acquirer_merchant_id: "9876543210001".to_string(),
            merchant_country_code: "826".to_string(),
            merchant_name: "Example 3DS Merchant".to_string(),
            mcc: "7922".to_string(),
            purchase_amount: "80000".to_string(),
            purchase_currency: "826".to_string(),
            purchase_exponent: "2".to_string(),
        }
    }
}
