//! Inputs and outcomes of the four flow steps.

use std::fmt;

/// Result of the version lookup step, relayed to the browser so it can run
/// the 3DS Method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLookup {
    /// `threeDSServerTransID`: the key of the stored transaction record.
    pub transaction_id: String,
    /// The 3DS server's own `transactionId` for the lookup.
    pub merchant_transaction_id: String,
    pub protocol_version: String,
    /// 3DS Method URL the browser loads in a hidden iframe, if the card range has one.
    pub fingerprint_url: Option<String>,
    /// Where the ACS posts `threeDSMethodData` when fingerprinting finishes.
    pub method_notification_url: String,
}

/// Browser attributes collected by the merchant's front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserEnvironment {
    pub accept_header: String,
    pub user_agent: String,
    pub color_depth: i32,
    pub screen_height: u32,
    pub screen_width: u32,
    /// Minutes between UTC and local time, as reported by `getTimezoneOffset()`.
    pub timezone_offset: i32,
    pub language: String,
    pub java_enabled: bool,
    pub javascript_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationRequest {
    pub transaction_id: String,
    /// Used only when the store has no record for `transaction_id`.
    pub protocol_version: String,
    pub account_number: String,
    pub card_expiry_date: String,
    pub browser: Option<BrowserEnvironment>,
}

/// What the merchant's browser needs to redirect the cardholder into a challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeDetails {
    pub acs_transaction_id: String,
    pub acs_url: String,
    pub protocol_version: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    /// Authenticated or attempted; proceed to authorisation.
    Success,
    ChallengeRequired(ChallengeDetails),
    /// Not authenticated, unavailable or rejected.
    Failed,
}

impl AuthenticationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationOutcome::Success => "SUCCESS",
            AuthenticationOutcome::ChallengeRequired(_) => "CHALLENGE_REQUIRED",
            AuthenticationOutcome::Failed => "FAILED",
        }
    }
}

/// Final verdict after a challenge, shown to the cardholder's browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeResult {
    Success,
    Failed,
}

impl ChallengeResult {
    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeResult::Success => "SUCCESS",
            ChallengeResult::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ChallengeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
