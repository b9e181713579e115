//! The 3DS browser-flow state machine.
//!
//! Each step is an independent entry point; the steps for one transaction
//! are tied together only through the [`TransactionStore`], keyed by the
//! `threeDSServerTransID` the 3DS server assigns at version lookup:
//!
//! 1. [`FlowOrchestrator::version_lookup`] creates the record.
//! 2. [`FlowOrchestrator::complete_fingerprinting`] marks the 3DS Method done.
//! 3. [`FlowOrchestrator::authenticate`] reads a snapshot of the record.
//! 4. [`FlowOrchestrator::resolve_challenge`] fetches the post-challenge result.

use std::sync::Arc;

use crate::color_depth::normalize_color_depth;
use crate::constants::{
    is_supported_version, MerchantProfile, CHALLENGE_NOTIFICATION_PATH, DEVICE_CHANNEL_BROWSER,
    MESSAGE_CATEGORY_PAYMENT, METHOD_NOTIFICATION_PATH, PURCHASE_DATE_FORMAT,
    REQUESTOR_AUTHENTICATION_IND_PAYMENT,
};
use crate::error::ThreeDsError;
use crate::flow::{
    AuthenticationOutcome, AuthenticationRequest, ChallengeDetails, ChallengeResult,
    VersionLookup,
};
use crate::notification::ChallengeResponse;
use crate::security::last_four;
use crate::service::AuthenticationService;
use crate::status::{FingerprintStatus, TransStatus};
use crate::transaction_store::{TransactionRecord, TransactionStore};
use crate::wire::{
    AReqData, AuthenticateRequest, AuthenticateResponseData, ResultRequest, ResultResponseData,
    TestCard, VersionRequest,
};

/// Drives the 3DS flow against an [`AuthenticationService`].
pub struct FlowOrchestrator<S> {
    service: S,
    store: Arc<dyn TransactionStore>,
    merchant_url: String,
    profile: MerchantProfile,
}

impl<S> FlowOrchestrator<S> {
    /// `merchant_url` is the public base URL the ACS and browser call back into.
    pub fn new(
        service: S,
        store: Arc<dyn TransactionStore>,
        merchant_url: impl Into<String>,
    ) -> Self {
        Self {
            service,
            store,
            merchant_url: merchant_url.into().trim_end_matches('/').to_string(),
            profile: MerchantProfile::default(),
        }
    }

    /// Replace the example merchant/acquirer identification.
    pub fn with_profile(mut self, profile: MerchantProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn method_notification_url(&self) -> String {
        format!("{}{}", self.merchant_url, METHOD_NOTIFICATION_PATH)
    }

    pub fn challenge_notification_url(&self) -> String {
        format!("{}{}", self.merchant_url, CHALLENGE_NOTIFICATION_PATH)
    }

    /// Device fingerprinting completion: the ACS finished the 3DS Method for
    /// `transaction_id`.
    ///
    /// Fails with [`ThreeDsError::NotFound`] when the transaction was never
    /// started (or has been evicted).
    pub fn complete_fingerprinting(&self, transaction_id: &str) -> Result<(), ThreeDsError> {
        self.store
            .set_fingerprint_status(transaction_id, FingerprintStatus::Completed)?;
        tracing::info!(transaction_id = %transaction_id, "3DS Method completed");
        Ok(())
    }

    fn build_authenticate_request(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticateRequest, ThreeDsError> {
        let browser = request
            .browser
            .as_ref()
            .ok_or_else(|| ThreeDsError::InvalidRequest("missing browser data".to_string()))?;
        let color_depth = normalize_color_depth(browser.color_depth)?;

        // Snapshot: a 3DS Method completing after this read is not picked up.
        let (message_version, comp_ind) = match self.store.get(&request.transaction_id) {
            Some(tx) => (
                tx.protocol_version,
                tx.fingerprint_status.completion_indicator(),
            ),
            None => {
                tracing::warn!(
                    transaction_id = %request.transaction_id,
                    "no stored 3DS transaction, authenticating without version lookup"
                );
                (
                    request.protocol_version.clone(),
                    FingerprintStatus::NotCompleted.completion_indicator(),
                )
            }
        };

        let now = chrono::Utc::now();
        let profile = &self.profile;
        let areq_data = AReqData {
            message_category: MESSAGE_CATEGORY_PAYMENT.to_string(),
            message_version,
            device_channel: DEVICE_CHANNEL_BROWSER.to_string(),
            three_ds_requestor_id: profile.requestor_id.clone(),
            three_ds_requestor_name: profile.requestor_name.clone(),
            three_ds_requestor_url: profile.requestor_url.clone(),
            three_ds_server_trans_id: request.transaction_id.clone(),
            three_ds_requestor_authentication_ind: REQUESTOR_AUTHENTICATION_IND_PAYMENT
                .to_string(),
            three_ds_comp_ind: comp_ind.to_string(),
            acquirer_merchant_id: profile.acquirer_merchant_id.clone(),
            acquirer_bin: profile.acquirer_bin.clone(),
            pan: request.account_number.clone(),
            card_expiry_date: request.card_expiry_date.clone(),
            merchant_country_code: profile.merchant_country_code.clone(),
            merchant_name: profile.merchant_name.clone(),
            mcc: profile.mcc.clone(),
            purchase_amount: profile.purchase_amount.clone(),
            purchase_currency: profile.purchase_currency.clone(),
            purchase_exponent: profile.purchase_exponent.clone(),
            purchase_date: now.format(PURCHASE_DATE_FORMAT).to_string(),
            browser_accept_header: browser.accept_header.clone(),
            browser_java_enabled: browser.java_enabled,
            browser_javascript_enabled: browser.javascript_enabled,
            browser_language: browser.language.clone(),
            browser_color_depth: color_depth.to_string(),
            browser_screen_height: browser.screen_height.to_string(),
            browser_screen_width: browser.screen_width.to_string(),
            browser_tz: browser.timezone_offset.to_string(),
            browser_user_agent: browser.user_agent.clone(),
            notification_url: self.challenge_notification_url(),
        };

        Ok(AuthenticateRequest {
            timestamp: now.timestamp(),
            customer_id: uuid::Uuid::new_v4().to_string(),
            transaction_id: uuid::Uuid::new_v4().to_string(),
            areq_data,
        })
    }
}

impl<S: AuthenticationService> FlowOrchestrator<S> {
    /// Version lookup: ask the 3DS server which protocol version and 3DS Method
    /// URL apply to the card, and open a transaction record.
    ///
    /// Nothing is stored unless the 3DS server answers successfully.
    pub async fn version_lookup(&self, account_number: &str) -> Result<VersionLookup, ThreeDsError> {
        if account_number.is_empty() {
            return Err(ThreeDsError::InvalidRequest(
                "account number is required".to_string(),
            ));
        }

        let request = VersionRequest {
            transaction_id: uuid::Uuid::new_v4().to_string(),
            pan: account_number.to_string(),
        };

        tracing::info!(
            card_last_four = last_four(account_number),
            "sending 3DS version request"
        );
        let data = self.service.version(&request).await?;

        if data.three_ds_server_trans_id.is_empty() {
            return Err(ThreeDsError::Upstream(
                "version response has no threeDSServerTransID".to_string(),
            ));
        }

        let fingerprint_url = data.method_url().map(str::to_string);
        let fingerprint_status = if fingerprint_url.is_some() {
            FingerprintStatus::NotCompleted
        } else {
            FingerprintStatus::Unavailable
        };

        self.store.add(
            &data.three_ds_server_trans_id,
            TransactionRecord::new(data.version_recommendation.clone(), fingerprint_status),
        );

        tracing::info!(
            transaction_id = %data.three_ds_server_trans_id,
            version = %data.version_recommendation,
            fingerprint = %fingerprint_status,
            "3DS version response received"
        );

        Ok(VersionLookup {
            transaction_id: data.three_ds_server_trans_id,
            merchant_transaction_id: data.transaction_id,
            protocol_version: data.version_recommendation,
            fingerprint_url,
            method_notification_url: self.method_notification_url(),
        })
    }

    /// Authentication: send the AReq and classify the ARes.
    pub async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AuthenticationOutcome, ThreeDsError> {
        let areq = self.build_authenticate_request(request)?;

        tracing::info!(
            transaction_id = %request.transaction_id,
            card_last_four = last_four(&request.account_number),
            version = %areq.areq_data.message_version,
            comp_ind = %areq.areq_data.three_ds_comp_ind,
            "sending 3DS authenticate request"
        );
        let ares = self.service.authenticate(&areq).await?;

        tracing::info!(
            transaction_id = %request.transaction_id,
            version = %ares.message_version,
            status = %ares.trans_status,
            "3DS authenticate response received"
        );

        classify_authentication(&ares)
    }

    /// Challenge result resolution: the browser returned from the ACS; fetch
    /// the authoritative result from the 3DS server.
    ///
    /// The status the browser relays in the CRes is logged but not trusted.
    pub async fn resolve_challenge(
        &self,
        cres: &ChallengeResponse,
    ) -> Result<ChallengeResult, ThreeDsError> {
        if cres.three_ds_server_trans_id.is_empty() {
            return Err(ThreeDsError::InvalidRequest(
                "challenge response has no threeDSServerTransID".to_string(),
            ));
        }

        tracing::info!(
            transaction_id = %cres.three_ds_server_trans_id,
            reported_status = %cres.trans_status,
            "sending 3DS result request"
        );
        let result = self
            .service
            .result(&ResultRequest {
                three_ds_server_trans_id: cres.three_ds_server_trans_id.clone(),
            })
            .await?;

        let outcome = classify_result(&result);
        tracing::info!(
            transaction_id = %cres.three_ds_server_trans_id,
            status = %result.trans_status,
            outcome = %outcome,
            "3DS result response received"
        );
        Ok(outcome)
    }

    /// Sandbox cards the 3DS server can authenticate.
    pub async fn test_cards(&self) -> Result<Vec<TestCard>, ThreeDsError> {
        self.service.test_cards().await
    }
}

/// Interpret an ARes `(messageVersion, transStatus)` pair.
///
/// Pairs outside the protocol table are an error rather than an empty outcome.
pub fn classify_authentication(
    ares: &AuthenticateResponseData,
) -> Result<AuthenticationOutcome, ThreeDsError> {
    let unrecognized = || ThreeDsError::UnrecognizedOutcome {
        version: ares.message_version.clone(),
        status: ares.trans_status.clone(),
    };

    if !is_supported_version(&ares.message_version) {
        return Err(unrecognized());
    }
    let status = TransStatus::from_code(&ares.trans_status).ok_or_else(unrecognized)?;

    Ok(match status {
        TransStatus::Authenticated | TransStatus::Attempted => AuthenticationOutcome::Success,
        TransStatus::ChallengeRequired => {
            AuthenticationOutcome::ChallengeRequired(ChallengeDetails {
                acs_transaction_id: ares.acs_trans_id.clone(),
                acs_url: ares.acs_url.clone(),
                protocol_version: ares.message_version.clone(),
                transaction_id: ares.three_ds_server_trans_id.clone(),
            })
        }
        TransStatus::NotAuthenticated | TransStatus::Unavailable | TransStatus::Rejected => {
            AuthenticationOutcome::Failed
        }
    })
}

/// A challenge succeeded only if the result is `Y`/`A` *and* carries an
/// authentication value (CAVV) for authorisation.
pub fn classify_result(result: &ResultResponseData) -> ChallengeResult {
    let authenticated = TransStatus::from_code(&result.trans_status)
        .map(TransStatus::is_authenticated)
        .unwrap_or(false);

    if authenticated && !result.authentication_value.is_empty() {
        ChallengeResult::Success
    } else {
        ChallengeResult::Failed
    }
}
