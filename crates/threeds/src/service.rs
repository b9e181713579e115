//! The remote 3DS server seen from the flow orchestrator.
//!
//! See [`crate::ravelin_client::RavelinClient`] for the HTTP implementation.

use std::future::Future;

use crate::error::ThreeDsError;
use crate::wire::{
    AuthenticateRequest, AuthenticateResponseData, ResultRequest, ResultResponseData, TestCard,
    VersionRequest, VersionResponseData,
};

/// Remote authentication service: version lookup, authentication, result
/// retrieval and the test card catalogue.
///
/// Every call may fail with [`ThreeDsError::Unauthorized`] or
/// [`ThreeDsError::Upstream`]; `version` may also fail with
/// [`ThreeDsError::CardRangeNotFound`].
pub trait AuthenticationService: Send + Sync {
    /// Look up the protocol version and 3DS Method URL for a card.
    fn version(
        &self,
        request: &VersionRequest,
    ) -> impl Future<Output = Result<VersionResponseData, ThreeDsError>> + Send;

    /// Send the authentication request (AReq) and return the ARes.
    fn authenticate(
        &self,
        request: &AuthenticateRequest,
    ) -> impl Future<Output = Result<AuthenticateResponseData, ThreeDsError>> + Send;

    /// Fetch the final result of a challenged transaction.
    fn result(
        &self,
        request: &ResultRequest,
    ) -> impl Future<Output = Result<ResultResponseData, ThreeDsError>> + Send;

    /// List the sandbox test cards.
    fn test_cards(&self) -> impl Future<Output = Result<Vec<TestCard>, ThreeDsError>> + Send;
}
