pub mod authenticate;
pub mod checkout;
pub mod health;
pub mod notification;
pub mod test_cards;

use threeds::ThreeDsError;

use crate::metrics;

/// Count the outcome of a flow step and pass the result through.
pub(crate) fn observe<T>(step: &str, result: Result<T, ThreeDsError>) -> Result<T, ThreeDsError> {
    match &result {
        Ok(_) => metrics::record_step(step, "ok"),
        Err(e) => {
            tracing::warn!(step, error = %e, "3DS step failed");
            metrics::record_step(step, metrics::error_label(e));
        }
    }
    result
}

/// Decode a JSON request body, reporting malformed input as a bad request.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ThreeDsError> {
    serde_json::from_slice(body)
        .map_err(|e| ThreeDsError::InvalidRequest(format!("malformed request body: {e}")))
}
