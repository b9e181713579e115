//! Callbacks the ACS drives through the cardholder's browser.

use actix_web::http::header::ContentType;
use actix_web::{post, web, HttpResponse};

use threeds::constants::{CHALLENGE_NOTIFICATION_PATH, METHOD_NOTIFICATION_PATH};
use threeds::notification::{
    decode_notification, ChallengeResponse, MethodNotification, CHALLENGE_RESPONSE_PARAM,
    METHOD_DATA_PARAM,
};
use threeds::ThreeDsError;

use crate::error::ApiError;
use crate::render::{render_challenge_result, render_method_notification};
use crate::routes::observe;
use crate::state::AppState;

/// Extract exactly one value of `param` from a urlencoded form body.
pub fn single_form_value(body: &[u8], param: &str) -> Result<String, ThreeDsError> {
    let mut values = url::form_urlencoded::parse(body)
        .filter(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned());

    let value = values
        .next()
        .ok_or_else(|| ThreeDsError::InvalidRequest(format!("missing form field {param}")))?;
    if values.next().is_some() {
        return Err(ThreeDsError::InvalidRequest(format!(
            "form field {param} given more than once"
        )));
    }
    if value.is_empty() {
        return Err(ThreeDsError::InvalidRequest(format!("empty form field {param}")));
    }
    Ok(value)
}

fn parse_method_notification(body: &[u8]) -> Result<MethodNotification, ThreeDsError> {
    let notification: MethodNotification =
        decode_notification(&single_form_value(body, METHOD_DATA_PARAM)?)?;
    if notification.three_ds_server_trans_id.is_empty() {
        return Err(ThreeDsError::InvalidRequest(
            "method notification has no threeDSServerTransID".to_string(),
        ));
    }
    Ok(notification)
}

/// POST /method-notification - the ACS finished the 3DS Method
#[post("/method-notification")]
pub async fn method_notification(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Handling {} request", METHOD_NOTIFICATION_PATH);

    let notification = observe("method_notification", parse_method_notification(&body))?;

    observe(
        "method_notification",
        state
            .flow
            .complete_fingerprinting(&notification.three_ds_server_trans_id),
    )?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_method_notification(
            &notification.three_ds_server_trans_id,
        )))
}

/// POST /challenge-notification - the cardholder came back from the ACS challenge
#[post("/challenge-notification")]
pub async fn challenge_notification(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Handling {} request", CHALLENGE_NOTIFICATION_PATH);

    let cres: ChallengeResponse = observe(
        "challenge_notification",
        single_form_value(&body, CHALLENGE_RESPONSE_PARAM).and_then(|v| decode_notification(&v)),
    )?;

    let result = observe(
        "challenge_notification",
        state.flow.resolve_challenge(&cres).await,
    )?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_challenge_result(result)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(method_notification)
        .service(challenge_notification);
}
