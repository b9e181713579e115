use actix_web::http::header::ACCEPT;
use actix_web::{post, web, HttpRequest, HttpResponse};

use threeds::constants::AUTHENTICATE_PATH;

use crate::error::ApiError;
use crate::merchant::{AuthenticateRequest, AuthenticateResponse};
use crate::routes::{observe, parse_json};
use crate::state::AppState;

/// POST /authenticate - send the AReq once the 3DS Method has finished or timed out
#[post("/authenticate")]
pub async fn authenticate(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Handling {} request", AUTHENTICATE_PATH);

    let request: AuthenticateRequest = observe("authenticate", parse_json(&body))?;
    observe("authenticate", request.validate())?;

    let accept = req.headers().get(ACCEPT).and_then(|v| v.to_str().ok());
    let flow_request = request.into_flow_request(accept);

    let outcome = observe("authenticate", state.flow.authenticate(&flow_request).await)?;
    tracing::info!(
        transaction_id = %flow_request.transaction_id,
        outcome = outcome.as_str(),
        "authentication finished"
    );

    Ok(HttpResponse::Ok().json(AuthenticateResponse::from(outcome)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(authenticate);
}
