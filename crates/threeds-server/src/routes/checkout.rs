use actix_web::{post, web, HttpResponse};

use threeds::constants::CHECKOUT_PATH;

use crate::error::ApiError;
use crate::merchant::{CheckoutRequest, CheckoutResponse};
use crate::routes::{observe, parse_json};
use crate::state::AppState;

/// POST /checkout - version lookup for the card the customer entered
#[post("/checkout")]
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Handling {} request", CHECKOUT_PATH);

    let request: CheckoutRequest = observe("checkout", parse_json(&body))?;
    let lookup = observe(
        "checkout",
        state.flow.version_lookup(&request.account_number).await,
    )?;

    Ok(HttpResponse::Ok().json(CheckoutResponse::from(lookup)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(checkout);
}
