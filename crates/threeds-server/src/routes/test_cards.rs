use actix_web::{get, web, HttpResponse};

use crate::error::ApiError;
use crate::routes::observe;
use crate::state::AppState;

/// GET /test-cards - relay the sandbox test card catalogue
#[get("/test-cards")]
pub async fn test_cards(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cards = observe("test_cards", state.flow.test_cards().await)?;
    Ok(HttpResponse::Ok().json(cards))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(test_cards);
}
