//! Response headers added to every reply.

use actix_web::http::header::{STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS};
use actix_web::middleware::DefaultHeaders;

pub const HSTS_VALUE: &str = "max-age=63072000; includeSubDomains";
pub const NOSNIFF_VALUE: &str = "nosniff";

/// HSTS and `nosniff` on every response. Headers a handler sets itself win.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((STRICT_TRANSPORT_SECURITY, HSTS_VALUE))
        .add((X_CONTENT_TYPE_OPTIONS, NOSNIFF_VALUE))
}
