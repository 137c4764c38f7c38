use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod api;
pub mod records;

/// Map a service failure onto the matching HTTP response.
///
/// Form and type errors carry their message back to the client as
/// `{ "error": ... }`.
pub fn service_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        err => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
