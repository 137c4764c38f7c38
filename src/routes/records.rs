use actix_web::{HttpResponse, Responder, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::domain::submission::NoPreview;
use crate::forms::records::{DeleteRecordForm, RecordPayload, SubmitRecordForm, UpdateRecordForm};
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::ServiceError;
use crate::services::records::{
    delete_record as delete_record_service, submit_record as submit_record_service,
    update_record as update_record_service,
};

#[post("/v1/records")]
pub async fn submit_record(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SubmitRecordForm>,
) -> impl Responder {
    let payload: RecordPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return service_error_response(ServiceError::from(e)),
    };

    match submit_record_service(payload, &user, &repo.record_store(), &NoPreview) {
        Ok(id) => HttpResponse::Created().json(json!({ "id": id.get() })),
        Err(err) => service_error_response(err),
    }
}

#[post("/v1/records/{kind}/{id}")]
pub async fn update_record(
    path: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateRecordForm>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    let payload = match form.into_payload(&kind, id) {
        Ok(payload) => payload,
        Err(e) => return service_error_response(ServiceError::from(e)),
    };

    match update_record_service(payload, &user, &repo.record_store(), &NoPreview) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}

#[post("/v1/records/{kind}/{id}/delete")]
pub async fn delete_record(
    path: web::Path<(String, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DeleteRecordForm>,
) -> impl Responder {
    let (kind, id) = path.into_inner();
    let payload = match form.into_payload(&kind, id) {
        Ok(payload) => payload,
        Err(e) => return service_error_response(ServiceError::from(e)),
    };

    match delete_record_service(payload, &user, &repo.record_store()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => service_error_response(err),
    }
}
