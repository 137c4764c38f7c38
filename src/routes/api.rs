use actix_web::{HttpResponse, Responder, get, web};

use crate::catalog::CatalogQuery;
use crate::forms::catalog::CatalogFilterForm;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::ServiceError;
use crate::services::catalog::{
    show_catalog as show_catalog_service, show_theme_options as show_theme_options_service,
};
use crate::services::map::show_map_points as show_map_points_service;

#[get("/v1/catalog")]
pub async fn api_v1_catalog(
    web::Query(form): web::Query<CatalogFilterForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query: CatalogQuery = match form.try_into() {
        Ok(query) => query,
        Err(e) => return service_error_response(ServiceError::from(e)),
    };

    match show_catalog_service(query, &repo.record_store()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => service_error_response(err),
    }
}

#[get("/v1/themes")]
pub async fn api_v1_themes(repo: web::Data<DieselRepository>) -> impl Responder {
    match show_theme_options_service(&repo.record_store()) {
        Ok(themes) => HttpResponse::Ok().json(themes),
        Err(err) => service_error_response(err),
    }
}

#[get("/v1/map/points")]
pub async fn api_v1_map_points(repo: web::Data<DieselRepository>) -> impl Responder {
    match show_map_points_service(&repo.record_store()) {
        Ok(points) => HttpResponse::Ok().json(points),
        Err(err) => service_error_response(err),
    }
}
