//! Core library exports for the Acervo catalog service.
//!
//! The `data` feature exposes the domain model, persistence layer and the
//! catalog query engine; `server` adds the forms, DTOs, services and HTTP
//! routes used by the web application.

#[cfg(feature = "data")]
pub mod catalog;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role required to submit, edit or delete catalog records.
pub const SERVICE_ACCESS_ROLE: &str = "acervo";
