pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod catalog;
pub mod map;
pub mod records;
