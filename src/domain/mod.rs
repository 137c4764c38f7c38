//! Domain entities and value objects shared by the persistence and service
//! layers.

pub mod keyword;
pub mod kind;
pub mod record;
pub mod submission;
pub mod theme;
pub mod types;
