pub mod catalog;
pub mod records;
