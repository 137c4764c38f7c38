pub mod catalog;
pub mod map;
