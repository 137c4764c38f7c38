use serde::Serialize;

use crate::domain::record::Record;
use crate::domain::types::{Latitude, Longitude};

/// Point of interest placed on the map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapPointDto {
    pub id: i32,
    pub title: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub link: Option<String>,
}

impl MapPointDto {
    pub fn new(record: Record, latitude: Latitude, longitude: Longitude) -> Self {
        Self {
            id: record.id.get(),
            title: record.title.map(String::from),
            latitude: latitude.get(),
            longitude: longitude.get(),
            link: record.link.map(String::from),
        }
    }
}
