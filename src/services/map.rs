use crate::domain::kind::RecordKind;
use crate::domain::types::{Latitude, Longitude};
use crate::dto::map::MapPointDto;
use crate::repository::{RecordFilter, RecordReader};

use super::{ServiceError, ServiceResult};

/// Points of interest with usable coordinates.
///
/// Records whose `latitude`/`longitude` extras are missing or out of range
/// are skipped with a warning rather than failing the whole map.
pub fn show_map_points<R>(repo: &R) -> ServiceResult<Vec<MapPointDto>>
where
    R: RecordReader,
{
    let filter = RecordFilter::default().kinds([RecordKind::PointOfInterest]);
    let records = match repo.fetch_records(&filter) {
        Ok(records) => records,
        Err(e) => {
            log::error!("Failed to list points of interest: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let mut points = Vec::with_capacity(records.len());
    for record in records {
        let latitude = record
            .extra_str("latitude")
            .and_then(|v| Latitude::try_from(v.as_str()).ok());
        let longitude = record
            .extra_str("longitude")
            .and_then(|v| Longitude::try_from(v.as_str()).ok());

        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                points.push(MapPointDto::new(record, latitude, longitude))
            }
            _ => log::warn!("Skipping point of interest {} without valid coordinates", record.id),
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::{sample_record, test_store};
    use serde_json::json;

    #[test]
    fn skips_points_without_coordinates() {
        let mut good = sample_record(1, RecordKind::PointOfInterest, "Quebradeiras", None);
        good.extra.insert("latitude".into(), json!(-4.86));
        good.extra.insert("longitude".into(), json!("-43.35"));
        let mut bad = sample_record(2, RecordKind::PointOfInterest, "Sem mapa", None);
        bad.extra.insert("latitude".into(), json!("norte"));
        bad.extra.insert("longitude".into(), json!(-43.0));
        let missing = sample_record(3, RecordKind::PointOfInterest, "Vazio", None);
        let mut site = sample_record(4, RecordKind::Site, "Site", None);
        site.extra.insert("latitude".into(), json!(1.0));
        site.extra.insert("longitude".into(), json!(1.0));
        let store = test_store(vec![good, bad, missing, site]);

        let points = show_map_points(&store).unwrap();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, 1);
        assert_eq!(points[0].latitude, -4.86);
        assert_eq!(points[0].longitude, -43.35);
    }
}
