use crate::catalog::{CatalogQuery, query_catalog, theme_options};
use crate::dto::catalog::CatalogPageDto;
use crate::repository::RecordReader;

use super::{ServiceError, ServiceResult};

/// Core business logic for the library listing.
///
/// Reads are public, so no role is required. Store failures are logged and
/// reported as `ServiceError::Internal`; an empty catalog is a normal result.
pub fn show_catalog<R>(query: CatalogQuery, repo: &R) -> ServiceResult<CatalogPageDto>
where
    R: RecordReader,
{
    match query_catalog(&query, repo) {
        Ok(listing) => Ok(CatalogPageDto::from(listing)),
        Err(e) => {
            log::error!("Failed to query catalog: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Theme labels in use across every kind, for the filter panel.
pub fn show_theme_options<R>(repo: &R) -> ServiceResult<Vec<String>>
where
    R: RecordReader,
{
    match theme_options(repo) {
        Ok(themes) => Ok(themes.into_iter().map(String::from).collect()),
        Err(e) => {
            log::error!("Failed to list theme options: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keyword::KeywordMode;
    use crate::domain::kind::RecordKind;
    use crate::domain::theme::Theme;
    use crate::repository::RecordStore;
    use crate::repository::test::{TestCollection, sample_record, test_store};

    #[test]
    fn lists_the_filtered_catalog() {
        let mut health = sample_record(1, RecordKind::Publication, "Guia", Some(10));
        health.themes = vec![Theme::Health, Theme::Education];
        let mut education = sample_record(2, RecordKind::Image, "Aula", Some(20));
        education.themes = vec![Theme::Education];
        let store = test_store(vec![health, education]);

        let query = CatalogQuery::new([], [Theme::Health], "", KeywordMode::Literal).unwrap();
        let page = show_catalog(query, &store).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].themes, "Saúde, Educação");
        assert_eq!(page.records[0].kind_label, "Publicação");
    }

    #[test]
    fn store_failures_are_internal_errors() {
        let store = RecordStore::new([TestCollection::unavailable(RecordKind::Video)]);

        let result = show_catalog(CatalogQuery::default(), &store);
        assert!(matches!(result, Err(ServiceError::Internal)));

        let result = show_theme_options(&store);
        assert!(matches!(result, Err(ServiceError::Internal)));
    }

    #[test]
    fn theme_options_are_labels() {
        let mut record = sample_record(1, RecordKind::Site, "Site", None);
        record.themes = vec![Theme::Other, Theme::Culture];
        let store = test_store(vec![record]);

        assert_eq!(
            show_theme_options(&store).unwrap(),
            vec!["Cultura e Tradição".to_string(), "Outro".to_string()]
        );
    }
}
