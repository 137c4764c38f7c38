//! Catalog query engine.
//!
//! Turns user criteria into a [`RecordFilter`], runs it through a
//! [`RecordReader`] and produces the merged, newest-first listing shown by the
//! library page. Store errors are returned unchanged.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use pushkind_common::repository::errors::RepositoryResult;
use serde::Serialize;

use crate::domain::keyword::{KeywordError, KeywordMatcher, KeywordMode};
use crate::domain::kind::RecordKind;
use crate::domain::record::{Record, RecordExtras};
use crate::domain::theme::Theme;
use crate::domain::types::RecordId;
use crate::repository::{RecordFilter, RecordReader};

/// Separator used when flattening list fields for display.
pub const LIST_SEPARATOR: &str = ", ";

/// User-supplied catalog criteria. Empty sets and a missing keyword place no
/// restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub kinds: BTreeSet<RecordKind>,
    pub themes: BTreeSet<Theme>,
    pub keyword: Option<KeywordMatcher>,
}

impl CatalogQuery {
    /// Build a query, compiling the keyword. A blank keyword means no text
    /// restriction.
    pub fn new(
        kinds: impl IntoIterator<Item = RecordKind>,
        themes: impl IntoIterator<Item = Theme>,
        keyword: &str,
        mode: KeywordMode,
    ) -> Result<Self, KeywordError> {
        Ok(Self {
            kinds: kinds.into_iter().collect(),
            themes: themes.into_iter().collect(),
            keyword: KeywordMatcher::new(keyword, mode)?,
        })
    }

    pub fn to_filter(&self) -> RecordFilter {
        let filter = RecordFilter::default()
            .kinds(self.kinds.iter().copied())
            .themes(self.themes.iter().copied());
        match &self.keyword {
            Some(keyword) => filter.keyword(keyword.clone()),
            None => filter,
        }
    }
}

/// Display copy of a record with list fields flattened to text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    pub id: RecordId,
    pub kind: RecordKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub themes: String,
    pub author: Option<String>,
    pub organizations: String,
    pub link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: Option<NaiveDateTime>,
    pub extra: RecordExtras,
}

impl From<Record> for CatalogEntry {
    fn from(record: Record) -> Self {
        let themes = record
            .themes
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);
        let organizations = record
            .organizations
            .iter()
            .map(|o| o.as_str())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);

        Self {
            id: record.id,
            kind: record.kind,
            title: record.title.map(String::from),
            description: record.description,
            themes,
            author: record.author.map(String::from),
            organizations,
            link: record.link.map(String::from),
            thumbnail_link: record.thumbnail_link.map(String::from),
            uploaded_by: record.uploaded_by.map(String::from),
            uploaded_at: record.uploaded_at,
            extra: record.extra,
        }
    }
}

/// Ordered listing and its size.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CatalogListing {
    pub total: usize,
    pub entries: Vec<CatalogEntry>,
}

/// Sort key: a missing upload time counts as the epoch.
fn upload_key(record: &Record) -> NaiveDateTime {
    record
        .uploaded_at
        .unwrap_or(NaiveDateTime::UNIX_EPOCH)
}

/// Run `query` against every kind and return the merged listing, newest
/// first. Records uploaded at the same instant keep their fetch order.
pub fn query_catalog<R>(query: &CatalogQuery, repo: &R) -> RepositoryResult<CatalogListing>
where
    R: RecordReader + ?Sized,
{
    let mut records = repo.fetch_records(&query.to_filter())?;
    records.sort_by(|a, b| upload_key(b).cmp(&upload_key(a)));

    let entries: Vec<CatalogEntry> = records.into_iter().map(CatalogEntry::from).collect();
    Ok(CatalogListing {
        total: entries.len(),
        entries,
    })
}

/// Sorted union of the themes in use, for the filter panel.
pub fn theme_options<R>(repo: &R) -> RepositoryResult<Vec<Theme>>
where
    R: RecordReader + ?Sized,
{
    repo.list_theme_options()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AuthorName, OrganizationName};
    use crate::repository::RecordStore;
    use crate::repository::test::{TestCollection, sample_record, test_store};

    fn query(kinds: &[RecordKind], themes: &[Theme], keyword: &str) -> CatalogQuery {
        CatalogQuery::new(
            kinds.iter().copied(),
            themes.iter().copied(),
            keyword,
            KeywordMode::Literal,
        )
        .unwrap()
    }

    fn mixed_catalog() -> Vec<Record> {
        vec![
            sample_record(1, RecordKind::Publication, "Cartilha", Some(300)),
            sample_record(2, RecordKind::Publication, "Livro", Some(100)),
            sample_record(3, RecordKind::Publication, "Artigo", Some(500)),
            sample_record(4, RecordKind::Image, "Foto", Some(400)),
            sample_record(5, RecordKind::Image, "Mapa mental", Some(200)),
        ]
    }

    #[test]
    fn empty_criteria_return_everything_newest_first() {
        let store = test_store(mixed_catalog());

        let listing = query_catalog(&CatalogQuery::default(), &store).unwrap();

        assert_eq!(listing.total, 5);
        let ids: Vec<i32> = listing.entries.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![3, 4, 1, 5, 2]);
        assert!(
            listing
                .entries
                .iter()
                .filter(|e| [1, 2, 3].contains(&e.id.get()))
                .all(|e| e.kind == RecordKind::Publication)
        );
        assert!(
            listing
                .entries
                .windows(2)
                .all(|pair| pair[0].uploaded_at >= pair[1].uploaded_at)
        );
    }

    #[test]
    fn kind_selection_never_leaks_other_kinds() {
        let store = test_store(mixed_catalog());

        let listing = query_catalog(&query(&[RecordKind::Image], &[], ""), &store).unwrap();

        assert_eq!(listing.total, 2);
        assert!(listing.entries.iter().all(|e| e.kind == RecordKind::Image));
    }

    #[test]
    fn keyword_is_trimmed_and_case_insensitive() {
        let mut publication = sample_record(1, RecordKind::Publication, "Cartilha", Some(10));
        publication.description = Some("Extrativismo do Babaçu no Maranhão".into());
        let video = sample_record(2, RecordKind::Video, "Festa junina", Some(20));
        let store = test_store(vec![publication, video]);

        let listing = query_catalog(&query(&[], &[], "  babaçu "), &store).unwrap();

        assert_eq!(listing.total, 1);
        assert_eq!(listing.entries[0].id.get(), 1);
    }

    #[test]
    fn keyword_matches_authors_and_organizations() {
        let mut by_author = sample_record(1, RecordKind::Report, "Relatório", Some(10));
        by_author.author = Some(AuthorName::new("Maria do Socorro").unwrap());
        let mut by_org = sample_record(2, RecordKind::Project, "Projeto", Some(20));
        by_org.organizations = vec![OrganizationName::new("Associação Socorro").unwrap()];
        let store = test_store(vec![by_author, by_org]);

        let listing = query_catalog(&query(&[], &[], "SOCORRO"), &store).unwrap();

        assert_eq!(listing.total, 2);
    }

    #[test]
    fn literal_keywords_do_not_act_as_patterns() {
        let store = test_store(vec![
            sample_record(1, RecordKind::Site, "a.b", Some(10)),
            sample_record(2, RecordKind::Site, "axb", Some(20)),
        ]);

        let listing = query_catalog(&query(&[], &[], "a.b"), &store).unwrap();
        assert_eq!(listing.total, 1);

        let pattern =
            CatalogQuery::new([], [], "a.b", KeywordMode::Pattern).unwrap();
        assert_eq!(query_catalog(&pattern, &store).unwrap().total, 2);
    }

    #[test]
    fn theme_selection_requires_overlap() {
        let mut both = sample_record(1, RecordKind::Publication, "Guia", Some(10));
        both.themes = vec![Theme::Health, Theme::Education];
        let mut education = sample_record(2, RecordKind::Publication, "Aula", Some(20));
        education.themes = vec![Theme::Education];
        let store = test_store(vec![both, education]);

        let listing = query_catalog(&query(&[], &[Theme::Health], ""), &store).unwrap();

        assert_eq!(listing.total, 1);
        assert_eq!(listing.entries[0].id.get(), 1);
    }

    #[test]
    fn list_fields_are_flattened_for_display() {
        let mut record = sample_record(1, RecordKind::Publication, "Guia", Some(10));
        record.themes = vec![Theme::Health, Theme::Education];
        record.organizations = vec![
            OrganizationName::new("MIQCB").unwrap(),
            OrganizationName::new("ASMUBIP").unwrap(),
        ];
        let store = test_store(vec![record.clone()]);

        let listing = query_catalog(&CatalogQuery::default(), &store).unwrap();

        let entry = &listing.entries[0];
        assert_eq!(entry.themes, "Saúde, Educação");
        assert_eq!(entry.organizations, "MIQCB, ASMUBIP");
        // The stored record keeps its sequences.
        let stored = store
            .get_record_by_id(RecordKind::Publication, record.id)
            .unwrap()
            .unwrap();
        assert_eq!(stored.themes, vec![Theme::Health, Theme::Education]);
    }

    #[test]
    fn incomplete_records_are_kept() {
        let mut untitled = sample_record(1, RecordKind::Map, "x", Some(10));
        untitled.title = None;
        let store = test_store(vec![untitled]);

        let listing = query_catalog(&CatalogQuery::default(), &store).unwrap();

        assert_eq!(listing.total, 1);
        assert!(listing.entries[0].title.is_none());
        assert_eq!(listing.entries[0].themes, "");
    }

    #[test]
    fn undated_records_sort_last_in_fetch_order() {
        let store = test_store(vec![
            sample_record(1, RecordKind::Publication, "Sem data", None),
            sample_record(2, RecordKind::Image, "Antiga", Some(1)),
            sample_record(3, RecordKind::Video, "Também sem data", None),
            sample_record(4, RecordKind::Video, "Empate", Some(1)),
        ]);

        let listing = query_catalog(&CatalogQuery::default(), &store).unwrap();

        let ids: Vec<i32> = listing.entries.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn repeated_queries_are_identical() {
        let store = test_store(mixed_catalog());
        let criteria = query(&[RecordKind::Publication], &[], "a");

        let first = query_catalog(&criteria, &store).unwrap();
        let second = query_catalog(&criteria, &store).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_store_yields_an_empty_listing() {
        let store = test_store(vec![]);

        let listing = query_catalog(&query(&[RecordKind::Video], &[Theme::Other], "nada"), &store)
            .unwrap();

        assert_eq!(listing, CatalogListing::default());
    }

    #[test]
    fn store_failures_propagate() {
        let store = RecordStore::new([
            TestCollection::new(RecordKind::Publication, vec![]),
            TestCollection::unavailable(RecordKind::Image),
        ]);

        assert!(query_catalog(&CatalogQuery::default(), &store).is_err());
    }

    #[test]
    fn theme_options_come_from_every_kind() {
        let mut a = sample_record(1, RecordKind::Podcast, "Podcast", None);
        a.themes = vec![Theme::Gastronomy];
        let mut b = sample_record(2, RecordKind::Legislation, "Lei", None);
        b.themes = vec![Theme::PublicPolicy, Theme::Gastronomy];
        let store = test_store(vec![a, b]);

        assert_eq!(
            theme_options(&store).unwrap(),
            vec![Theme::Gastronomy, Theme::PublicPolicy]
        );
    }
}
