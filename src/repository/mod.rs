use std::collections::BTreeSet;

use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::keyword::KeywordMatcher;
use crate::domain::kind::RecordKind;
use crate::domain::record::{NewRecord, Record};
use crate::domain::theme::Theme;
use crate::domain::types::RecordId;

pub mod record;
pub mod store;

pub use record::DieselCollection;
pub use store::RecordStore;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Handle for a single kind's sub-collection.
    pub fn collection(&self, kind: RecordKind) -> DieselCollection {
        DieselCollection::new(self.clone(), kind)
    }

    /// Adapter over every kind, registered in [`RecordKind::ALL`] order.
    pub fn record_store(&self) -> RecordStore<DieselCollection> {
        RecordStore::new(RecordKind::ALL.into_iter().map(|kind| self.collection(kind)))
    }
}

/// Store-level predicate executed by each sub-collection.
///
/// Empty sets and a missing keyword mean "no restriction"; the default
/// filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Restrict to these kinds.
    pub kinds: BTreeSet<RecordKind>,
    /// Require at least one of these themes.
    pub themes: BTreeSet<Theme>,
    /// Case-insensitive match against title, description, themes, author or
    /// organizations.
    pub keyword: Option<KeywordMatcher>,
}

impl RecordFilter {
    pub fn kinds(mut self, kinds: impl IntoIterator<Item = RecordKind>) -> Self {
        self.kinds.extend(kinds);
        self
    }
    pub fn themes(mut self, themes: impl IntoIterator<Item = Theme>) -> Self {
        self.themes.extend(themes);
        self
    }
    pub fn keyword(mut self, keyword: KeywordMatcher) -> Self {
        self.keyword = Some(keyword);
        self
    }

    /// True when the filter places no restriction at all.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.themes.is_empty() && self.keyword.is_none()
    }

    pub fn admits_kind(&self, kind: RecordKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    pub fn matches_themes(&self, themes: &[Theme]) -> bool {
        self.themes.is_empty() || themes.iter().any(|t| self.themes.contains(t))
    }

    pub fn matches_keyword(&self, record: &Record) -> bool {
        let Some(keyword) = &self.keyword else {
            return true;
        };

        record.title.as_ref().is_some_and(|t| keyword.is_match(t))
            || record.description.as_ref().is_some_and(|d| keyword.is_match(d))
            || record.themes.iter().any(|t| keyword.is_match(t.as_str()))
            || record.author.as_ref().is_some_and(|a| keyword.is_match(a))
            || record.organizations.iter().any(|o| keyword.is_match(o))
    }

    /// Evaluate the whole predicate against an in-memory record.
    pub fn matches(&self, record: &Record) -> bool {
        self.admits_kind(record.kind)
            && self.matches_themes(&record.themes)
            && self.matches_keyword(record)
    }
}

/// One kind's sub-collection in the backing document store.
pub trait RecordCollection {
    /// Kind owning every record in this collection.
    fn kind(&self) -> RecordKind;
    /// All records matching the filter, in storage order.
    fn find(&self, filter: &RecordFilter) -> RepositoryResult<Vec<Record>>;
    /// Distinct themes used by records of this collection.
    fn distinct_themes(&self) -> RepositoryResult<Vec<Theme>>;
    fn get(&self, id: RecordId) -> RepositoryResult<Option<Record>>;
    fn insert(&self, record: &NewRecord) -> RepositoryResult<RecordId>;
    /// Full-document replace. Returns the number of affected records.
    fn replace(&self, id: RecordId, record: &NewRecord) -> RepositoryResult<usize>;
    fn delete(&self, id: RecordId) -> RepositoryResult<usize>;
}

/// Read-only operations over the whole catalog.
pub trait RecordReader {
    /// Matching records from every kind, kind-tagged, in registration order.
    fn fetch_records(&self, filter: &RecordFilter) -> RepositoryResult<Vec<Record>>;
    /// Sorted union of the themes in use across every kind.
    fn list_theme_options(&self) -> RepositoryResult<Vec<Theme>>;
    /// Retrieve a record by kind and identifier.
    fn get_record_by_id(&self, kind: RecordKind, id: RecordId) -> RepositoryResult<Option<Record>>;
}

/// Write operations routed to the owning kind's sub-collection.
pub trait RecordWriter {
    /// Persist a new record in `record.kind`'s collection.
    fn create_record(&self, record: &NewRecord) -> RepositoryResult<RecordId>;
    /// Replace an existing record in place. The kind never changes.
    fn replace_record(
        &self,
        kind: RecordKind,
        id: RecordId,
        record: &NewRecord,
    ) -> RepositoryResult<usize>;
    /// Delete a record by kind and identifier.
    fn delete_record(&self, kind: RecordKind, id: RecordId) -> RepositoryResult<usize>;
}
