use std::collections::BTreeSet;

use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::kind::RecordKind;
use crate::domain::record::{NewRecord, Record};
use crate::domain::theme::Theme;
use crate::domain::types::RecordId;
use crate::repository::{RecordCollection, RecordFilter, RecordReader, RecordWriter};

/// Uniform access layer over the per-kind sub-collections.
///
/// Holds an explicit kind → collection dispatch table. Reads fan out to every
/// registered collection in registration order; writes are routed to the
/// collection owning the record's kind.
#[derive(Clone)]
pub struct RecordStore<C> {
    collections: Vec<C>,
}

impl<C: RecordCollection> RecordStore<C> {
    /// Register collections in the given order. A kind registered twice keeps
    /// its first collection.
    pub fn new(collections: impl IntoIterator<Item = C>) -> Self {
        let mut registered: Vec<C> = Vec::new();
        for collection in collections {
            if registered.iter().all(|c| c.kind() != collection.kind()) {
                registered.push(collection);
            }
        }
        Self {
            collections: registered,
        }
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        self.collections.iter().map(RecordCollection::kind)
    }

    /// Collection owning `kind`, if registered.
    pub fn collection(&self, kind: RecordKind) -> Option<&C> {
        self.collections.iter().find(|c| c.kind() == kind)
    }

    fn owning_collection(&self, kind: RecordKind) -> RepositoryResult<&C> {
        self.collection(kind).ok_or_else(|| {
            RepositoryError::ValidationError(format!("no collection registered for {kind}"))
        })
    }

    /// Run `filter` against every registered collection and concatenate the
    /// results, tagging each record with its collection's kind.
    ///
    /// Collections of kinds the filter excludes are not queried. The first
    /// failing collection aborts the fetch and its error is returned as is.
    pub fn fetch(&self, filter: &RecordFilter) -> RepositoryResult<Vec<Record>> {
        let mut records = Vec::new();
        for collection in &self.collections {
            let kind = collection.kind();
            if !filter.admits_kind(kind) {
                continue;
            }
            records.extend(collection.find(filter)?.into_iter().map(|mut record| {
                record.kind = kind;
                record
            }));
        }
        Ok(records)
    }
}

impl<C: RecordCollection> RecordReader for RecordStore<C> {
    fn fetch_records(&self, filter: &RecordFilter) -> RepositoryResult<Vec<Record>> {
        self.fetch(filter)
    }

    fn list_theme_options(&self) -> RepositoryResult<Vec<Theme>> {
        let mut themes = BTreeSet::new();
        for collection in &self.collections {
            themes.extend(collection.distinct_themes()?);
        }
        Ok(themes.into_iter().collect())
    }

    fn get_record_by_id(&self, kind: RecordKind, id: RecordId) -> RepositoryResult<Option<Record>> {
        match self.collection(kind) {
            Some(collection) => collection.get(id),
            None => Ok(None),
        }
    }
}

impl<C: RecordCollection> RecordWriter for RecordStore<C> {
    fn create_record(&self, record: &NewRecord) -> RepositoryResult<RecordId> {
        self.owning_collection(record.kind)?.insert(record)
    }

    fn replace_record(
        &self,
        kind: RecordKind,
        id: RecordId,
        record: &NewRecord,
    ) -> RepositoryResult<usize> {
        if record.kind != kind {
            return Err(RepositoryError::ValidationError(format!(
                "record kind cannot change from {kind} to {}",
                record.kind
            )));
        }
        self.owning_collection(kind)?.replace(id, record)
    }

    fn delete_record(&self, kind: RecordKind, id: RecordId) -> RepositoryResult<usize> {
        self.owning_collection(kind)?.delete(id)
    }
}
