//! Helpers for integration tests.

use chrono::{DateTime, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_acervo::domain::kind::RecordKind;
use pushkind_acervo::domain::record::{NewRecord, RecordExtras};
use pushkind_acervo::domain::types::RecordTitle;
use pushkind_acervo::repository::DieselRepository;
use pushkind_common::db::{DbPool, establish_connection_pool};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Migrated SQLite file that lives as long as the value.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn at(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
}

pub fn new_record(kind: RecordKind, title: &str, uploaded_at: i64) -> NewRecord {
    NewRecord {
        kind,
        title: RecordTitle::new(title).unwrap(),
        description: None,
        themes: vec![],
        author: None,
        organizations: vec![],
        link: None,
        thumbnail_link: None,
        uploaded_by: None,
        uploaded_at: at(uploaded_at),
        extra: RecordExtras::new(),
    }
}
