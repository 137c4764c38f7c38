use std::collections::HashMap;

use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::kind::RecordKind;
use crate::domain::record::{NewRecord, Record};
use crate::domain::theme::Theme;
use crate::domain::types::RecordId;
use crate::models::record::{NewRecord as DbNewRecord, Record as DbRecord, theme_rows};
use crate::repository::{DieselRepository, RecordCollection, RecordFilter};

/// A kind's sub-collection: the rows of `records` tagged with that kind.
///
/// Kind and theme restrictions run in SQL. The keyword is evaluated on the
/// loaded rows since SQLite `LIKE` only folds ASCII case.
#[derive(Clone)]
pub struct DieselCollection {
    repo: DieselRepository,
    kind: RecordKind,
}

impl DieselCollection {
    pub fn new(repo: DieselRepository, kind: RecordKind) -> Self {
        Self { repo, kind }
    }

    /// Attach ordered themes to loaded rows and convert them to domain records.
    fn hydrate(
        &self,
        conn: &mut SqliteConnection,
        rows: Vec<DbRecord>,
    ) -> RepositoryResult<Vec<Record>> {
        use crate::schema::record_themes;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let theme_pairs: Vec<(i32, String)> = record_themes::table
            .filter(record_themes::record_id.eq_any(ids))
            .order((record_themes::record_id.asc(), record_themes::position.asc()))
            .select((record_themes::record_id, record_themes::theme))
            .load(conn)?;

        let mut themes_by_record: HashMap<i32, Vec<String>> = HashMap::new();
        for (record_id, theme) in theme_pairs {
            themes_by_record.entry(record_id).or_default().push(theme);
        }

        let records = rows
            .into_iter()
            .map(|row| {
                let themes = themes_by_record.remove(&row.id).unwrap_or_default();
                row.into_domain(themes)
            })
            .collect::<Result<Vec<Record>, _>>()?;

        Ok(records)
    }
}

impl RecordCollection for DieselCollection {
    fn kind(&self) -> RecordKind {
        self.kind
    }

    fn find(&self, filter: &RecordFilter) -> RepositoryResult<Vec<Record>> {
        use crate::schema::{record_themes, records};

        if !filter.admits_kind(self.kind) {
            return Ok(vec![]);
        }

        let mut conn = self.repo.conn()?;

        let theme_labels: Vec<String> = filter.themes.iter().map(|t| t.as_str().to_string()).collect();

        let mut items = records::table
            .filter(records::kind.eq(self.kind.slug()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !theme_labels.is_empty() {
            items = items.filter(
                records::id.eq_any(
                    record_themes::table
                        .filter(record_themes::theme.eq_any(theme_labels))
                        .select(record_themes::record_id),
                ),
            );
        }

        let rows = items
            .order(records::id.asc())
            .load::<DbRecord>(&mut conn)?;

        let mut found = self.hydrate(&mut conn, rows)?;
        found.retain(|record| filter.matches_keyword(record));

        Ok(found)
    }

    fn distinct_themes(&self) -> RepositoryResult<Vec<Theme>> {
        use crate::schema::{record_themes, records};

        let mut conn = self.repo.conn()?;

        let labels: Vec<String> = record_themes::table
            .inner_join(records::table)
            .filter(records::kind.eq(self.kind.slug()))
            .select(record_themes::theme)
            .distinct()
            .load(&mut conn)?;

        let mut themes: Vec<Theme> = labels
            .into_iter()
            .filter_map(|label| match Theme::try_from(label.as_str()) {
                Ok(theme) => Some(theme),
                Err(_) => {
                    log::warn!("Ignoring unknown theme in {}: {label}", self.kind);
                    None
                }
            })
            .collect();
        themes.sort();
        themes.dedup();

        Ok(themes)
    }

    fn get(&self, id: RecordId) -> RepositoryResult<Option<Record>> {
        use crate::schema::records;

        let mut conn = self.repo.conn()?;

        let row = records::table
            .filter(records::id.eq(id.get()))
            .filter(records::kind.eq(self.kind.slug()))
            .first::<DbRecord>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.hydrate(&mut conn, vec![row])?.pop())
    }

    fn insert(&self, record: &NewRecord) -> RepositoryResult<RecordId> {
        use crate::schema::{record_themes, records};

        let mut conn = self.repo.conn()?;
        let mut db_record = DbNewRecord::try_from(record)?;
        db_record.kind = self.kind.slug().to_string();

        let id = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let id = diesel::insert_into(records::table)
                .values(&db_record)
                .returning(records::id)
                .get_result::<i32>(conn)?;

            let themes = theme_rows(id, &record.themes);
            if !themes.is_empty() {
                diesel::insert_into(record_themes::table)
                    .values(&themes)
                    .execute(conn)?;
            }

            Ok(id)
        })?;

        Ok(RecordId::new(id)?)
    }

    fn replace(&self, id: RecordId, record: &NewRecord) -> RepositoryResult<usize> {
        use crate::schema::{record_themes, records};

        let mut conn = self.repo.conn()?;
        let mut db_record = DbNewRecord::try_from(record)?;
        db_record.kind = self.kind.slug().to_string();

        let affected = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let affected = diesel::update(
                records::table
                    .filter(records::id.eq(id.get()))
                    .filter(records::kind.eq(self.kind.slug())),
            )
            .set(&db_record)
            .execute(conn)?;

            if affected == 0 {
                return Ok(0);
            }

            diesel::delete(record_themes::table.filter(record_themes::record_id.eq(id.get())))
                .execute(conn)?;
            let themes = theme_rows(id.get(), &record.themes);
            if !themes.is_empty() {
                diesel::insert_into(record_themes::table)
                    .values(&themes)
                    .execute(conn)?;
            }

            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete(&self, id: RecordId) -> RepositoryResult<usize> {
        use crate::schema::{record_themes, records};

        let mut conn = self.repo.conn()?;

        let affected = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let affected = diesel::delete(
                records::table
                    .filter(records::id.eq(id.get()))
                    .filter(records::kind.eq(self.kind.slug())),
            )
            .execute(conn)?;

            if affected > 0 {
                diesel::delete(record_themes::table.filter(record_themes::record_id.eq(id.get())))
                    .execute(conn)?;
            }

            Ok(affected)
        })?;

        Ok(affected)
    }
}
