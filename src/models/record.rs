use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Deserialize;

use crate::domain::kind::RecordKind;
use crate::domain::record::{NewRecord as DomainNewRecord, Record as DomainRecord, RecordExtras};
use crate::domain::theme::Theme;
use crate::domain::types::{
    AuthorName, OrganizationName, RecordLink, RecordTitle, TypeConstraintError, UserName,
};

/// Diesel model representing the `records` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::records)]
pub struct Record {
    pub id: i32,
    pub kind: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    /// JSON array of organization references.
    pub organizations: String,
    pub link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: Option<NaiveDateTime>,
    /// JSON object of kind-specific attributes.
    pub extra: String,
}

/// Insertable/replaceable form of [`Record`].
///
/// `None` values are written as `NULL` so an update is a full replace.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::records)]
#[diesel(treat_none_as_null = true)]
pub struct NewRecord {
    pub kind: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub organizations: String,
    pub link: Option<String>,
    pub thumbnail_link: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: Option<NaiveDateTime>,
    pub extra: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::record_themes)]
pub struct NewRecordTheme {
    pub record_id: i32,
    pub theme: String,
    pub position: i32,
}

/// List column that older rows may hold as a single string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredList {
    Many(Vec<String>),
    One(String),
}

impl StoredList {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read a stored link, tolerating imported values that lack a scheme.
///
/// `www.example.org` is read as `https://www.example.org`; anything still
/// unparseable is dropped with a warning so the rest of the record survives.
fn stored_link(record_id: i32, field: &str, value: Option<String>) -> Option<RecordLink> {
    let value = blank_to_none(value)?;
    if let Ok(link) = RecordLink::new(value.as_str()) {
        return Some(link);
    }
    if !value.contains("://") {
        if let Ok(link) = RecordLink::new(format!("https://{}", value.trim())) {
            return Some(link);
        }
    }
    log::warn!("Ignoring invalid {field} on record {record_id}: {value}");
    None
}

/// Map stored theme labels onto the vocabulary, skipping unknown ones.
fn stored_themes(record_id: i32, labels: Vec<String>) -> Vec<Theme> {
    labels
        .into_iter()
        .filter_map(|label| match Theme::try_from(label.as_str()) {
            Ok(theme) => Some(theme),
            Err(_) => {
                log::warn!("Ignoring unknown theme on record {record_id}: {label}");
                None
            }
        })
        .collect()
}

fn invalid_json(field: &str, err: serde_json::Error) -> TypeConstraintError {
    TypeConstraintError::InvalidValue(format!("{field}: {err}"))
}

impl Record {
    /// Convert a row and its ordered theme labels into a domain record.
    pub fn into_domain(self, themes: Vec<String>) -> Result<DomainRecord, TypeConstraintError> {
        let organizations: StoredList = serde_json::from_str(&self.organizations)
            .map_err(|e| invalid_json("organizations", e))?;
        let extra: RecordExtras =
            serde_json::from_str(&self.extra).map_err(|e| invalid_json("extra", e))?;

        Ok(DomainRecord {
            id: self.id.try_into()?,
            kind: RecordKind::try_from(self.kind)?,
            title: blank_to_none(self.title).map(RecordTitle::new).transpose()?,
            description: blank_to_none(self.description),
            themes: stored_themes(self.id, themes),
            author: blank_to_none(self.author).map(AuthorName::new).transpose()?,
            organizations: organizations
                .into_vec()
                .into_iter()
                .filter(|o| !o.trim().is_empty())
                .map(OrganizationName::new)
                .collect::<Result<_, _>>()?,
            link: stored_link(self.id, "link", self.link),
            thumbnail_link: stored_link(self.id, "thumbnail_link", self.thumbnail_link),
            uploaded_by: blank_to_none(self.uploaded_by)
                .map(UserName::new)
                .transpose()?,
            uploaded_at: self.uploaded_at,
            extra,
        })
    }
}

impl TryFrom<&DomainNewRecord> for NewRecord {
    type Error = TypeConstraintError;

    fn try_from(record: &DomainNewRecord) -> Result<Self, Self::Error> {
        let organizations: Vec<&str> = record.organizations.iter().map(|o| o.as_str()).collect();

        Ok(Self {
            kind: record.kind.slug().to_string(),
            title: Some(record.title.as_str().to_string()),
            description: record.description.clone(),
            author: record.author.as_ref().map(|a| a.as_str().to_string()),
            organizations: serde_json::to_string(&organizations)
                .map_err(|e| invalid_json("organizations", e))?,
            link: record.link.as_ref().map(|l| l.as_str().to_string()),
            thumbnail_link: record.thumbnail_link.as_ref().map(|l| l.as_str().to_string()),
            uploaded_by: record.uploaded_by.as_ref().map(|u| u.as_str().to_string()),
            uploaded_at: Some(record.uploaded_at),
            extra: serde_json::to_string(&record.extra).map_err(|e| invalid_json("extra", e))?,
        })
    }
}

/// Theme rows for a record, de-duplicated while keeping the stored order.
pub fn theme_rows(record_id: i32, themes: &[Theme]) -> Vec<NewRecordTheme> {
    let mut seen = Vec::with_capacity(themes.len());
    for theme in themes {
        if !seen.contains(theme) {
            seen.push(*theme);
        }
    }

    seen.into_iter()
        .enumerate()
        .map(|(position, theme)| NewRecordTheme {
            record_id,
            theme: theme.as_str().to_string(),
            position: position as i32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Record {
        Record {
            id: 7,
            kind: "publicacoes".into(),
            title: Some("Cartilha do babaçu".into()),
            description: Some("  ".into()),
            author: None,
            organizations: r#"["MIQCB", ""]"#.into(),
            link: Some("https://drive.google.com/file/d/abc/view".into()),
            thumbnail_link: None,
            uploaded_by: Some("ana".into()),
            uploaded_at: None,
            extra: r#"{"publication_year": 2021}"#.into(),
        }
    }

    #[test]
    fn converts_rows_into_domain_records() {
        let record = row()
            .into_domain(vec!["Saúde".into(), "Educação".into()])
            .unwrap();

        assert_eq!(record.id, 7);
        assert_eq!(record.kind, RecordKind::Publication);
        assert_eq!(record.description, None);
        assert_eq!(record.themes, vec![Theme::Health, Theme::Education]);
        assert_eq!(record.organizations.len(), 1);
        assert_eq!(record.extra["publication_year"], serde_json::json!(2021));
    }

    #[test]
    fn accepts_a_single_organization_string() {
        let mut legacy = row();
        legacy.organizations = r#""ASMUBIP""#.into();
        let record = legacy.into_domain(vec![]).unwrap();
        assert_eq!(record.organizations[0].as_str(), "ASMUBIP");
    }

    #[test]
    fn tolerates_imported_links_and_unknown_themes() {
        let mut legacy = row();
        legacy.link = Some("www.miqcb.org".into());
        legacy.thumbnail_link = Some("not a link at all".into());

        let record = legacy
            .into_domain(vec!["Saúde".into(), "Extrativismo".into()])
            .unwrap();

        assert_eq!(
            record.link.map(String::from).as_deref(),
            Some("https://www.miqcb.org")
        );
        assert!(record.thumbnail_link.is_none());
        assert_eq!(record.themes, vec![Theme::Health]);
    }

    #[test]
    fn rejects_corrupt_json_columns() {
        let mut bad = row();
        bad.organizations = "not json".into();
        assert!(bad.into_domain(vec![]).is_err());
    }

    #[test]
    fn theme_rows_drop_duplicates_and_keep_order() {
        let rows = theme_rows(3, &[Theme::Health, Theme::Other, Theme::Health]);
        let labels: Vec<_> = rows.iter().map(|r| (r.theme.as_str(), r.position)).collect();
        assert_eq!(labels, vec![("Saúde", 0), ("Outro", 1)]);
    }
}
