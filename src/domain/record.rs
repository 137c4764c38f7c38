use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::kind::RecordKind;
use crate::domain::theme::Theme;
use crate::domain::types::{AuthorName, OrganizationName, RecordId, RecordLink, RecordTitle, UserName};

/// Kind-specific attributes carried opaquely alongside the common fields
/// (`latitude`, `legislative_body`, `cnpj`, `subfolder_id`, ...).
pub type RecordExtras = serde_json::Map<String, serde_json::Value>;

/// A catalog entry as stored in its kind's sub-collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    /// Provenance tag taken from the owning sub-collection.
    pub kind: RecordKind,
    /// Imported documents may predate the title requirement.
    pub title: Option<RecordTitle>,
    pub description: Option<String>,
    /// Semantically a set; stored order is preserved but carries no meaning.
    pub themes: Vec<Theme>,
    pub author: Option<AuthorName>,
    pub organizations: Vec<OrganizationName>,
    pub link: Option<RecordLink>,
    pub thumbnail_link: Option<RecordLink>,
    pub uploaded_by: Option<UserName>,
    pub uploaded_at: Option<NaiveDateTime>,
    pub extra: RecordExtras,
}

/// Read a kind-specific attribute as text.
///
/// Numbers are rendered with their JSON representation so coordinates
/// stored either way can be read back uniformly. Blank strings count as
/// missing.
pub fn extra_text(extra: &RecordExtras, key: &str) -> Option<String> {
    match extra.get(key)? {
        serde_json::Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
        serde_json::Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

impl Record {
    pub fn extra_str(&self, key: &str) -> Option<String> {
        extra_text(&self.extra, key)
    }
}

/// Information required to create (or fully replace) a [`Record`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRecord {
    pub kind: RecordKind,
    pub title: RecordTitle,
    pub description: Option<String>,
    pub themes: Vec<Theme>,
    pub author: Option<AuthorName>,
    pub organizations: Vec<OrganizationName>,
    pub link: Option<RecordLink>,
    pub thumbnail_link: Option<RecordLink>,
    pub uploaded_by: Option<UserName>,
    pub uploaded_at: NaiveDateTime,
    pub extra: RecordExtras,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_str_reads_strings_and_numbers() {
        let mut extra = RecordExtras::new();
        extra.insert("latitude".into(), json!("-4.52"));
        extra.insert("longitude".into(), json!(-44.1));
        extra.insert("documents".into(), json!(["a", "b"]));
        extra.insert("cnpj".into(), json!("  "));

        let record = Record {
            id: RecordId::new(1).unwrap(),
            kind: RecordKind::PointOfInterest,
            title: None,
            description: None,
            themes: vec![],
            author: None,
            organizations: vec![],
            link: None,
            thumbnail_link: None,
            uploaded_by: None,
            uploaded_at: None,
            extra,
        };

        assert_eq!(record.extra_str("latitude").as_deref(), Some("-4.52"));
        assert_eq!(record.extra_str("longitude").as_deref(), Some("-44.1"));
        assert_eq!(record.extra_str("documents"), None);
        assert_eq!(record.extra_str("cnpj"), None);
        assert_eq!(record.extra_str("missing"), None);
    }
}
