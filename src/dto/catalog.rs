use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use crate::catalog::{CatalogEntry, CatalogListing};
use crate::domain::kind::RecordKind;
use crate::domain::record::{RecordExtras, extra_text};

static DRIVE_QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id=([a-zA-Z0-9_-]+)").expect("valid pattern"));

/// Identifier of a Google Drive file link (`/d/{id}/...` or `?id={id}`).
pub fn drive_file_id(link: &str) -> Option<&str> {
    if !link.contains("drive.google.com") {
        return None;
    }
    if let Some((_, tail)) = link.split_once("/d/") {
        return tail.split('/').next().filter(|id| !id.is_empty());
    }
    DRIVE_QUERY_ID
        .captures(link)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Image URL suitable for a card preview.
///
/// Drive links are rewritten to the Drive thumbnail endpoint; Drive links
/// without a recognizable file id yield nothing. Other links are used as is.
pub fn preview_url(link: &str) -> Option<String> {
    if link.contains("drive.google.com") {
        drive_file_id(link).map(|id| format!("https://drive.google.com/thumbnail?sz=w280&id={id}"))
    } else {
        Some(link.to_string())
    }
}

/// Catalog card as returned by the JSON API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntryDto {
    pub id: i32,
    pub kind: RecordKind,
    pub kind_label: &'static str,
    pub title: Option<String>,
    pub description: Option<String>,
    pub themes: String,
    pub author: Option<String>,
    pub organizations: String,
    pub link: Option<String>,
    /// Target of the "view details" action.
    pub details_url: Option<String>,
    pub preview_url: Option<String>,
    pub uploaded_by: Option<String>,
    pub uploaded_at: Option<NaiveDateTime>,
    pub extra: RecordExtras,
}

impl From<CatalogEntry> for CatalogEntryDto {
    fn from(value: CatalogEntry) -> Self {
        let details_url = value
            .kind
            .uses_folder_listing()
            .then(|| extra_text(&value.extra, "subfolder_id"))
            .flatten()
            .map(|folder| format!("https://drive.google.com/drive/folders/{folder}"))
            .or_else(|| value.link.clone());

        let preview = value.thumbnail_link.clone().or_else(|| {
            (value.kind == RecordKind::Organization)
                .then(|| extra_text(&value.extra, "logo_link"))
                .flatten()
        });

        Self {
            id: value.id.get(),
            kind: value.kind,
            kind_label: value.kind.label(),
            details_url,
            preview_url: preview.as_deref().and_then(preview_url),
            title: value.title,
            description: value.description,
            themes: value.themes,
            author: value.author,
            organizations: value.organizations,
            link: value.link,
            uploaded_by: value.uploaded_by,
            uploaded_at: value.uploaded_at,
            extra: value.extra,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogPageDto {
    pub total: usize,
    pub records: Vec<CatalogEntryDto>,
}

impl From<CatalogListing> for CatalogPageDto {
    fn from(value: CatalogListing) -> Self {
        Self {
            total: value.total,
            records: value.entries.into_iter().map(CatalogEntryDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecordId;
    use serde_json::json;

    fn entry(kind: RecordKind) -> CatalogEntry {
        CatalogEntry {
            id: RecordId::new(1).unwrap(),
            kind,
            title: Some("Título".into()),
            description: None,
            themes: "Saúde".into(),
            author: None,
            organizations: String::new(),
            link: Some("https://example.com/doc.pdf".into()),
            thumbnail_link: None,
            uploaded_by: None,
            uploaded_at: None,
            extra: RecordExtras::new(),
        }
    }

    #[test]
    fn extracts_drive_file_ids() {
        assert_eq!(
            drive_file_id("https://drive.google.com/file/d/1AbC_d-9/view?usp=sharing"),
            Some("1AbC_d-9")
        );
        assert_eq!(
            drive_file_id("https://drive.google.com/open?id=XYZ_123"),
            Some("XYZ_123")
        );
        assert_eq!(drive_file_id("https://drive.google.com/drive/my-drive"), None);
        assert_eq!(drive_file_id("https://example.com/d/abc"), None);
    }

    #[test]
    fn rewrites_drive_previews_only() {
        assert_eq!(
            preview_url("https://drive.google.com/file/d/abc/view").as_deref(),
            Some("https://drive.google.com/thumbnail?sz=w280&id=abc")
        );
        assert_eq!(
            preview_url("https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg").as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg")
        );
        assert_eq!(preview_url("https://drive.google.com/drive/my-drive"), None);
    }

    #[test]
    fn folder_kinds_link_to_their_folder() {
        let mut organization = entry(RecordKind::Organization);
        organization
            .extra
            .insert("subfolder_id".into(), json!("folder42"));
        organization.extra.insert(
            "logo_link".into(),
            json!("https://drive.google.com/file/d/logo7/view"),
        );

        let dto = CatalogEntryDto::from(organization);

        assert_eq!(
            dto.details_url.as_deref(),
            Some("https://drive.google.com/drive/folders/folder42")
        );
        assert_eq!(
            dto.preview_url.as_deref(),
            Some("https://drive.google.com/thumbnail?sz=w280&id=logo7")
        );
        assert_eq!(dto.kind_label, "Organização");
    }

    #[test]
    fn other_kinds_link_to_the_resource() {
        let mut publication = entry(RecordKind::Publication);
        publication
            .extra
            .insert("subfolder_id".into(), json!("ignored"));

        let dto = CatalogEntryDto::from(publication);

        assert_eq!(dto.details_url.as_deref(), Some("https://example.com/doc.pdf"));
        assert!(dto.preview_url.is_none());
    }

    #[test]
    fn folder_kinds_without_folder_fall_back_to_link() {
        let dto = CatalogEntryDto::from(entry(RecordKind::Project));
        assert_eq!(dto.details_url.as_deref(), Some("https://example.com/doc.pdf"));

        let mut blank = entry(RecordKind::Research);
        blank.extra.insert("subfolder_id".into(), json!("  "));
        let dto = CatalogEntryDto::from(blank);
        assert_eq!(dto.details_url.as_deref(), Some("https://example.com/doc.pdf"));
    }
}
