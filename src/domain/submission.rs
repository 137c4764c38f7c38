//! Per-kind submission schemas and post-processing hooks.
//!
//! Every kind is described by data: the fields its form accepts (with type
//! and required flag) and the hooks that enrich a record before it is
//! written. One submission workflow drives all kinds from this table.

use std::sync::LazyLock;

use regex::Regex;
use FieldType::*;

use crate::domain::kind::RecordKind;
use crate::domain::record::NewRecord;
use crate::domain::types::{Latitude, Longitude, RecordLink, RecordTitle};

/// Fields that map onto the common record contract. Anything else a schema
/// declares is stored in [`NewRecord::extra`].
pub const COMMON_FIELDS: [&str; 7] = [
    "title",
    "description",
    "themes",
    "author",
    "organizations",
    "link",
    "thumbnail_link",
];

static YOUTUBE_SHORT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})").expect("valid pattern"));
static YOUTUBE_QUERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"v=([a-zA-Z0-9_-]{11})").expect("valid pattern"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Text,
    LongText,
    /// Publication year between 1950 and the current year.
    Year,
    Url,
    /// ISO `YYYY-MM-DD` date.
    Date,
    Themes,
    Organizations,
    UrlList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub fn is_common(&self) -> bool {
        COMMON_FIELDS.contains(&self.name)
    }
}

const fn required(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required: true,
    }
}

const fn optional(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        name,
        field_type,
        required: false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostProcess {
    /// Derive the preview from a YouTube video id.
    YoutubeThumbnail,
    /// Parse `@lat,lng` out of a Google Maps link into `latitude`/`longitude`.
    MapCoordinates,
    /// Ask the [`PreviewCapture`] collaborator for a page screenshot.
    PagePreview,
}

#[derive(Debug)]
pub struct KindSchema {
    pub kind: RecordKind,
    pub fields: &'static [FieldSpec],
    pub hooks: &'static [PostProcess],
}

impl KindSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

static PUBLICATION: KindSchema = KindSchema {
    kind: RecordKind::Publication,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        required("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[],
};

static IMAGE: KindSchema = KindSchema {
    kind: RecordKind::Image,
    fields: &[
        required("title", Text),
        required("description", LongText),
        optional("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        optional("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[],
};

static VIDEO: KindSchema = KindSchema {
    kind: RecordKind::Video,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        required("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[PostProcess::YoutubeThumbnail],
};

static PODCAST: KindSchema = KindSchema {
    kind: RecordKind::Podcast,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        optional("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[],
};

static SITE: KindSchema = KindSchema {
    kind: RecordKind::Site,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("themes", Themes),
        optional("author", Text),
        optional("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[PostProcess::PagePreview],
};

static MAP: KindSchema = KindSchema {
    kind: RecordKind::Map,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        required("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[],
};

static LEGISLATION: KindSchema = KindSchema {
    kind: RecordKind::Legislation,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        required("legislative_body", Text),
        required("link", Url),
    ],
    hooks: &[],
};

static POINT_OF_INTEREST: KindSchema = KindSchema {
    kind: RecordKind::PointOfInterest,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("themes", Themes),
        required("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[PostProcess::MapCoordinates, PostProcess::PagePreview],
};

static REPORT: KindSchema = KindSchema {
    kind: RecordKind::Report,
    fields: &[
        required("title", Text),
        required("description", LongText),
        required("publication_year", Year),
        required("themes", Themes),
        required("author", Text),
        required("organizations", Organizations),
        required("link", Url),
        optional("thumbnail_link", Url),
    ],
    hooks: &[],
};

static ORGANIZATION: KindSchema = KindSchema {
    kind: RecordKind::Organization,
    fields: &[
        required("title", Text),
        required("acronym", Text),
        optional("description", LongText),
        optional("themes", Themes),
        optional("cnpj", Text),
        optional("websites", Text),
        optional("logo_link", Url),
        optional("documents", UrlList),
        optional("subfolder_id", Text),
    ],
    hooks: &[],
};

static PROJECT: KindSchema = KindSchema {
    kind: RecordKind::Project,
    fields: &[
        required("title", Text),
        optional("organizations", Organizations),
        optional("funding_source", Text),
        optional("start_date", Date),
        optional("end_date", Date),
        optional("objective", LongText),
        optional("description", LongText),
        optional("themes", Themes),
        optional("websites", Text),
        optional("documents", UrlList),
        optional("subfolder_id", Text),
    ],
    hooks: &[],
};

static RESEARCH: KindSchema = KindSchema {
    kind: RecordKind::Research,
    fields: &[
        required("title", Text),
        optional("publication_year", Year),
        optional("author", Text),
        optional("description", LongText),
        optional("themes", Themes),
        optional("organizations", Organizations),
        optional("documents", UrlList),
        optional("subfolder_id", Text),
    ],
    hooks: &[],
};

/// Dispatch table from kind to its submission schema.
pub fn schema_for(kind: RecordKind) -> &'static KindSchema {
    match kind {
        RecordKind::Publication => &PUBLICATION,
        RecordKind::Image => &IMAGE,
        RecordKind::Video => &VIDEO,
        RecordKind::Podcast => &PODCAST,
        RecordKind::Site => &SITE,
        RecordKind::Map => &MAP,
        RecordKind::Legislation => &LEGISLATION,
        RecordKind::PointOfInterest => &POINT_OF_INTEREST,
        RecordKind::Report => &REPORT,
        RecordKind::Organization => &ORGANIZATION,
        RecordKind::Project => &PROJECT,
        RecordKind::Research => &RESEARCH,
    }
}

/// External webpage screenshot service.
pub trait PreviewCapture {
    /// Capture and store a preview of `url`, returning the stored image link.
    fn capture(&self, url: &RecordLink, title: &RecordTitle) -> Option<RecordLink>;
}

/// Used when no screenshot service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreview;

impl PreviewCapture for NoPreview {
    fn capture(&self, _url: &RecordLink, _title: &RecordTitle) -> Option<RecordLink> {
        None
    }
}

/// Medium-quality thumbnail URL for a YouTube watch or short link.
pub fn youtube_thumbnail(link: &str) -> Option<String> {
    let captures = YOUTUBE_SHORT_ID
        .captures(link)
        .or_else(|| YOUTUBE_QUERY_ID.captures(link))?;
    let video_id = captures.get(1)?.as_str();
    Some(format!("https://img.youtube.com/vi/{video_id}/mqdefault.jpg"))
}

/// Coordinates from the `@lat,lng,zoom` segment of a Google Maps link.
pub fn google_maps_coordinates(link: &str) -> Option<(Latitude, Longitude)> {
    let (_, tail) = link.split_once('@')?;
    let mut parts = tail.split(',');
    let latitude = Latitude::try_from(parts.next()?).ok()?;
    let longitude = Longitude::try_from(parts.next()?).ok()?;
    Some((latitude, longitude))
}

/// Run the kind's hooks on a record about to be written.
///
/// Hooks never fail the submission: a hook that cannot derive its value
/// leaves the record unchanged (or clears stale coordinates).
pub fn apply_post_processing<P>(record: &mut NewRecord, preview: &P)
where
    P: PreviewCapture + ?Sized,
{
    for hook in schema_for(record.kind).hooks {
        match hook {
            PostProcess::YoutubeThumbnail => {
                if record.thumbnail_link.is_none() {
                    record.thumbnail_link = record
                        .link
                        .as_ref()
                        .and_then(|link| youtube_thumbnail(link.as_str()))
                        .and_then(|thumb| RecordLink::new(thumb).ok());
                }
            }
            PostProcess::MapCoordinates => {
                let coordinates = record
                    .link
                    .as_ref()
                    .and_then(|link| google_maps_coordinates(link.as_str()));
                match coordinates {
                    Some((latitude, longitude)) => {
                        record
                            .extra
                            .insert("latitude".into(), serde_json::json!(latitude.get()));
                        record
                            .extra
                            .insert("longitude".into(), serde_json::json!(longitude.get()));
                    }
                    None => {
                        record.extra.remove("latitude");
                        record.extra.remove("longitude");
                    }
                }
            }
            PostProcess::PagePreview => {
                if record.thumbnail_link.is_none() {
                    record.thumbnail_link = record
                        .link
                        .as_ref()
                        .and_then(|link| preview.capture(link, &record.title));
                }
            }
        }
    }
}
