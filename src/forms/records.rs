//! Submission, edit and delete forms for catalog records.
//!
//! Submissions are validated against the kind's [`KindSchema`]: every
//! declared field is type-checked, required fields must be present and
//! fields the schema does not declare are rejected. Common fields land on
//! the record itself, the rest in its extras.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::kind::RecordKind;
use crate::domain::record::{NewRecord, RecordExtras};
use crate::domain::submission::{FieldSpec, FieldType, KindSchema, schema_for};
use crate::domain::theme::Theme;
use crate::domain::types::{
    AuthorName, OrganizationName, RecordId, RecordLink, RecordTitle, TypeConstraintError, UserName,
};

/// Earliest publication year accepted by the forms.
pub const MIN_PUBLICATION_YEAR: i32 = 1950;

#[derive(Debug, Error)]
pub enum RecordFormError {
    #[error("Record form validation failed: {0}")]
    Validation(String),
    #[error("Record form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Field '{0}' is required")]
    MissingField(String),
    #[error("Field '{0}' is not accepted for this kind")]
    UnknownField(String),
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

impl From<ValidationErrors> for RecordFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RecordFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn invalid(field: &FieldSpec, reason: impl Into<String>) -> RecordFormError {
    RecordFormError::InvalidField {
        field: field.name.to_string(),
        reason: reason.into(),
    }
}

/// Null, blank strings and empty lists count as "not provided".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn as_text(field: &FieldSpec, value: &Value) -> Result<String, RecordFormError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        _ => Err(invalid(field, "expected text")),
    }
}

/// Lists may be sent as arrays or as a single comma-separated string.
fn as_list(field: &FieldSpec, value: &Value) -> Result<Vec<String>, RecordFormError> {
    let items: Vec<String> = match value {
        Value::String(s) => s.split(',').map(|item| item.trim().to_string()).collect(),
        Value::Array(values) => values
            .iter()
            .map(|v| as_text(field, v))
            .collect::<Result<_, _>>()?,
        _ => return Err(invalid(field, "expected a list")),
    };

    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_empty() && !unique.contains(&item) {
            unique.push(item);
        }
    }
    Ok(unique)
}

fn as_year(field: &FieldSpec, value: &Value) -> Result<i32, RecordFormError> {
    let year = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(field, "expected a year"))?;

    let current = Utc::now().year();
    if !(MIN_PUBLICATION_YEAR..=current).contains(&year) {
        return Err(invalid(
            field,
            format!("year must be between {MIN_PUBLICATION_YEAR} and {current}"),
        ));
    }
    Ok(year)
}

fn as_date(field: &FieldSpec, value: &Value) -> Result<NaiveDate, RecordFormError> {
    let text = as_text(field, value)?;
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|_| invalid(field, "expected a YYYY-MM-DD date"))
}

fn as_link(field: &FieldSpec, value: &Value) -> Result<RecordLink, RecordFormError> {
    RecordLink::new(as_text(field, value)?).map_err(|e| invalid(field, e.to_string()))
}

/// Validated record contents, ready to be stamped with upload metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPayload {
    pub kind: RecordKind,
    pub title: RecordTitle,
    pub description: Option<String>,
    pub themes: Vec<Theme>,
    pub author: Option<AuthorName>,
    pub organizations: Vec<OrganizationName>,
    pub link: Option<RecordLink>,
    pub thumbnail_link: Option<RecordLink>,
    pub extra: RecordExtras,
}

/// Convert a kind-specific field into its stored JSON form.
fn extra_value(field: &FieldSpec, value: &Value) -> Result<Value, RecordFormError> {
    Ok(match field.field_type {
        FieldType::Text | FieldType::LongText => Value::String(as_text(field, value)?),
        FieldType::Year => Value::from(as_year(field, value)?),
        FieldType::Url => Value::String(as_link(field, value)?.into()),
        FieldType::Date => Value::String(as_date(field, value)?.format("%Y-%m-%d").to_string()),
        FieldType::Themes | FieldType::Organizations => Value::Array(
            as_list(field, value)?
                .into_iter()
                .map(Value::String)
                .collect(),
        ),
        FieldType::UrlList => Value::Array(
            as_list(field, value)?
                .into_iter()
                .map(|link| {
                    RecordLink::new(link)
                        .map(|l| Value::String(l.into()))
                        .map_err(|e| invalid(field, e.to_string()))
                })
                .collect::<Result<_, _>>()?,
        ),
    })
}

impl RecordPayload {
    /// Check `fields` against the schema of `kind`.
    pub fn from_fields(kind: RecordKind, fields: Map<String, Value>) -> Result<Self, RecordFormError> {
        let schema: &KindSchema = schema_for(kind);

        if let Some(unknown) = fields.keys().find(|name| schema.field(name).is_none()) {
            return Err(RecordFormError::UnknownField(unknown.clone()));
        }

        let mut title = None;
        let mut description = None;
        let mut themes = vec![];
        let mut author = None;
        let mut organizations = vec![];
        let mut link = None;
        let mut thumbnail_link = None;
        let mut extra = RecordExtras::new();

        for field in schema.fields {
            let value = match fields.get(field.name) {
                Some(value) if !is_blank(value) => value,
                _ if field.required => {
                    return Err(RecordFormError::MissingField(field.name.to_string()));
                }
                _ => continue,
            };

            if !field.is_common() {
                extra.insert(field.name.to_string(), extra_value(field, value)?);
                continue;
            }

            match field.name {
                "title" => title = Some(RecordTitle::new(as_text(field, value)?)?),
                "description" => description = Some(as_text(field, value)?),
                "author" => author = Some(AuthorName::new(as_text(field, value)?)?),
                "link" => link = Some(as_link(field, value)?),
                "thumbnail_link" => thumbnail_link = Some(as_link(field, value)?),
                "themes" => {
                    themes = as_list(field, value)?
                        .into_iter()
                        .map(Theme::try_from)
                        .collect::<Result<_, _>>()?;
                }
                "organizations" => {
                    organizations = as_list(field, value)?
                        .into_iter()
                        .map(OrganizationName::new)
                        .collect::<Result<_, _>>()?;
                }
                other => return Err(RecordFormError::UnknownField(other.to_string())),
            }
        }

        Ok(Self {
            kind,
            title: title.ok_or_else(|| RecordFormError::MissingField("title".into()))?,
            description,
            themes,
            author,
            organizations,
            link,
            thumbnail_link,
            extra,
        })
    }

    /// Stamp the payload with its upload metadata.
    pub fn into_new_record(
        self,
        uploaded_by: Option<UserName>,
        uploaded_at: NaiveDateTime,
    ) -> NewRecord {
        NewRecord {
            kind: self.kind,
            title: self.title,
            description: self.description,
            themes: self.themes,
            author: self.author,
            organizations: self.organizations,
            link: self.link,
            thumbnail_link: self.thumbnail_link,
            uploaded_by,
            uploaded_at,
            extra: self.extra,
        }
    }
}

/// New record submission. `fields` is keyed by the schema's field names.
#[derive(Deserialize, Validate, Debug)]
pub struct SubmitRecordForm {
    #[validate(length(min = 1))]
    pub kind: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl TryFrom<SubmitRecordForm> for RecordPayload {
    type Error = RecordFormError;

    fn try_from(value: SubmitRecordForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let kind = RecordKind::try_from(value.kind)?;
        RecordPayload::from_fields(kind, value.fields)
    }
}

/// Full replacement of an existing record's contents.
#[derive(Deserialize, Debug)]
pub struct UpdateRecordForm {
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecordFormPayload {
    pub id: RecordId,
    pub record: RecordPayload,
}

impl UpdateRecordForm {
    /// Bind the form to the record addressed by the request path.
    pub fn into_payload(self, kind: &str, id: i32) -> Result<UpdateRecordFormPayload, RecordFormError> {
        let kind = RecordKind::try_from(kind)?;
        Ok(UpdateRecordFormPayload {
            id: RecordId::new(id)?,
            record: RecordPayload::from_fields(kind, self.fields)?,
        })
    }
}

/// Deletion must be confirmed explicitly.
#[derive(Deserialize, Debug, Default)]
pub struct DeleteRecordForm {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteRecordFormPayload {
    pub kind: RecordKind,
    pub id: RecordId,
}

#[derive(Debug, Error)]
pub enum DeleteRecordFormError {
    #[error("Deletion was not confirmed")]
    NotConfirmed,
    #[error("Delete record form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for DeleteRecordFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl DeleteRecordForm {
    pub fn into_payload(
        self,
        kind: &str,
        id: i32,
    ) -> Result<DeleteRecordFormPayload, DeleteRecordFormError> {
        if !self.confirm {
            return Err(DeleteRecordFormError::NotConfirmed);
        }
        Ok(DeleteRecordFormPayload {
            kind: RecordKind::try_from(kind)?,
            id: RecordId::new(id)?,
        })
    }
}
