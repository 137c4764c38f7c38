use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::submission::{PreviewCapture, apply_post_processing};
use crate::domain::types::{RecordId, UserName};
use crate::forms::records::{DeleteRecordFormPayload, RecordPayload, UpdateRecordFormPayload};
use crate::repository::{RecordReader, RecordWriter};

use super::{ServiceError, ServiceResult};

/// Submitter recorded on new records: the user's name, or their email.
fn submitter(user: &AuthenticatedUser) -> Option<UserName> {
    UserName::new(user.name.as_str())
        .or_else(|_| UserName::new(user.email.as_str()))
        .ok()
}

/// Create a record in its kind's collection.
///
/// The kind's post-processing hooks run before the write. Returns the new
/// record's identifier.
pub fn submit_record<R, P>(
    payload: RecordPayload,
    user: &AuthenticatedUser,
    repo: &R,
    preview: &P,
) -> ServiceResult<RecordId>
where
    R: RecordWriter,
    P: PreviewCapture + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let mut record = payload.into_new_record(submitter(user), Utc::now().naive_utc());
    apply_post_processing(&mut record, preview);

    repo.create_record(&record).map_err(|e| {
        log::error!("Failed to create {} record: {e}", record.kind);
        ServiceError::Internal
    })
}

/// Replace an existing record's contents.
///
/// Upload metadata of the original record is preserved; records imported
/// without it are stamped with the editing user and the current time.
pub fn update_record<R, P>(
    payload: UpdateRecordFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    preview: &P,
) -> ServiceResult<()>
where
    R: RecordReader + RecordWriter,
    P: PreviewCapture + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let kind = payload.record.kind;
    let existing = match repo.get_record_by_id(kind, payload.id) {
        Ok(Some(record)) => record,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get record: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let uploaded_by = existing.uploaded_by.or_else(|| submitter(user));
    let uploaded_at = existing
        .uploaded_at
        .unwrap_or_else(|| Utc::now().naive_utc());
    let mut record = payload.record.into_new_record(uploaded_by, uploaded_at);
    apply_post_processing(&mut record, preview);

    match repo.replace_record(kind, payload.id, &record) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to replace record: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Remove a record from its kind's collection.
pub fn delete_record<R>(
    payload: DeleteRecordFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: RecordWriter,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.delete_record(payload.kind, payload.id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete record: {e}");
            Err(ServiceError::Internal)
        }
    }
}
