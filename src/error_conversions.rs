//! Error conversion glue between the domain, form and service layers.
//!
//! The domain layer must not depend on service error types, but `data`
//! feature consumers still get the repository conversion.

use pushkind_common::repository::errors::RepositoryError;

use crate::domain::types::TypeConstraintError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod service {
    use pushkind_common::services::errors::ServiceError;

    use crate::domain::keyword::KeywordError;
    use crate::domain::types::TypeConstraintError;
    use crate::forms::catalog::CatalogFilterFormError;
    use crate::forms::records::{DeleteRecordFormError, RecordFormError};

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<KeywordError> for ServiceError {
        fn from(val: KeywordError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<CatalogFilterFormError> for ServiceError {
        fn from(val: CatalogFilterFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<RecordFormError> for ServiceError {
        fn from(val: RecordFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<DeleteRecordFormError> for ServiceError {
        fn from(val: DeleteRecordFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }
}
