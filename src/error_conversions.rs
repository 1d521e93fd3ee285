//! Error conversion glue between the domain, client, session and service layers.
//!
//! The domain layer must not depend on service error types, so the
//! conversions live here instead of next to either side.

use crate::api::ApiError;
use crate::domain::survey::{PhotoError, SurveyError};
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::services::ServiceError;
use crate::session::SessionError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ApiError> for ServiceError {
    fn from(val: ApiError) -> Self {
        match val {
            ApiError::EmailNotVerified { .. } => ServiceError::EmailNotVerified,
            err if err.is_unauthorized() => ServiceError::Unauthorized,
            err if err.is_not_found() => ServiceError::NotFound,
            err => ServiceError::Api(err),
        }
    }
}

impl From<SessionError> for ServiceError {
    fn from(val: SessionError) -> Self {
        match val {
            SessionError::Api(err) => err.into(),
            SessionError::Store(message) => ServiceError::Internal(message),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<SurveyError> for ServiceError {
    fn from(val: SurveyError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<PhotoError> for ServiceError {
    fn from(val: PhotoError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<TypeConstraintError> for FormError {
    fn from(val: TypeConstraintError) -> Self {
        FormError::InvalidValue(val.to_string())
    }
}
