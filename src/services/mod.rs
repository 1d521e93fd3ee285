//! Service layer: page loaders and actions, generic over the backend traits.

use thiserror::Error;

use crate::api::ApiError;

pub mod account;
pub mod auth;
pub mod main;
pub mod pricing;
pub mod survey;
pub mod surveys;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("Type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("Email not verified")]
    EmailNotVerified,

    #[error(transparent)]
    Api(ApiError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
