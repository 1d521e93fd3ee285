//! Typed access to the EstiMate REST backend.
//!
//! Services depend on the traits below rather than on [`HttpApiClient`], so
//! they can be exercised against in-memory fakes.
#![allow(async_fn_in_trait)]

use serde::{Deserialize, Serialize};

use crate::domain::client_survey::{ClientSurvey, SurveyStatus};
use crate::domain::pricing::{BuilderPricingItem, NewPricingItem};
use crate::domain::survey::NewClientSurvey;
use crate::domain::types::{BearerToken, Email, PricingId, SurveyId};
use crate::domain::user::{Profile, ProfileUpdate, User};

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use errors::{ApiError, ApiResult};
pub use http::HttpApiClient;

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: Email,
    pub password: String,
    pub role_id: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub email: Email,
    pub password: String,
    pub password_confirmation: String,
}

/// Successful login or registration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub token: BearerToken,
}

pub trait AuthApi {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;
    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;
    async fn logout(&self, token: &BearerToken) -> ApiResult<()>;
    async fn current_user(&self, token: &BearerToken) -> ApiResult<User>;
    async fn resend_verification(&self, token: &BearerToken) -> ApiResult<String>;
    async fn forgot_password(&self, email: &Email) -> ApiResult<String>;
    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<String>;
}

pub trait ProfileApi {
    async fn profile(&self, token: &BearerToken) -> ApiResult<Option<Profile>>;
    async fn update_profile(
        &self,
        token: &BearerToken,
        update: &ProfileUpdate,
    ) -> ApiResult<Option<Profile>>;
}

pub trait SurveyReader {
    async fn list_surveys(&self, token: &BearerToken) -> ApiResult<Vec<ClientSurvey>>;
    async fn get_survey(&self, token: &BearerToken, id: SurveyId) -> ApiResult<ClientSurvey>;
}

pub trait SurveyWriter {
    /// Public submission from the survey link; sends no credentials.
    async fn submit_survey(&self, survey: &NewClientSurvey) -> ApiResult<()>;
    async fn update_survey_status(
        &self,
        token: &BearerToken,
        id: SurveyId,
        status: SurveyStatus,
    ) -> ApiResult<()>;
    async fn delete_survey(&self, token: &BearerToken, id: SurveyId) -> ApiResult<()>;
}

pub trait PricingReader {
    async fn list_pricing(&self, token: &BearerToken) -> ApiResult<Vec<BuilderPricingItem>>;
}

pub trait PricingWriter {
    async fn create_pricing(&self, token: &BearerToken, item: &NewPricingItem) -> ApiResult<()>;
    async fn update_pricing(
        &self,
        token: &BearerToken,
        id: PricingId,
        item: &NewPricingItem,
    ) -> ApiResult<()>;
    async fn delete_pricing(&self, token: &BearerToken, id: PricingId) -> ApiResult<()>;
}
