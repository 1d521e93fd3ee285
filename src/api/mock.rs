//! Mock backend implementations for isolating services in tests.

use mockall::mock;

use crate::api::{
    ApiResult, AuthApi, AuthResponse, LoginRequest, PricingReader, PricingWriter, ProfileApi,
    RegisterRequest, ResetPasswordRequest, SurveyReader, SurveyWriter,
};
use crate::domain::client_survey::{ClientSurvey, SurveyStatus};
use crate::domain::pricing::{BuilderPricingItem, NewPricingItem};
use crate::domain::survey::NewClientSurvey;
use crate::domain::types::{BearerToken, Email, PricingId, SurveyId};
use crate::domain::user::{Profile, ProfileUpdate, User};

mock! {
    pub Backend {}

    impl AuthApi for Backend {
        async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse>;
        async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse>;
        async fn logout(&self, token: &BearerToken) -> ApiResult<()>;
        async fn current_user(&self, token: &BearerToken) -> ApiResult<User>;
        async fn resend_verification(&self, token: &BearerToken) -> ApiResult<String>;
        async fn forgot_password(&self, email: &Email) -> ApiResult<String>;
        async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<String>;
    }

    impl ProfileApi for Backend {
        async fn profile(&self, token: &BearerToken) -> ApiResult<Option<Profile>>;
        async fn update_profile(
            &self,
            token: &BearerToken,
            update: &ProfileUpdate,
        ) -> ApiResult<Option<Profile>>;
    }

    impl SurveyReader for Backend {
        async fn list_surveys(&self, token: &BearerToken) -> ApiResult<Vec<ClientSurvey>>;
        async fn get_survey(&self, token: &BearerToken, id: SurveyId) -> ApiResult<ClientSurvey>;
    }

    impl SurveyWriter for Backend {
        async fn submit_survey(&self, survey: &NewClientSurvey) -> ApiResult<()>;
        async fn update_survey_status(
            &self,
            token: &BearerToken,
            id: SurveyId,
            status: SurveyStatus,
        ) -> ApiResult<()>;
        async fn delete_survey(&self, token: &BearerToken, id: SurveyId) -> ApiResult<()>;
    }

    impl PricingReader for Backend {
        async fn list_pricing(&self, token: &BearerToken) -> ApiResult<Vec<BuilderPricingItem>>;
    }

    impl PricingWriter for Backend {
        async fn create_pricing(&self, token: &BearerToken, item: &NewPricingItem) -> ApiResult<()>;
        async fn update_pricing(
            &self,
            token: &BearerToken,
            id: PricingId,
            item: &NewPricingItem,
        ) -> ApiResult<()>;
        async fn delete_pricing(&self, token: &BearerToken, id: PricingId) -> ApiResult<()>;
    }
}
