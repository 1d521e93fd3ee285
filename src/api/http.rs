//! reqwest implementation of the backend traits.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::errors::{EMAIL_NOT_VERIFIED, ErrorBody};
use crate::api::{
    ApiError, ApiResult, AuthApi, AuthResponse, LoginRequest, PricingReader, PricingWriter,
    ProfileApi, RegisterRequest, ResetPasswordRequest, SurveyReader, SurveyWriter,
};
use crate::domain::client_survey::{ClientSurvey, SurveyStatus};
use crate::domain::pricing::{BuilderPricingItem, NewPricingItem};
use crate::domain::survey::NewClientSurvey;
use crate::domain::types::{BearerToken, Email, PricingId, SurveyId};
use crate::domain::user::{Profile, ProfileUpdate, User};

#[derive(Deserialize)]
struct CurrentUserEnvelope {
    #[serde(rename = "currentUser")]
    current_user: Option<User>,
}

#[derive(Deserialize)]
struct ProfileEnvelope {
    #[serde(default)]
    profile: Option<Profile>,
}

#[derive(Deserialize)]
struct SurveysEnvelope {
    #[serde(rename = "buildersClientSurveys", default)]
    surveys: Option<Vec<ClientSurvey>>,
}

#[derive(Deserialize)]
struct SurveyEnvelope {
    #[serde(rename = "clientSurvey", default)]
    survey: Option<ClientSurvey>,
}

#[derive(Deserialize)]
struct PricingEnvelope {
    #[serde(rename = "builderPricings", default)]
    items: Option<Vec<BuilderPricingItem>>,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the EstiMate backend.
#[derive(Clone, Debug)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    /// Creates a client for `base_url`; every request path is appended to
    /// `{base_url}/api/`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&BearerToken>) -> RequestBuilder {
        let url = format!("{}/api/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn dispatch(&self, builder: RequestBuilder, fallback: &str) -> ApiResult<reqwest::Response> {
        let response = builder.send().await.map_err(|err| {
            log::warn!("Backend request failed: {err}");
            ApiError::Network(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        log::debug!("Backend rejected request with {status}: {body:?}");
        Err(body.into_rejection(status, fallback))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<T> {
        let response = self.dispatch(builder, fallback).await?;
        response
            .json::<T>()
            .await
            .map_err(ApiError::from)
    }

    /// Sends a request whose success body carries nothing we need.
    async fn send_unit(&self, builder: RequestBuilder, fallback: &str) -> ApiResult<()> {
        self.dispatch(builder, fallback).await.map(|_| ())
    }

    async fn send_message(
        &self,
        builder: RequestBuilder,
        fallback: &str,
        success: &str,
    ) -> ApiResult<String> {
        let response = self.dispatch(builder, fallback).await?;
        let envelope = response
            .json::<MessageEnvelope>()
            .await
            .unwrap_or(MessageEnvelope { message: None });
        Ok(envelope
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| success.to_string()))
    }
}

fn photo_part(file_name: &str, content_type: &str, data: Vec<u8>) -> ApiResult<Part> {
    Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_str(content_type)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid content type {content_type}: {e}")))
}

impl AuthApi for HttpApiClient {
    async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        let builder = self.request(Method::POST, "register", None).json(request);
        let fallback = "Registration failed";
        self.send_json(builder, fallback).await
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        let builder = self.request(Method::POST, "login", None).json(request);
        let response = builder.send().await.map_err(|err| {
            log::warn!("Backend request failed: {err}");
            ApiError::Network(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<AuthResponse>()
                .await
                .map_err(ApiError::from);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        if status == StatusCode::FORBIDDEN && body.error.as_deref() == Some(EMAIL_NOT_VERIFIED) {
            return Err(ApiError::EmailNotVerified {
                user: body.user.map(Box::new),
                token: body.token,
            });
        }
        Err(body.into_rejection(status, &format!("Login failed with status {}", status.as_u16())))
    }

    async fn logout(&self, token: &BearerToken) -> ApiResult<()> {
        let builder = self.request(Method::POST, "logout", Some(token));
        self.send_unit(builder, "Logout failed").await
    }

    async fn current_user(&self, token: &BearerToken) -> ApiResult<User> {
        let builder = self.request(Method::GET, "current/user", Some(token));
        let envelope: CurrentUserEnvelope = self.send_json(builder, "Failed to fetch user data").await?;
        envelope
            .current_user
            .ok_or_else(|| ApiError::Decode("response has no currentUser".to_string()))
    }

    async fn resend_verification(&self, token: &BearerToken) -> ApiResult<String> {
        let builder = self.request(Method::POST, "email/verification-notification", Some(token));
        self.send_message(
            builder,
            "Failed to send verification email",
            "Verification link sent.",
        )
        .await
    }

    async fn forgot_password(&self, email: &Email) -> ApiResult<String> {
        let builder = self
            .request(Method::POST, "forgot-password", None)
            .json(&serde_json::json!({ "email": email }));
        self.send_message(
            builder,
            "Failed to send password reset email",
            "Password reset link sent.",
        )
        .await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<String> {
        let builder = self.request(Method::POST, "reset-password", None).json(request);
        self.send_message(
            builder,
            "Failed to reset password",
            "Your password has been reset.",
        )
        .await
    }
}

impl ProfileApi for HttpApiClient {
    async fn profile(&self, token: &BearerToken) -> ApiResult<Option<Profile>> {
        let builder = self.request(Method::GET, "profile", Some(token));
        let envelope: ProfileEnvelope = self.send_json(builder, "Failed to fetch profile data").await?;
        Ok(envelope.profile)
    }

    async fn update_profile(
        &self,
        token: &BearerToken,
        update: &ProfileUpdate,
    ) -> ApiResult<Option<Profile>> {
        let builder = self.request(Method::POST, "profile", Some(token));
        let builder = match &update.picture {
            Some(picture) => {
                let mut form = Form::new();
                for (name, value) in update.text_fields() {
                    form = form.text(name, value.to_string());
                }
                form = form.part(
                    "profile_picture",
                    photo_part(&picture.file_name, &picture.content_type, picture.data.clone())?,
                );
                builder.multipart(form)
            }
            None => {
                let fields = update
                    .text_fields()
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), serde_json::Value::from(value)))
                    .collect::<serde_json::Map<_, _>>();
                builder.json(&fields)
            }
        };
        let envelope: ProfileEnvelope = self.send_json(builder, "Failed to update profile").await?;
        Ok(envelope.profile)
    }
}

impl SurveyReader for HttpApiClient {
    async fn list_surveys(&self, token: &BearerToken) -> ApiResult<Vec<ClientSurvey>> {
        let builder = self.request(Method::GET, "client-surveys", Some(token));
        let envelope: SurveysEnvelope = self
            .send_json(builder, "Failed to fetch client surveys")
            .await?;
        Ok(envelope.surveys.unwrap_or_default())
    }

    async fn get_survey(&self, token: &BearerToken, id: SurveyId) -> ApiResult<ClientSurvey> {
        let fallback = "Failed to fetch survey details";
        let builder = self.request(Method::GET, &format!("client-surveys/show/{id}"), Some(token));
        let envelope: SurveyEnvelope = self.send_json(builder, fallback).await?;
        envelope.survey.ok_or_else(|| ApiError::Rejected {
            status: StatusCode::NOT_FOUND.as_u16(),
            message: fallback.to_string(),
        })
    }
}

impl SurveyWriter for HttpApiClient {
    async fn submit_survey(&self, survey: &NewClientSurvey) -> ApiResult<()> {
        let mut form = Form::new();
        for (name, value) in survey.text_parts() {
            form = form.text(name, value);
        }
        for (index, photo) in survey.photos.iter().enumerate() {
            form = form.part(
                format!("photos[{index}]"),
                photo_part(&photo.file_name, &photo.content_type, photo.data.clone())?,
            );
        }

        let path = format!("client-survey/store/{}", survey.builder_id);
        let builder = self.request(Method::POST, &path, None).multipart(form);
        self.send_unit(builder, "Failed to submit survey").await
    }

    async fn update_survey_status(
        &self,
        token: &BearerToken,
        id: SurveyId,
        status: SurveyStatus,
    ) -> ApiResult<()> {
        let builder = self
            .request(
                Method::POST,
                &format!("client-surveys/update-status/{id}"),
                Some(token),
            )
            .json(&serde_json::json!({ "status": status }));
        self.send_unit(builder, "Failed to update survey status").await
    }

    async fn delete_survey(&self, token: &BearerToken, id: SurveyId) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, &format!("client-surveys/{id}"), Some(token));
        self.send_unit(builder, "Failed to delete survey").await
    }
}

impl PricingReader for HttpApiClient {
    async fn list_pricing(&self, token: &BearerToken) -> ApiResult<Vec<BuilderPricingItem>> {
        let builder = self.request(Method::GET, "builder-pricing", Some(token));
        let envelope: PricingEnvelope = self
            .send_json(builder, "Failed to fetch builder pricings")
            .await?;
        Ok(envelope.items.unwrap_or_default())
    }
}

impl PricingWriter for HttpApiClient {
    async fn create_pricing(&self, token: &BearerToken, item: &NewPricingItem) -> ApiResult<()> {
        let builder = self
            .request(Method::POST, "builder-pricing", Some(token))
            .json(item);
        self.send_unit(builder, "Failed to store pricing").await
    }

    async fn update_pricing(
        &self,
        token: &BearerToken,
        id: PricingId,
        item: &NewPricingItem,
    ) -> ApiResult<()> {
        let builder = self
            .request(Method::PUT, &format!("builder-pricing/{id}"), Some(token))
            .json(item);
        self.send_unit(builder, "Failed to update pricing").await
    }

    async fn delete_pricing(&self, token: &BearerToken, id: PricingId) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, &format!("builder-pricing/{id}"), Some(token));
        self.send_unit(builder, "Failed to delete pricing").await
    }
}
