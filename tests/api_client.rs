//! Exercises `HttpApiClient` against an in-process fake backend.

use std::sync::Mutex;
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::header, web};
use serde_json::json;

use estimate_pro::api::{
    ApiError, AuthApi, HttpApiClient, LoginRequest, PricingReader, ProfileApi, RegisterRequest,
    SurveyReader, SurveyWriter,
};
use estimate_pro::domain::pricing::PriceType;
use estimate_pro::domain::survey::{FieldId, PhotoFile, SurveyDraft};
use estimate_pro::domain::types::{BearerToken, BuilderId, Email, SurveyId};
use estimate_pro::domain::user::{ProfilePicture, ProfileUpdate};

const VALID_TOKEN: &str = "valid-token";

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {VALID_TOKEN}").as_str())
}

fn user_json(verified: bool) -> serde_json::Value {
    let verified_at = verified.then_some("2024-01-01T00:00:00Z");
    json!({
        "id": 7,
        "name": "Bob Builder",
        "email": "bob@example.com",
        "email_verified_at": verified_at,
    })
}

async fn login(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
    if req.headers().contains_key(header::AUTHORIZATION) {
        return HttpResponse::BadRequest().json(json!({ "message": "Login takes no token" }));
    }
    match body["email"].as_str() {
        Some("bob@example.com") => HttpResponse::Ok().json(json!({
            "user": user_json(true),
            "token": VALID_TOKEN,
        })),
        Some("pending@example.com") => HttpResponse::Forbidden().json(json!({
            "error": "Email not verified",
            "user": user_json(false),
            "token": "pending-token",
        })),
        _ => HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" })),
    }
}

async fn pricing(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().json(json!({ "message": "Unauthenticated." }));
    }
    HttpResponse::Ok().json(json!({
        "builderPricings": [{
            "id": 3,
            "item_name": "Waterproofing",
            "applicability": "Bathroom Tiling",
            "price_type": "fixed",
            "base_price": "350.00",
            "markup_percent": "10",
            "final_price": 385
        }]
    }))
}

async fn missing_survey(req: HttpRequest) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::NotFound().json(json!({}))
}

/// What the fake backend saw of one write request.
#[derive(Clone, Debug)]
struct Captured {
    path: String,
    content_type: String,
    authorization: Option<String>,
    body: String,
}

type Recorder = web::Data<Mutex<Vec<Captured>>>;

async fn record(req: HttpRequest, body: web::Bytes, recorder: Recorder) -> HttpResponse {
    let header_value = |name| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    recorder.lock().unwrap().push(Captured {
        path: req.path().to_string(),
        content_type: header_value(header::CONTENT_TYPE).unwrap_or_default(),
        authorization: header_value(header::AUTHORIZATION),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    match req.path() {
        "/api/register" => HttpResponse::Created().json(json!({
            "user": user_json(false),
            "token": "new-token",
        })),
        "/api/forgot-password" => {
            HttpResponse::Ok().json(json!({ "message": "Reset link sent to your inbox." }))
        }
        "/api/profile" => HttpResponse::Ok().json(json!({ "profile": null })),
        _ => HttpResponse::Created().json(json!({ "message": "Survey stored" })),
    }
}

async fn spawn_backend() -> (String, ServerHandle, Recorder) {
    let recorder: Recorder = web::Data::new(Mutex::new(Vec::new()));
    let app_recorder = recorder.clone();
    let server = HttpServer::new(move || {
        App::new().app_data(app_recorder.clone()).service(
            web::scope("/api")
                .route("/login", web::post().to(login))
                .route("/register", web::post().to(record))
                .route("/forgot-password", web::post().to(record))
                .route("/profile", web::post().to(record))
                .route("/client-survey/store/{builder_id}", web::post().to(record))
                .route("/builder-pricing", web::get().to(pricing))
                .route("/client-surveys/show/{id}", web::get().to(missing_survey)),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{addr}"), handle, recorder)
}

fn captured(recorder: &Recorder) -> Captured {
    let requests = recorder.lock().unwrap();
    assert_eq!(requests.len(), 1);
    requests[0].clone()
}

fn client(base_url: &str) -> HttpApiClient {
    HttpApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

fn credentials(email: &str) -> LoginRequest {
    LoginRequest {
        email: Email::new(email).unwrap(),
        password: "secret1".to_string(),
    }
}

#[actix_web::test]
async fn login_returns_user_and_token() {
    let (base_url, handle, _) = spawn_backend().await;

    let response = client(&base_url)
        .login(&credentials("bob@example.com"))
        .await
        .unwrap();

    assert_eq!(response.user.name, "Bob Builder");
    assert!(response.user.is_verified());
    assert_eq!(response.token.as_str(), VALID_TOKEN);
    handle.stop(false).await;
}

#[actix_web::test]
async fn unverified_login_carries_pending_credentials() {
    let (base_url, handle, _) = spawn_backend().await;

    let err = client(&base_url)
        .login(&credentials("pending@example.com"))
        .await
        .unwrap_err();

    match err {
        ApiError::EmailNotVerified { user, token } => {
            assert_eq!(user.map(|u| u.email), Some("bob@example.com".to_string()));
            assert_eq!(token.map(|t| t.as_str().to_string()), Some("pending-token".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    handle.stop(false).await;
}

#[actix_web::test]
async fn rejected_login_surfaces_backend_error() {
    let (base_url, handle, _) = spawn_backend().await;

    let err = client(&base_url)
        .login(&credentials("nobody@example.com"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid credentials");
    handle.stop(false).await;
}

#[actix_web::test]
async fn pricing_requires_bearer_token() {
    let (base_url, handle, _) = spawn_backend().await;
    let api = client(&base_url);

    let items = api
        .list_pricing(&BearerToken::new(VALID_TOKEN).unwrap())
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price_type, PriceType::Fixed);
    assert_eq!(items[0].final_price, 385.0);

    let err = api
        .list_pricing(&BearerToken::new("stale").unwrap())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Unauthenticated.");
    handle.stop(false).await;
}

#[actix_web::test]
async fn missing_survey_uses_fallback_message() {
    let (base_url, handle, _) = spawn_backend().await;

    let err = client(&base_url)
        .get_survey(
            &BearerToken::new(VALID_TOKEN).unwrap(),
            SurveyId::new(99).unwrap(),
        )
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Failed to fetch survey details");
    handle.stop(false).await;
}

#[actix_web::test]
async fn unreachable_backend_is_a_network_error() {
    // Nothing listens on the discard port.
    let err = client("http://127.0.0.1:9")
        .login(&credentials("bob@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[actix_web::test]
async fn survey_submission_is_anonymous_multipart() {
    let (base_url, handle, recorder) = spawn_backend().await;
    let mut draft = SurveyDraft::new();
    for (field, value) in [
        (FieldId::FullName, "Jane Doe"),
        (FieldId::PhoneNumber, "0400 111 222"),
        (FieldId::MeasurementType, "direct"),
        (FieldId::TotalSize, "12"),
        (FieldId::PropertyType, "Apartment"),
        (FieldId::HomeAge, "Over 50 years old"),
        (FieldId::TilePreference, "budget"),
        (FieldId::IncludeTiles, "no"),
        (FieldId::ToiletMove, "move"),
        (FieldId::WallChange, "yes"),
    ] {
        draft.set(field, value).unwrap();
    }
    draft
        .photos
        .accept(vec![
            PhotoFile::new("tub.jpg", "image/jpeg", b"jpeg-bytes".to_vec()),
            PhotoFile::new("tiles.png", "image/png", b"png-bytes".to_vec()),
        ])
        .unwrap();
    let survey = draft
        .into_submission(Some(BuilderId::new(12).unwrap()))
        .unwrap();

    client(&base_url).submit_survey(&survey).await.unwrap();

    let request = captured(&recorder);
    assert_eq!(request.path, "/api/client-survey/store/12");
    assert!(request.content_type.starts_with("multipart/form-data; boundary="));
    assert!(request.authorization.is_none());
    assert!(request.body.contains("name=\"client_name\""));
    assert!(request.body.contains("Jane Doe"));
    assert!(request.body.contains("name=\"total_area\""));
    assert!(request.body.contains("name=\"photos[0]\"; filename=\"tub.jpg\""));
    assert!(request.body.contains("name=\"photos[1]\"; filename=\"tiles.png\""));
    assert!(request.body.contains("jpeg-bytes"));
    handle.stop(false).await;
}

#[actix_web::test]
async fn register_and_forgot_password_send_no_token() {
    let (base_url, handle, recorder) = spawn_backend().await;
    let api = client(&base_url);

    let response = api
        .register(&RegisterRequest {
            name: "Bob Builder".to_string(),
            email: Email::new("bob@example.com").unwrap(),
            password: "secret1".to_string(),
            role_id: 2,
        })
        .await
        .unwrap();
    assert_eq!(response.token.as_str(), "new-token");
    assert!(!response.user.is_verified());

    let message = api
        .forgot_password(&Email::new("bob@example.com").unwrap())
        .await
        .unwrap();
    assert_eq!(message, "Reset link sent to your inbox.");

    let requests = recorder.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request.authorization.is_none(), "{} sent a token", request.path);
        assert!(request.content_type.starts_with("application/json"));
        assert!(request.body.contains("bob@example.com"));
    }
    handle.stop(false).await;
}

#[actix_web::test]
async fn profile_update_switches_to_multipart_for_a_picture() {
    let (base_url, handle, recorder) = spawn_backend().await;
    let api = client(&base_url);
    let token = BearerToken::new(VALID_TOKEN).unwrap();

    let update = ProfileUpdate::new("Bob's Bathrooms", "", "1 Main St");
    api.update_profile(&token, &update).await.unwrap();

    let update = update.with_picture(ProfilePicture {
        file_name: "logo.png".to_string(),
        content_type: "image/png".to_string(),
        data: b"logo-bytes".to_vec(),
    });
    api.update_profile(&token, &update).await.unwrap();

    let requests = recorder.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    let bearer = format!("Bearer {VALID_TOKEN}");

    let json_request = &requests[0];
    assert!(json_request.content_type.starts_with("application/json"));
    assert_eq!(json_request.authorization.as_deref(), Some(bearer.as_str()));
    let body: serde_json::Value = serde_json::from_str(&json_request.body).unwrap();
    assert_eq!(body["address"], "1 Main St");
    assert!(body.get("phone_number").is_none());

    let multipart_request = &requests[1];
    assert!(
        multipart_request
            .content_type
            .starts_with("multipart/form-data; boundary=")
    );
    assert_eq!(multipart_request.authorization.as_deref(), Some(bearer.as_str()));
    assert!(multipart_request.body.contains("name=\"profile_picture\"; filename=\"logo.png\""));
    assert!(multipart_request.body.contains("name=\"address\""));
    assert!(!multipart_request.body.contains("name=\"phone_number\""));
    handle.stop(false).await;
}
