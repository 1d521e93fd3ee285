use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use estimate_pro::middleware::RedirectUnauthorized;
use estimate_pro::session::AuthenticatedBuilder;

#[actix_web::test]
async fn redirects_unauthorized_to_auth_page() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth");
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn dashboard_without_session_redirects_to_auth() {
    let app = test::init_service(
        App::new()
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                Key::from(&[7; 64]),
            ))
            .service(
                web::scope("").wrap(RedirectUnauthorized).route(
                    "/dashboard",
                    web::get().to(|builder: AuthenticatedBuilder| async move {
                        HttpResponse::Ok().body(builder.user.name)
                    }),
                ),
            ),
    )
    .await;

    let req = test::TestRequest::get().uri("/dashboard").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/auth");
}
