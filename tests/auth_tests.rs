//! Auth proxy tests: login, token refresh, signup and logout.

mod common;

use actix_web::{http::StatusCode, test};
use common::{Call, FakeBackend, USER_EMAIL, VALID_TOKEN, backend, bearer, metrics, test_config};
use roble_gateway::create_base_app;
use serde_json::{Value, json};

#[actix_web::test]
async fn test_login_returns_backend_tokens() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "ana@uninorte.edu.co", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["accessToken"], VALID_TOKEN);
    assert_eq!(json["refreshToken"], "refresh-1");
    assert_eq!(fake.calls(), vec![Call::Login("ana@uninorte.edu.co".to_string())]);
}

#[actix_web::test]
async fn test_login_rejected_by_backend() {
    let (_, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "ana@uninorte.edu.co", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "invalid credentials");
}

#[actix_web::test]
async fn test_login_requires_both_fields() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    for body in [json!({"email": "ana@uninorte.edu.co"}), json!({"password": "secret"}), json!({})] {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
    assert!(fake.calls().is_empty());
}

#[actix_web::test]
async fn test_refresh_token() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/refresh-token")
        .set_json(json!({"refreshToken": "refresh-1"}))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["accessToken"], "valid-token-2");

    let req = test::TestRequest::post()
        .uri("/auth/refresh-token")
        .set_json(json!({"refreshToken": "stale"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/refresh-token")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        fake.calls(),
        vec![
            Call::Refresh("refresh-1".to_string()),
            Call::Refresh("stale".to_string())
        ]
    );
}

/// The token is verified on every request; nothing is cached.
#[actix_web::test]
async fn test_token_verified_on_every_request() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    for _ in 0..3 {
        let req = test::TestRequest::get()
            .uri("/api/info")
            .insert_header(("Authorization", format!("Bearer {VALID_TOKEN}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(
        fake.calls(),
        vec![Call::Verify(VALID_TOKEN.to_string()); 3]
    );
}

#[actix_web::test]
async fn test_signup() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({"email": "new@uninorte.edu.co", "password": "pw", "name": "New"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json: Value = test::read_body_json(resp).await;
    assert!(json["message"].is_string());

    // Already registered: the backend's 409 becomes a 400
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({"email": USER_EMAIL, "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Missing password never reaches the backend
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({"email": "x@uninorte.edu.co", "password": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(
        fake.calls(),
        vec![
            Call::Signup("new@uninorte.edu.co".to_string()),
            Call::Signup(USER_EMAIL.to_string())
        ]
    );
}

#[actix_web::test]
async fn test_signup_backend_unavailable() {
    let (_, dynamic) = backend(FakeBackend::failing());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({"email": "new@uninorte.edu.co", "password": "pw"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_logout_forwards_verified_token() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        fake.calls(),
        vec![
            Call::Verify(VALID_TOKEN.to_string()),
            Call::Logout(VALID_TOKEN.to_string())
        ]
    );
}

#[actix_web::test]
async fn test_logout_backend_failure() {
    let (_, dynamic) = backend(FakeBackend::failing());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/auth/logout")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "error executing backend operation");
}
