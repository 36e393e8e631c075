//! CRUD endpoint tests.

mod common;

use actix_web::{http::StatusCode, test};
use common::{Call, FakeBackend, backend, bearer, metrics, test_config};
use roble_gateway::create_base_app;
use serde_json::{Value, json};

#[actix_web::test]
async fn test_crud_create() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let records = json!([{"name": "keyboard", "price": 120}]);
    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "create", "table": "products", "records": records}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["service"], "test-service");
    assert_eq!(json["operation"], "create");
    assert_eq!(json["table"], "products");
    assert_eq!(json["result"]["inserted"], records);
    assert!(json["timestamp"].is_string());

    assert_eq!(
        fake.table_calls(),
        vec![Call::Insert {
            table: "products".to_string(),
            records: records.as_array().cloned().unwrap(),
        }]
    );
}

#[actix_web::test]
async fn test_crud_read_returns_rows() {
    let rows = vec![json!({"_id": "1", "name": "mouse"})];
    let (fake, dynamic) = backend(FakeBackend::with_rows(rows.clone()));
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "read", "filters": {"name": "mouse"}}))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["table"], "usuarios");
    assert_eq!(json["result"], json!(rows));
    assert_eq!(
        fake.table_calls(),
        vec![Call::Read {
            table: "usuarios".to_string(),
            filters: json!({"name": "mouse"}).as_object().cloned(),
        }]
    );
}

#[actix_web::test]
async fn test_crud_update_forwards_fields() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({
            "operation": "update",
            "table": "products",
            "idColumn": "sku",
            "idValue": "SKU-9",
            "updates": {"price": 99}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        fake.table_calls(),
        vec![Call::Update {
            table: "products".to_string(),
            id_column: "sku".to_string(),
            id_value: json!("SKU-9"),
            updates: json!({"price": 99}),
        }]
    );
}

/// A missing idValue is not validated client-side; null goes to the backend.
#[actix_web::test]
async fn test_crud_update_without_id_value_forwards_null() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "update", "updates": {"name": "x"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        fake.table_calls(),
        vec![Call::Update {
            table: "usuarios".to_string(),
            id_column: "_id".to_string(),
            id_value: Value::Null,
            updates: json!({"name": "x"}),
        }]
    );
}

#[actix_web::test]
async fn test_crud_delete_defaults() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "delete", "idValue": 7}))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["operation"], "delete");
    assert_eq!(json["result"], json!({"deleted": 1}));

    assert_eq!(
        fake.table_calls(),
        vec![Call::Delete {
            table: "usuarios".to_string(),
            id_column: "_id".to_string(),
            id_value: json!(7),
        }]
    );
}

#[actix_web::test]
async fn test_crud_unknown_operation_is_rejected_without_backend_call() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    for body in [json!({"operation": "wipe"}), json!({}), json!({"operation": "CREATE"})] {
        let req = test::TestRequest::post()
            .uri("/api/crud")
            .insert_header(bearer())
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");

        let json: Value = test::read_body_json(resp).await;
        assert_eq!(json["error"], "invalid operation");
    }

    assert!(fake.table_calls().is_empty());
}

#[actix_web::test]
async fn test_crud_backend_failure_is_generic_500() {
    let (fake, dynamic) = backend(FakeBackend::failing());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "create", "records": [{"a": 1}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json, json!({"error": "error executing backend operation"}));
    assert_eq!(fake.table_calls().len(), 1);
}

/// Optional fields that are null or of the wrong type fall back to defaults
#[actix_web::test]
async fn test_crud_null_and_mistyped_fields_use_defaults() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "read", "table": null, "filters": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": "create", "table": "t", "records": "not-a-list"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        fake.table_calls(),
        vec![
            Call::Read {
                table: "usuarios".to_string(),
                filters: Some(serde_json::Map::new()),
            },
            Call::Insert {
                table: "t".to_string(),
                records: vec![],
            },
        ]
    );
}

#[actix_web::test]
async fn test_crud_non_string_operation_is_invalid() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .set_json(json!({"operation": ["read"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(fake.table_calls().is_empty());
}

#[actix_web::test]
async fn test_crud_non_json_body_is_bad_request() {
    let (fake, dynamic) = backend(FakeBackend::new());
    let app = test::init_service(create_base_app(test_config(), dynamic, metrics())).await;

    let req = test::TestRequest::post()
        .uri("/api/crud")
        .insert_header(bearer())
        .insert_header(("content-type", "application/json"))
        .set_payload("operation=read")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["error"], "invalid JSON body");
    assert!(fake.table_calls().is_empty());
}
