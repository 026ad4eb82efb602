//! Menu API tests driven through the full router

mod common;

use std::sync::atomic::Ordering;

use axum::body::Body;
use common::{MemoryStore, get, ready_state, send, send_request, test_config};
use http::{Request, StatusCode};
use menu_server::ServerState;
use menu_server::api::build_app;
use serde_json::{Value, json};

fn soup() -> Value {
    json!({
        "name": "Soup",
        "description": "Tomato soup",
        "category": "Starter",
        "price": 4.50,
        "isVegetarian": true
    })
}

fn steak() -> Value {
    json!({
        "name": "Steak",
        "description": "Grilled sirloin",
        "category": "Main",
        "price": "21.90"
    })
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn menu_routes_answer_503_until_ready() {
    let state = ServerState::new(test_config());
    let app = build_app(state);

    for uri in ["/api/menu", "/api/menu/search?q=soup"] {
        let res = get(&app, uri).await;
        assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE, "{uri}");
        assert_eq!(res.body["code"], 9006);
        assert_eq!(res.headers["retry-after"], "5");
    }

    let res = send(&app, "POST", "/api/menu", Some(soup())).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);

    // Validation does not run before the readiness gate
    let res = get(&app, "/api/menu/not-a-uuid").await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_reports_readiness() {
    let app = build_app(ServerState::new(test_config()));
    let res = get(&app, "/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["connected"], false);
    assert_eq!(res.body["schemaReady"], false);
    assert_eq!(res.body["phase"], "disconnected");

    let app = build_app(ready_state(MemoryStore::new()).await);
    let res = get(&app, "/health").await;
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["connected"], true);
    assert_eq!(res.body["schemaReady"], true);
    assert_eq!(res.body["attempts"], 1);
}

#[tokio::test]
async fn create_then_search_soup() {
    let store = MemoryStore::new();
    let app = build_app(ready_state(store.clone()).await);

    let res = send(&app, "POST", "/api/menu", Some(soup())).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let created = res.body;
    assert!(created["id"].as_str().is_some());
    assert_eq!(created["price"], 4.5);
    assert_eq!(created["isVegetarian"], true);
    assert_eq!(created["createdAt"], created["updatedAt"]);

    send(&app, "POST", "/api/menu", Some(steak())).await;

    let lower = get(&app, "/api/menu/search?q=soup").await;
    assert_eq!(lower.status, StatusCode::OK);
    assert_eq!(lower.body.as_array().unwrap().len(), 1);
    assert_eq!(lower.body[0], created);

    let upper = get(&app, "/api/menu/search?q=SOUP").await;
    assert_eq!(upper.body, lower.body);

    // Category matches too
    let main = get(&app, "/api/menu/search?q=main").await;
    assert_eq!(names(&main.body), vec!["Steak"]);

    let none = get(&app, "/api/menu/search?q=pizza").await;
    assert_eq!(none.status, StatusCode::OK);
    assert_eq!(none.body, json!([]));
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn blank_search_equals_listing() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    send(&app, "POST", "/api/menu", Some(soup())).await;
    send(&app, "POST", "/api/menu", Some(steak())).await;

    let listing = get(&app, "/api/menu").await;
    assert_eq!(names(&listing.body), vec!["Soup", "Steak"]);

    for uri in ["/api/menu/search", "/api/menu/search?q=", "/api/menu/search?q=%20%20"] {
        let res = get(&app, uri).await;
        assert_eq!(res.status, StatusCode::OK, "{uri}");
        assert_eq!(res.body, listing.body, "{uri}");
    }
}

#[tokio::test]
async fn get_by_id_and_not_found() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let created = send(&app, "POST", "/api/menu", Some(soup())).await.body;
    let id = created["id"].as_str().unwrap();

    let res = get(&app, &format!("/api/menu/{id}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, created);

    let missing = uuid::Uuid::new_v4();
    let res = get(&app, &format!("/api/menu/{missing}")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], 6001);
    assert_eq!(res.body["details"]["id"], missing.to_string());
}

#[tokio::test]
async fn malformed_id_is_rejected_before_storage() {
    let store = MemoryStore::new();
    let app = build_app(ready_state(store.clone()).await);
    let before = store.calls.load(Ordering::SeqCst);

    for method in ["GET", "DELETE"] {
        let res = send(&app, method, "/api/menu/not-a-uuid", None).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(res.body["code"], 2);
    }
    let res = send(&app, "PUT", "/api/menu/42", Some(soup())).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    assert_eq!(store.calls.load(Ordering::SeqCst), before);
}

#[tokio::test]
async fn update_keeps_identity_and_refreshes_timestamp() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let created = send(&app, "POST", "/api/menu", Some(soup())).await.body;
    let id = created["id"].as_str().unwrap();

    let mut changed = soup();
    changed["name"] = json!("Gazpacho");
    changed["price"] = json!("5.25");
    changed["isVegetarian"] = json!(false);

    let res = send(&app, "PUT", &format!("/api/menu/{id}"), Some(changed)).await;
    assert_eq!(res.status, StatusCode::OK);
    let updated = res.body;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
    assert_eq!(updated["name"], "Gazpacho");
    assert_eq!(updated["price"], 5.25);
    assert_eq!(updated["isVegetarian"], false);

    let fetched = get(&app, &format!("/api/menu/{id}")).await.body;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let store = MemoryStore::new();
    let app = build_app(ready_state(store.clone()).await);

    let missing = uuid::Uuid::new_v4();
    let res = send(&app, "PUT", &format!("/api/menu/{missing}"), Some(soup())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], 6001);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn delete_removes_item() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let created = send(&app, "POST", "/api/menu", Some(soup())).await.body;
    let id = created["id"].as_str().unwrap();

    let res = send(&app, "DELETE", &format!("/api/menu/{id}"), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["deleted"], id);

    let res = get(&app, &format!("/api/menu/{id}")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = send(&app, "DELETE", &format!("/api/menu/{id}"), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    assert_eq!(get(&app, "/api/menu").await.body, json!([]));
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let store = MemoryStore::new();
    let app = build_app(ready_state(store.clone()).await);

    let mut missing_name = soup();
    missing_name.as_object_mut().unwrap().remove("name");
    let res = send(&app, "POST", "/api/menu", Some(missing_name)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], 2);
    assert_eq!(res.body["message"], "name must not be empty");

    let mut bad_price = soup();
    bad_price["price"] = json!("cheap");
    let res = send(&app, "POST", "/api/menu", Some(bad_price)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], 6002);

    let res = send(&app, "POST", "/api/menu", Some(json!("not an object"))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], 5);

    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn client_supplied_id_is_ignored() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let fixed = uuid::Uuid::new_v4().to_string();
    let mut body = soup();
    body["id"] = json!(fixed);

    let created = send(&app, "POST", "/api/menu", Some(body)).await.body;
    assert_ne!(created["id"], fixed);
}

#[tokio::test]
async fn negative_price_is_accepted() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let mut body = soup();
    body["price"] = json!(-1.5);

    let res = send(&app, "POST", "/api/menu", Some(body)).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["price"], -1.5);
}

#[tokio::test]
async fn storage_failure_is_500() {
    let store = MemoryStore::new();
    let app = build_app(ready_state(store.clone()).await);
    store.failing.store(true, Ordering::SeqCst);

    let res = get(&app, "/api/menu").await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["code"], 9002);
}

#[tokio::test]
async fn price_errors_have_their_own_code() {
    let store = MemoryStore::new();
    let app = build_app(ready_state(store.clone()).await);
    let created = send(&app, "POST", "/api/menu", Some(soup())).await.body;
    let id = created["id"].as_str().unwrap();

    let mut no_price = soup();
    no_price.as_object_mut().unwrap().remove("price");
    let res = send(&app, "POST", "/api/menu", Some(no_price)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], 6002);
    assert_eq!(res.body["message"], "price must not be empty");

    let mut bad_price = soup();
    bad_price["price"] = json!(true);
    let res = send(&app, "PUT", &format!("/api/menu/{id}"), Some(bad_price)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], 6002);

    assert_eq!(get(&app, &format!("/api/menu/{id}")).await.body, created);
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let res = get(&app, "/health").await;
    let id = res.headers["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok(), "{id}");
}

#[tokio::test]
async fn client_request_id_is_echoed_unchanged() {
    let app = build_app(ready_state(MemoryStore::new()).await);
    let request = Request::builder()
        .uri("/api/menu")
        .header("x-request-id", "trace-abc-123")
        .body(Body::empty())
        .unwrap();

    let res = send_request(&app, request).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["x-request-id"], "trace-abc-123");
}

#[tokio::test]
async fn static_client_is_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Menu</h1>").unwrap();

    let mut config = test_config();
    config.static_dir = dir.path().to_string_lossy().into_owned();
    let app = build_app(ServerState::new(config));

    let res = get(&app, "/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "<h1>Menu</h1>");

    let res = get(&app, "/missing.js").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
