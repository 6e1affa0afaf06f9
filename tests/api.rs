//! The persons API, exercised in-process through `Router::handle`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use phonebook::api::{self, AppState};
use phonebook::store::{
    Contact, ContactDraft, ContactPatch, ContactStore, MemoryStore, Result, StoreError,
};
use phonebook::{Method, Request, Response, Router};

fn app() -> Router<AppState> {
    api::router(AppState::new(Arc::new(MemoryStore::new())))
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).expect("response body is JSON")
}

async fn create(app: &Router<AppState>, name: &str, number: &str) -> Value {
    let req = Request::new(Method::Post, "/api/persons")
        .with_json(&json!({ "name": name, "number": number }));
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 200, "{}", String::from_utf8_lossy(res.body()));
    json_body(&res)
}

async fn list(app: &Router<AppState>) -> Vec<Value> {
    let res = app.handle(Request::new(Method::Get, "/api/persons")).await;
    assert_eq!(res.status_code(), 200);
    serde_json::from_value(json_body(&res)).unwrap()
}

#[tokio::test]
async fn root_serves_greeting() {
    let res = app().handle(Request::new(Method::Get, "/")).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(!res.body().is_empty());
}

#[tokio::test]
async fn info_reports_contact_count() {
    let app = app();
    create(&app, "Ada", "123-4567").await;
    create(&app, "Grace", "040-123456").await;

    let res = app.handle(Request::new(Method::Get, "/info")).await;
    assert_eq!(res.status_code(), 200);
    let page = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(page.starts_with("<p>Phonebook has info for 2 people</p><p>"), "{page}");
}

#[tokio::test]
async fn create_then_get_round_trips_fields() {
    let app = app();
    let created = create(&app, "Ada Lovelace", "39-5323523").await;
    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());

    let res = app.handle(Request::new(Method::Get, &format!("/api/persons/{id}"))).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(
        json_body(&res),
        json!({ "id": id, "name": "Ada Lovelace", "number": "39-5323523" })
    );
}

#[tokio::test]
async fn create_with_missing_fields_is_rejected_without_storing() {
    let app = app();
    let bodies = [
        json!({ "name": "", "number": "123-4567" }),
        json!({ "name": "Ada", "number": "" }),
        json!({ "number": "123-4567" }),
        json!({ "name": "Ada" }),
        json!({}),
    ];
    for body in bodies {
        let req = Request::new(Method::Post, "/api/persons").with_json(&body);
        let res = app.handle(req).await;
        assert_eq!(res.status_code(), 400, "{body}");
        assert_eq!(json_body(&res), json!({ "error": "name or number missing" }));
    }
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_with_bad_number_returns_validation_message() {
    let app = app();
    let req = Request::new(Method::Post, "/api/persons")
        .with_json(&json!({ "name": "Ada", "number": "1234-56" }));
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 400);
    let error = json_body(&res)["error"].as_str().unwrap().to_owned();
    assert!(error.starts_with("Contact validation failed: number:"), "{error}");
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn create_with_unparseable_body_is_bad_request() {
    let req = Request::new(Method::Post, "/api/persons")
        .with_header("content-type", "application/json")
        .with_body("{\"name\": ");
    let res = app().handle(req).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({ "error": "malformatted request body" }));
}

#[tokio::test]
async fn every_listed_id_can_be_fetched() {
    let app = app();
    for (name, number) in [("Ada", "123-4567"), ("Grace", "040-123456"), ("Linus", "12345678")] {
        create(&app, name, number).await;
    }
    let contacts = list(&app).await;
    assert_eq!(contacts.len(), 3);
    for contact in contacts {
        let id = contact["id"].as_str().unwrap();
        let res = app.handle(Request::new(Method::Get, &format!("/api/persons/{id}"))).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(json_body(&res)["id"], id);
    }
}

#[tokio::test]
async fn get_with_malformed_id_is_bad_request() {
    let res = app().handle(Request::new(Method::Get, "/api/persons/not-an-id-shaped-string")).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({ "error": "malformatted id" }));
}

#[tokio::test]
async fn other_spellings_of_an_id_are_malformatted() {
    let app = app();
    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap();

    let variants = [id.replace('-', ""), format!("urn:uuid:{id}"), id.to_uppercase()];
    for variant in variants.into_iter().filter(|v| v != id) {
        let res = app.handle(Request::new(Method::Get, &format!("/api/persons/{variant}"))).await;
        assert_eq!(res.status_code(), 400, "{variant}");
        assert_eq!(json_body(&res), json!({ "error": "malformatted id" }));
    }
}

#[tokio::test]
async fn head_on_read_routes_has_no_body() {
    let app = app();
    create(&app, "Ada", "123-4567").await;

    for path in ["/", "/info", "/api/persons"] {
        let res = app.handle(Request::new(Method::Head, path)).await;
        assert_eq!(res.status_code(), 200, "{path}");
        assert!(res.body().is_empty(), "{path}");
    }
}

#[tokio::test]
async fn get_with_unknown_id_is_not_found() {
    let app = app();
    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap();
    app.handle(Request::new(Method::Delete, &format!("/api/persons/{id}"))).await;

    let res = app.handle(Request::new(Method::Get, &format!("/api/persons/{id}"))).await;
    assert_eq!(res.status_code(), 404);
    assert!(res.body().is_empty());
}

#[tokio::test]
async fn update_replaces_number() {
    let app = app();
    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap();

    let req = Request::new(Method::Put, &format!("/api/persons/{id}"))
        .with_json(&json!({ "name": "Ada", "number": "123-7654321" }));
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(json_body(&res), json!({ "id": id, "name": "Ada", "number": "123-7654321" }));
}

#[tokio::test]
async fn update_with_empty_number_leaves_record_unmodified() {
    let app = app();
    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap();

    for body in [json!({ "name": "Ada", "number": "" }), json!({ "name": "Ada" })] {
        let req = Request::new(Method::Put, &format!("/api/persons/{id}")).with_json(&body);
        let res = app.handle(req).await;
        assert_eq!(res.status_code(), 400);
        assert_eq!(json_body(&res), json!({ "error": "number missing" }));
    }

    let res = app.handle(Request::new(Method::Get, &format!("/api/persons/{id}"))).await;
    assert_eq!(json_body(&res), created);
}

#[tokio::test]
async fn update_with_invalid_number_is_validation_error() {
    let app = app();
    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap();

    let req = Request::new(Method::Put, &format!("/api/persons/{id}"))
        .with_json(&json!({ "number": "12-34" }));
    let res = app.handle(req).await;
    assert_eq!(res.status_code(), 400);
    assert!(json_body(&res)["error"].as_str().unwrap().contains("number:"));
    assert_eq!(list(&app).await, vec![created]);
}

#[tokio::test]
async fn update_with_malformed_or_unknown_id() {
    let app = app();
    let body = json!({ "number": "123-4567" });

    let res = app.handle(Request::new(Method::Put, "/api/persons/42").with_json(&body)).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({ "error": "malformatted id" }));

    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap().to_owned();
    app.handle(Request::new(Method::Delete, &format!("/api/persons/{id}"))).await;
    let res = app
        .handle(Request::new(Method::Put, &format!("/api/persons/{id}")).with_json(&body))
        .await;
    assert_eq!(res.status_code(), 404);
}

#[tokio::test]
async fn delete_is_idempotent_and_rejects_malformed_ids() {
    let app = app();
    let created = create(&app, "Ada", "123-4567").await;
    let path = format!("/api/persons/{}", created["id"].as_str().unwrap());

    for _ in 0..2 {
        let res = app.handle(Request::new(Method::Delete, &path)).await;
        assert_eq!(res.status_code(), 204);
        assert!(res.body().is_empty());
    }

    let res = app.handle(Request::new(Method::Delete, "/api/persons/xyz")).await;
    assert_eq!(res.status_code(), 400);
    assert_eq!(json_body(&res), json!({ "error": "malformatted id" }));
}

#[tokio::test]
async fn ada_lifecycle() {
    let app = app();
    assert!(list(&app).await.is_empty());

    let created = create(&app, "Ada", "123-4567").await;
    let id = created["id"].as_str().unwrap();

    assert_eq!(list(&app).await, vec![json!({ "id": id, "name": "Ada", "number": "123-4567" })]);

    let path = format!("/api/persons/{id}");
    assert_eq!(app.handle(Request::new(Method::Delete, &path)).await.status_code(), 204);
    assert_eq!(app.handle(Request::new(Method::Get, &path)).await.status_code(), 404);
}

#[tokio::test]
async fn unrouted_method_on_persons_is_not_allowed() {
    let res = app().handle(Request::new(Method::Patch, "/api/persons")).await;
    assert_eq!(res.status_code(), 405);
}

// ── Unclassified store failures ───────────────────────────────────────────────

/// A store whose every operation fails as if the database were unreachable.
struct DownStore;

#[async_trait]
impl ContactStore for DownStore {
    async fn list(&self) -> Result<Vec<Contact>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _id: &str) -> Result<Option<Contact>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn create(&self, _draft: ContactDraft) -> Result<Contact> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn update(&self, _id: &str, _patch: ContactPatch) -> Result<Option<Contact>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _id: &str) -> Result<bool> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn every_route_answers_500_when_the_store_is_down() {
    let app = api::router(AppState::new(Arc::new(DownStore)));
    let id = "0190a5c8-5b4e-7b3a-9c1d-2e3f4a5b6c7d";
    let body = json!({ "name": "Ada", "number": "123-4567" });
    let requests = [
        Request::new(Method::Get, "/info"),
        Request::new(Method::Get, "/api/persons"),
        Request::new(Method::Get, &format!("/api/persons/{id}")),
        Request::new(Method::Post, "/api/persons").with_json(&body),
        Request::new(Method::Put, &format!("/api/persons/{id}")).with_json(&body),
        Request::new(Method::Delete, &format!("/api/persons/{id}")),
    ];
    for req in requests {
        let path = req.path().to_owned();
        let res = app.handle(req).await;
        assert_eq!(res.status_code(), 500, "{path}");
        assert_eq!(json_body(&res), json!({ "error": "internal server error" }));
    }
}
