//! Property tests for the persons API over generated contacts.
//!
//! Each case builds a fresh in-memory app and drives it through
//! `Router::handle` on a current-thread runtime.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{Value, json};

use phonebook::api::{self, AppState};
use phonebook::store::MemoryStore;
use phonebook::{Method, Request, Response, Router};

// ── Strategies ────────────────────────────────────────────────────────────────

/// Names with at least one visible character.
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z .'-]{0,30}"
}

/// Numbers the schema accepts: plain digits, or a 2-3 digit prefix and a
/// hyphen, always at least 8 characters.
fn number_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{8,15}",
        "[0-9]{2}-[0-9]{5,12}",
        "[0-9]{3}-[0-9]{4,12}",
    ]
}

fn contacts_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((name_strategy(), number_strategy()), 1..8)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn app() -> Router<AppState> {
    api::router(AppState::new(Arc::new(MemoryStore::new())))
}

fn json_body(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap_or(Value::Null)
}

async fn post(app: &Router<AppState>, body: Value) -> Response {
    app.handle(Request::new(Method::Post, "/api/persons").with_json(&body)).await
}

async fn get(app: &Router<AppState>, id: &str) -> Response {
    app.handle(Request::new(Method::Get, &format!("/api/persons/{id}"))).await
}

async fn list(app: &Router<AppState>) -> Vec<Value> {
    let res = app.handle(Request::new(Method::Get, "/api/persons")).await;
    serde_json::from_value(json_body(&res)).unwrap_or_default()
}

async fn seed(app: &Router<AppState>, contacts: &[(String, String)]) -> Vec<Value> {
    let mut created = Vec::with_capacity(contacts.len());
    for (name, number) in contacts {
        created.push(json_body(&post(app, json!({ "name": name, "number": number })).await));
    }
    created
}

// ── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn create_then_get_returns_the_same_fields(name in name_strategy(), number in number_strategy()) {
        let (status, created, fetched) = block_on(async {
            let app = app();
            let res = post(&app, json!({ "name": name, "number": number })).await;
            let created = json_body(&res);
            let id = created["id"].as_str().unwrap_or_default().to_owned();
            (res.status_code(), created, json_body(&get(&app, &id).await))
        });

        prop_assert_eq!(status, 200);
        prop_assert!(!created["id"].as_str().unwrap_or_default().is_empty());
        prop_assert_eq!(&created["name"], &json!(name));
        prop_assert_eq!(&created["number"], &json!(number));
        prop_assert_eq!(fetched, created);
    }

    #[test]
    fn every_listed_id_round_trips(contacts in contacts_strategy()) {
        let (created, listed, fetched) = block_on(async {
            let app = app();
            let created = seed(&app, &contacts).await;
            let listed = list(&app).await;
            let mut fetched = Vec::new();
            for contact in &listed {
                let id = contact["id"].as_str().unwrap_or_default();
                let res = get(&app, id).await;
                fetched.push((res.status_code(), json_body(&res)));
            }
            (created, listed, fetched)
        });

        prop_assert_eq!(&listed, &created);
        for ((status, body), contact) in fetched.into_iter().zip(&listed) {
            prop_assert_eq!(status, 200);
            prop_assert_eq!(&body["id"], &contact["id"]);
            prop_assert_eq!(&body, contact);
        }
    }

    #[test]
    fn create_with_an_empty_field_stores_nothing(
        contacts in contacts_strategy(),
        name in name_strategy(),
        number in number_strategy(),
        blank_name in any::<bool>(),
    ) {
        let body = if blank_name {
            json!({ "name": "", "number": number })
        } else {
            json!({ "name": name, "number": "" })
        };
        let (before, status, error, after) = block_on(async {
            let app = app();
            seed(&app, &contacts).await;
            let before = list(&app).await.len();
            let res = post(&app, body).await;
            (before, res.status_code(), json_body(&res), list(&app).await.len())
        });

        prop_assert_eq!(status, 400);
        prop_assert_eq!(error, json!({ "error": "name or number missing" }));
        prop_assert_eq!(after, before);
    }

    #[test]
    fn update_with_empty_number_leaves_the_record(
        contacts in contacts_strategy(),
        pick in any::<prop::sample::Index>(),
        new_name in name_strategy(),
    ) {
        let (created, status, stored) = block_on(async {
            let app = app();
            let created = seed(&app, &contacts).await;
            let target = created[pick.index(created.len())].clone();
            let id = target["id"].as_str().unwrap_or_default().to_owned();
            let req = Request::new(Method::Put, &format!("/api/persons/{id}"))
                .with_json(&json!({ "name": new_name, "number": "" }));
            let status = app.handle(req).await.status_code();
            (created, status, list(&app).await)
        });

        prop_assert_eq!(status, 400);
        prop_assert_eq!(stored, created);
    }
}
