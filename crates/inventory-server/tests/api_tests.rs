use application::InventoryService;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use domain::{Inventory, RegistryPolicy};
use infrastructure::{MemoryInventoryStore, seed::sample_inventory};
use inventory_server::{api::create_router, state::AppState};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(inventory: Inventory) -> Router {
    let service = InventoryService::new(
        inventory,
        Arc::new(MemoryInventoryStore::new()),
        RegistryPolicy::default(),
    );
    create_router(AppState::shared(service))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_device_lifecycle() {
    let app = app_with(Inventory::new());

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/devices",
        Some(json!({ "name": "Camera A", "simCard": "SIM-1", "deviceType": "camera" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["status"], "active");
    assert_eq!(created["history"], json!([]));

    let (status, fetched) = send(&app, Method::GET, "/api/devices/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/api/devices/1",
        Some(json!({ "name": "Camera B", "firmware": "1.2.0" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Camera B");
    assert_eq!(updated["firmware"], "1.2.0");

    let (status, toggled) = send(&app, Method::POST, "/api/devices/1/toggle-status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "inactive");

    let (status, _) = send(&app, Method::DELETE, "/api/devices/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/devices/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_validation_and_conflict_errors() {
    let app = app_with(Inventory::new());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/devices",
        Some(json!({ "name": "Meter", "simCard": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert_eq!(body["field"], "simCard");

    send(
        &app,
        Method::POST,
        "/api/devices",
        Some(json!({ "name": "Meter", "simCard": "SIM-9" })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/devices",
        Some(json!({ "name": "Tracker", "simCard": "SIM-9" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["conflictsWith"], json!({ "id": 1, "name": "Meter" }));

    let (status, _) = send(&app, Method::DELETE, "/api/devices/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_sim_history_and_ledger() {
    let app = app_with(Inventory::new());

    for (name, sim) in [("A", "X"), ("B", "Y")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/devices",
            Some(json!({ "name": name, "simCard": sim })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::PUT, "/api/devices/2/sim", Some(json!({ "newSim": "X" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflictsWith"]["name"], "A");

    let (status, device) = send(&app, Method::PUT, "/api/devices/1/sim", Some(json!({ "newSim": "Z" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(device["simCard"], "Z");

    let (status, _) = send(&app, Method::PUT, "/api/devices/2/sim", Some(json!({ "newSim": "X" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, history) = send(&app, Method::GET, "/api/devices/1/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history[0]["oldSim"], "X");
    assert_eq!(history[0]["newSim"], "Z");

    let (status, ledger) = send(&app, Method::GET, "/api/sim-ledger?sim=X", None).await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<_> = ledger
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, ["assigned", "removed", "assigned"]);
    assert_eq!(ledger[0]["toDevice"]["name"], "A");
    assert_eq!(ledger[1]["fromDevice"]["name"], "A");
    assert_eq!(ledger[1]["toDevice"], Value::Null);
    assert_eq!(ledger[2]["toDevice"]["name"], "B");

    let (_, full) = send(&app, Method::GET, "/api/sim-ledger", None).await;
    assert_eq!(full.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_listing_filters_stats_and_facets() {
    let app = app_with(sample_inventory().unwrap());

    let (_, all) = send(&app, Method::GET, "/api/devices", None).await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, active) = send(&app, Method::GET, "/api/devices?status=active&sort=name", None).await;
    let names: Vec<_> = active
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "POS Terminal - Store #3",
            "Security Camera - Front Door",
            "Smart Meter - Floor 2",
        ]
    );

    let (_, found) = send(&app, Method::GET, "/api/devices?search=sim-7890", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["name"], "Smart Meter - Floor 2");

    let (_, trackers) = send(&app, Method::GET, "/api/devices?deviceType=tracker", None).await;
    assert_eq!(trackers.as_array().unwrap().len(), 1);

    let (status, stats) = send(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({ "total": 5, "active": 3, "inactive": 1, "warning": 1, "withHistory": 3 })
    );

    let (_, facets) = send(&app, Method::GET, "/api/facets", None).await;
    assert_eq!(facets["statuses"], json!(["active", "inactive", "warning"]));
    assert_eq!(facets["deviceTypes"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_device_type_endpoints() {
    let app = app_with(Inventory::new());

    let (status, created) = send(&app, Method::POST, "/api/device-types", Some(json!({ "name": "Tablet" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_u64().unwrap();

    let (status, _) = send(&app, Method::POST, "/api/device-types", Some(json!({ "name": "Tablet" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, renamed) = send(
        &app,
        Method::PUT,
        &format!("/api/device-types/{}", id),
        Some(json!({ "name": "Push To Talk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Push To Talk");

    let (_, types) = send(&app, Method::GET, "/api/device-types", None).await;
    let other_id = types[0]["id"].as_u64().unwrap();
    assert_eq!(types[0]["name"], "other");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/device-types/{}", other_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["conflictsWith"]["name"], "other");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/device-types/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/device-types/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_query_parameters_mean_no_filter() {
    let app = app_with(sample_inventory().unwrap());

    let (status, all) = send(&app, Method::GET, "/api/devices?status=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (status, all) = send(&app, Method::GET, "/api/devices?status=&sort=&deviceType=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (status, ledger) = send(&app, Method::GET, "/api/sim-ledger?sim=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ledger.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let app = app_with(Inventory::new());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/devices")
        .header("content-type", "application/json")
        .body(Body::from("{ \"name\": \"Camera\", "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "validation");
    assert_eq!(body["field"], "body");

    let (status, body) = send(&app, Method::GET, "/api/devices?status=broken", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "query");

    let (status, body) = send(&app, Method::GET, "/api/devices/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert_eq!(body["field"], "path");
}
