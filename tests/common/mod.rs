//! Local stand-ins for the IP echo service and the Cloudflare API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

/// A zone `Z1` for `example.com`, optionally holding `home.example.com` as `R1`.
pub struct FakeCloudflare {
    pub existing_record: bool,
    /// Method and path (with query) of every API request, in order.
    pub calls: Mutex<Vec<String>>,
    /// JSON bodies sent with create and update requests.
    pub bodies: Mutex<Vec<Value>>,
}

impl FakeCloudflare {
    pub fn new(existing_record: bool) -> Arc<Self> {
        Arc::new(Self {
            existing_record,
            calls: Mutex::new(Vec::new()),
            bodies: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

type Shared = Arc<FakeCloudflare>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn auth_error() -> Json<Value> {
    Json(json!({
        "success": false,
        "errors": [
            {"code": 10000, "message": "Authentication error"},
            {"code": 9109, "message": "Invalid access token"}
        ],
        "messages": [],
        "result": null
    }))
}

fn ok(result: Value) -> Json<Value> {
    Json(json!({"success": true, "errors": [], "messages": [], "result": result}))
}

fn sorted_query(query: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    pairs.join("&")
}

async fn list_zones(
    State(cf): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    cf.record(format!("GET /zones?{}", sorted_query(&query)));
    if !authorized(&headers) {
        return auth_error();
    }

    match query.get("name").map(String::as_str) {
        Some("example.com") => ok(json!([{"id": "Z1", "name": "example.com"}])),
        Some("no-id.example") => ok(json!([{"name": "no-id.example"}])),
        _ => ok(json!([])),
    }
}

async fn list_records(
    State(cf): State<Shared>,
    headers: HeaderMap,
    Path(zone_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    cf.record(format!(
        "GET /zones/{}/dns_records?{}",
        zone_id,
        sorted_query(&query)
    ));
    if !authorized(&headers) {
        return auth_error();
    }

    let matches = cf.existing_record
        && zone_id == "Z1"
        && query.get("name").map(String::as_str) == Some("home.example.com")
        && query.get("type").map(String::as_str) == Some("A");

    if matches {
        ok(json!([{
            "id": "R1",
            "name": "home.example.com",
            "type": "A",
            "content": "198.51.100.1"
        }]))
    } else {
        ok(json!([]))
    }
}

async fn create_record(
    State(cf): State<Shared>,
    headers: HeaderMap,
    Path(zone_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    cf.record(format!("POST /zones/{}/dns_records", zone_id));
    cf.bodies.lock().unwrap().push(body.clone());
    if !authorized(&headers) {
        return auth_error();
    }

    ok(json!({
        "id": "R2",
        "name": body["name"],
        "type": body["type"],
        "content": body["content"]
    }))
}

async fn update_record(
    State(cf): State<Shared>,
    headers: HeaderMap,
    Path((zone_id, record_id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Json<Value> {
    cf.record(format!("PUT /zones/{}/dns_records/{}", zone_id, record_id));
    cf.bodies.lock().unwrap().push(body.clone());
    if !authorized(&headers) {
        return auth_error();
    }

    ok(json!({
        "id": record_id,
        "name": body["name"],
        "type": body["type"],
        "content": body["content"]
    }))
}

/// Writes that succeed without echoing the record back.
async fn write_without_result(State(cf): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    cf.record("WRITE without result".to_string());
    cf.bodies.lock().unwrap().push(body);
    Json(json!({"success": true, "errors": null}))
}

async fn ip_echo() -> Json<Value> {
    Json(json!({"status": "success", "query": "203.0.113.7"}))
}

async fn ip_echo_bogus() -> Json<Value> {
    Json(json!({"status": "success", "query": "203.0.113.700"}))
}

async fn not_json() -> &'static str {
    "upstream exploded"
}

pub fn router(cf: Shared) -> Router {
    Router::new()
        .route("/json", get(ip_echo))
        .route("/json-bogus", get(ip_echo_bogus))
        .route("/text", get(not_json))
        .route("/client/v4/zones", get(list_zones))
        .route(
            "/client/v4/zones/{zone_id}/dns_records",
            get(list_records).post(create_record),
        )
        .route(
            "/client/v4/zones/{zone_id}/dns_records/{record_id}",
            axum::routing::put(update_record),
        )
        .route("/broken/zones", get(not_json))
        .route(
            "/bare/zones/{zone_id}/dns_records",
            axum::routing::post(write_without_result),
        )
        .route(
            "/bare/zones/{zone_id}/dns_records/{record_id}",
            axum::routing::put(write_without_result),
        )
        .with_state(cf)
}

/// Serves the fakes on an ephemeral port and returns `http://127.0.0.1:<port>`.
pub async fn serve(cf: Shared) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router(cf)).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Config YAML aimed at a server started with [`serve`].
pub fn config_yaml(base: &str, extra: &str) -> String {
    format!(
        "jsonIPService: \"{base}/json\"\n\
         jsonQuery: \"query\"\n\
         accessToken: \"{TOKEN}\"\n\
         domain: \"example.com\"\n\
         recordName: \"home.example.com\"\n\
         recordType: \"A\"\n\
         apiBase: \"{base}/client/v4\"\n\
         {extra}"
    )
}
