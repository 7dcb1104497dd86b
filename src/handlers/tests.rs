use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bcrypt::hash;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use crate::config::UserEntry;
use crate::models::Role;
use crate::services::testing::{hashcat_tool, StubConnector, HASHCAT_ID};
use crate::services::{Lifecycle, LocalQueue, SessionStore, StaticAuthenticator};
use super::AppState;

fn user(username: &str, role: Role) -> UserEntry {
    UserEntry {
        username: username.into(),
        password_hash: hash("pw", 4).unwrap(),
        role,
    }
}

fn test_app() -> Router {
    let authenticator = StaticAuthenticator::new(vec![
        user("alice", Role::Standard),
        user("root", Role::Administrator),
        user("viewer", Role::ReadOnly),
    ]);
    let queue = LocalQueue::new(Arc::new(StubConnector::new(vec![hashcat_tool()])), 100);
    let state = AppState::new(
        SessionStore::new(None),
        Arc::new(authenticator),
        Lifecycle::new(Arc::new(queue)),
    );
    crate::app(state, 64 * 1024)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("AuthorizationToken", token);
    }
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };

    let response = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(app, Method::POST, "/api/login", None, Some(json!({"username": username, "password": "pw"}))).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn add_resource(app: &Router, admin: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/resources",
        Some(admin),
        Some(json!({"address": "10.0.0.5:9443", "name": "gpu-1", "key": "k"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(app, Method::GET, "/api/resources", Some(admin), None).await;
    body["resources"][0]["id"].as_str().unwrap().to_string()
}

async fn add_job(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/jobs",
        Some(token),
        Some(json!({
            "toolId": HASHCAT_ID,
            "name": "ntlm",
            "params": {"hashmode": "1000", "hashes": "8846f7eaee8fb117ad06bdd830b7586c"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["jobid"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_then_list_tools() {
    let app = test_app();
    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(json!({"username": "alice", "password": "pw"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "OK");
    assert_eq!(body["role"], "Standard");
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let root = login(&app, "root").await;
    add_resource(&app, &root).await;

    let (status, body) = send(&app, Method::GET, "/api/tools", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tools"], json!([{"id": HASHCAT_ID, "name": "hashcat", "version": "6.2"}]));
}

#[tokio::test]
async fn test_login_failures() {
    let app = test_app();
    let (status, wrong) = send(&app, Method::POST, "/api/login", None, Some(json!({"username": "alice", "password": "x"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown) = send(&app, Method::POST, "/api/login", None, Some(json!({"username": "mallory", "password": "pw"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);

    let (status, body) = send(&app, Method::POST, "/api/login", None, Some(json!({"user": "alice"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_logout_invalidates_token_and_is_idempotent() {
    let app = test_app();
    let token = login(&app, "alice").await;

    let (status, _) = send(&app, Method::GET, "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/api/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/jobs", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_forged_token_is_unauthorized_everywhere() {
    let app = test_app();
    let root = login(&app, "root").await;
    let rid = add_resource(&app, &root).await;
    let jid = add_job(&app, &root).await;

    let job_uri = format!("/api/jobs/{}", jid);
    let res_uri = format!("/api/resources/{}", rid);
    let tool_uri = format!("/api/tools/{}", HASHCAT_ID);
    let calls: Vec<(Method, &str, Option<Value>)> = vec![
        (Method::GET, "/api/tools", None),
        (Method::GET, tool_uri.as_str(), None),
        (Method::GET, "/api/jobs", None),
        (Method::POST, "/api/jobs", Some(json!({"toolId": HASHCAT_ID, "name": "x", "params": {}}))),
        (Method::GET, job_uri.as_str(), None),
        (Method::PUT, job_uri.as_str(), Some(json!({"status": "quit"}))),
        (Method::DELETE, job_uri.as_str(), None),
        (Method::GET, "/api/resources", None),
        (Method::POST, "/api/resources", Some(json!({"address": "a:1", "name": "n", "key": "k"}))),
        (Method::GET, res_uri.as_str(), None),
        (Method::PUT, res_uri.as_str(), Some(json!({"status": "pause"}))),
        (Method::DELETE, res_uri.as_str(), None),
    ];

    for token in [None, Some("forged")] {
        for (method, uri, body) in &calls {
            let (status, env) = send(&app, method.clone(), uri, token, body.clone()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(env["status"], 401);
        }
    }

    // nothing changed
    let (_, body) = send(&app, Method::GET, &job_uri, Some(&root), None).await;
    assert_eq!(body["job"]["status"], "running");
    let (_, body) = send(&app, Method::GET, "/api/jobs", Some(&root), None).await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
    let (_, body) = send(&app, Method::GET, &res_uri, Some(&root), None).await;
    assert_eq!(body["resource"]["status"], "running");
}

#[tokio::test]
async fn test_gate_runs_before_body_decoding() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/jobs")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_standard_user_cannot_manage_resources() {
    let app = test_app();
    let root = login(&app, "root").await;
    let alice = login(&app, "alice").await;
    let rid = add_resource(&app, &root).await;
    let res_uri = format!("/api/resources/{}", rid);

    let (status, _) = send(&app, Method::POST, "/api/resources", Some(&alice), Some(json!({"address": "a:1", "name": "n", "key": "k"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, Method::PUT, &res_uri, Some(&alice), Some(json!({"status": "pause"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, Method::DELETE, &res_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // she can still read them
    let (status, body) = send(&app, Method::GET, "/api/resources", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let resources = body["resources"].as_array().unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["status"], "running");
    assert!(resources[0].get("key").is_none());
}

#[tokio::test]
async fn test_read_only_user_can_only_read_jobs() {
    let app = test_app();
    let root = login(&app, "root").await;
    let viewer = login(&app, "viewer").await;
    add_resource(&app, &root).await;
    let jid = add_job(&app, &root).await;

    let (status, _) = send(&app, Method::GET, "/api/jobs", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/api/jobs/{}", jid), Some(&viewer), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/tools", Some(&viewer), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, Method::PUT, &format!("/api/jobs/{}", jid), Some(&viewer), Some(json!({"status": "pause"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_job_round_trip() {
    let app = test_app();
    let root = login(&app, "root").await;
    let alice = login(&app, "alice").await;
    let rid = add_resource(&app, &root).await;
    let jid = add_job(&app, &alice).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/jobs/{}", jid), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let job = &body["job"];
    assert_eq!(job["id"], jid.as_str());
    assert_eq!(job["name"], "ntlm");
    assert_eq!(job["owner"], "alice");
    assert_eq!(job["toolId"], HASHCAT_ID);
    assert_eq!(job["status"], "running");
    assert_eq!(job["resourceId"], rid.as_str());
    assert_eq!(job["params"], json!({"hashmode": "1000", "hashes": "8846f7eaee8fb117ad06bdd830b7586c"}));
    assert_eq!(job["crackedHashes"], 0);
    assert!(job["startTime"].is_string());
    assert!(job.get("outputData").is_some());
}

#[tokio::test]
async fn test_create_job_with_unknown_tool() {
    let app = test_app();
    let root = login(&app, "root").await;
    add_resource(&app, &root).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/jobs",
        Some(&root),
        Some(json!({"toolId": "nope", "name": "x", "params": {}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (_, body) = send(&app, Method::GET, "/api/jobs", Some(&root), None).await;
    assert!(body["jobs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_pause_of_quit_job_is_error() {
    let app = test_app();
    let root = login(&app, "root").await;
    add_resource(&app, &root).await;
    let jid = add_job(&app, &root).await;
    let uri = format!("/api/jobs/{}", jid);

    let (status, body) = send(&app, Method::PUT, &uri, Some(&root), Some(json!({"status": "quit"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "quit");

    let (status, body) = send(&app, Method::PUT, &uri, Some(&root), Some(json!({"status": "pause"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    // detail is not echoed
    assert_eq!(body["message"], "Internal Server Error");

    let (_, body) = send(&app, Method::GET, &uri, Some(&root), None).await;
    assert_eq!(body["job"]["status"], "quit");
}

#[tokio::test]
async fn test_unrecognized_job_status_is_noop() {
    let app = test_app();
    let root = login(&app, "root").await;
    add_resource(&app, &root).await;
    let jid = add_job(&app, &root).await;

    let (status, body) = send(&app, Method::PUT, &format!("/api/jobs/{}", jid), Some(&root), Some(json!({"status": "explode"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["status"], "running");
}

#[tokio::test]
async fn test_delete_job() {
    let app = test_app();
    let root = login(&app, "root").await;
    add_resource(&app, &root).await;
    let jid = add_job(&app, &root).await;
    let uri = format!("/api/jobs/{}", jid);

    // running jobs must be stopped first
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    send(&app, Method::PUT, &uri, Some(&root), Some(json!({"status": "quit"}))).await;
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resource_pause_resume_idempotent() {
    let app = test_app();
    let root = login(&app, "root").await;
    let rid = add_resource(&app, &root).await;
    let uri = format!("/api/resources/{}", rid);

    for expected in ["paused", "paused"] {
        let (status, body) = send(&app, Method::PUT, &uri, Some(&root), Some(json!({"status": "pause"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resource"]["status"], expected);
    }
    for expected in ["running", "running"] {
        let (status, body) = send(&app, Method::PUT, &uri, Some(&root), Some(json!({"status": "resume"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resource"]["status"], expected);
    }
}

#[tokio::test]
async fn test_delete_resource_with_active_job() {
    let app = test_app();
    let root = login(&app, "root").await;
    let rid = add_resource(&app, &root).await;
    add_job(&app, &root).await;
    let uri = format!("/api/resources/{}", rid);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(&app, Method::GET, &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resource"]["id"], rid.as_str());
}

#[tokio::test]
async fn test_unknown_records_are_not_found() {
    let app = test_app();
    let root = login(&app, "root").await;

    let (status, body) = send(&app, Method::GET, "/api/jobs/missing", Some(&root), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    let (status, _) = send(&app, Method::GET, "/api/resources/missing", Some(&root), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/tools/missing", Some(&root), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_tool_detail() {
    let app = test_app();
    let root = login(&app, "root").await;
    add_resource(&app, &root).await;

    let (status, body) = send(&app, Method::GET, &format!("/api/tools/{}", HASHCAT_ID), Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tool"]["name"], "hashcat");
    assert_eq!(body["tool"]["form"], json!(["hashmode", "hashes"]));
    assert_eq!(body["tool"]["schema"]["required"], json!(["hashmode", "hashes"]));
}

#[tokio::test]
async fn test_malformed_resource_request() {
    let app = test_app();
    let root = login(&app, "root").await;

    let (status, _) = send(&app, Method::POST, "/api/resources", Some(&root), Some(json!({"address": "a:1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, body) = send(&app, Method::GET, "/api/resources", Some(&root), None).await;
    assert!(body["resources"].as_array().unwrap().is_empty());
}
