//! End-to-end tests for the HTTP surface, driven in-process through the axum router.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fi_mcp::config::ServerConfig;
use fi_mcp::transport::HttpTransport;

// ─────────────────────── helpers ───────────────────────

const PHONE: &str = "2222222222";

/// Write `<root>/<phone>/<tool>.json`.
fn write_fixture(root: &Path, phone: &str, tool: &str, body: &str) {
    let dir = root.join(phone);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{tool}.json")), body).unwrap();
}

/// Net worth fixture shaped like the real test data.
fn net_worth_fixture() -> Value {
    json!({
        "netWorthResponse": {
            "assetValues": [
                { "netWorthAttribute": "ASSET_TYPE_MUTUAL_FUND", "value": { "currencyCode": "INR", "units": "84642" } },
                { "netWorthAttribute": "ASSET_TYPE_EPF", "value": { "currencyCode": "INR", "units": "211111" } }
            ],
            "liabilityValues": [],
            "totalNetWorthValue": { "currencyCode": "INR", "units": "295753" }
        }
    })
}

/// Build an app over a temp fixture root holding one complete-ish profile.
fn test_app(dir: &tempfile::TempDir) -> Router {
    write_fixture(
        dir.path(),
        PHONE,
        "fetch_net_worth",
        &serde_json::to_string_pretty(&net_worth_fixture()).unwrap(),
    );
    write_fixture(dir.path(), PHONE, "fetch_credit_report", "{ broken");
    std::fs::create_dir_all(dir.path().join("1111111111")).unwrap();
    std::fs::write(
        dir.path().join(PHONE).join("profile.txt"),
        "All assets connected (Large MF portfolio)\n",
    )
    .unwrap();

    let config = ServerConfig::with_data_roots(vec![dir.path().to_path_buf()]);
    HttpTransport::new(&config).router()
}

/// Build an MCP JSON-RPC request.
fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// POST a raw body and return status plus the parsed JSON response.
async fn post_raw(
    app: &Router,
    uri: &str,
    session: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(id) = session {
        builder = builder.header("Mcp-Session-Id", id);
    }

    let response = app
        .clone()
        .oneshot(builder.body(body.into()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).expect("response body should be JSON");
    (status, value)
}

async fn post_json(app: &Router, uri: &str, session: Option<&str>, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, session, body.to_string()).await
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn login(app: &Router, session: &str, phone: &str) -> Value {
    let (status, body) = post_json(
        app,
        "/login",
        None,
        json!({ "sessionId": session, "phoneNumber": phone, "otp": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

// ═══════════════════════════════════════════════════════
// LOGIN CHALLENGE
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_unknown_session_gets_login_url() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = post_json(
        &app,
        "/mcp/stream",
        Some("abc-123"),
        mcp_request(7, "tools/list", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1, "login challenge always uses id 1");
    let url = body["result"]["login_url"].as_str().unwrap();
    assert_eq!(url, "/mockWebPage?sessionId=abc-123");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_login_challenge_ignores_body() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = post_raw(&app, "/mcp/stream", Some("garbage"), "{not json at all").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["login_url"]
        .as_str()
        .unwrap()
        .ends_with("?sessionId=garbage"));

    let (status, body) = post_raw(&app, "/mcp/stream", Some("empty"), Body::empty()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["result"]["login_url"]
        .as_str()
        .unwrap()
        .ends_with("?sessionId=empty"));
}

#[tokio::test]
async fn test_missing_header_uses_demo_session() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (_, body) = post_json(&app, "/mcp/stream", None, mcp_request(1, "tools/list", json!({}))).await;
    assert_eq!(
        body["result"]["login_url"],
        "/mockWebPage?sessionId=mcp-session-demo"
    );

    // Logging the demo session in authenticates header-less requests
    let result = login(&app, "mcp-session-demo", PHONE).await;
    assert_eq!(result["success"], true);

    let (_, body) = post_json(&app, "/mcp/stream", None, mcp_request(3, "tools/list", json!({}))).await;
    assert_eq!(body["id"], 3);
    assert!(body["result"]["tools"].is_array());
}

// ═══════════════════════════════════════════════════════
// LOGIN
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_login_with_unknown_phone_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let result = login(&app, "s-1", "0000000000").await;
    assert_eq!(result["success"], false);
    assert!(result["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid phone number"));

    // Still unauthenticated
    let (_, body) = post_json(&app, "/mcp/stream", Some("s-1"), mcp_request(2, "tools/list", json!({}))).await;
    assert!(body["result"]["login_url"].is_string());
}

#[tokio::test]
async fn test_login_accepts_any_otp() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (_, result) = post_json(
        &app,
        "/login",
        None,
        json!({ "sessionId": "s-otp", "phoneNumber": "1111111111", "otp": "definitely-wrong" }),
    )
    .await;
    assert_eq!(result["success"], true);
    assert_eq!(result["message"], "Login successful");
}

#[tokio::test]
async fn test_login_rejects_path_like_phone() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    for phone in ["", ".", "..", "../2222222222", "2222222222/"] {
        let result = login(&app, "s-evil", phone).await;
        assert_eq!(result["success"], false, "phone {phone:?} should be rejected");
    }
}

#[tokio::test]
async fn test_malformed_login_body_is_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = post_raw(&app, "/login", None, r#"{"sessionId":"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_null_login_fields_read_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, body) = post_raw(
        &app,
        "/login",
        None,
        r#"{"sessionId":null,"phoneNumber":null,"otp":null}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid phone number"));

    let (status, body) = post_raw(
        &app,
        "/login",
        None,
        format!(r#"{{"sessionId":null,"phoneNumber":"{PHONE}","otp":null}}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

// ═══════════════════════════════════════════════════════
// AUTHENTICATED DISPATCH
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_tools_list_returns_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-list", PHONE).await;

    let (status, body) = post_json(&app, "/mcp/stream", Some("s-list"), mcp_request(11, "tools/list", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 11);

    let tools = body["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "fetch_net_worth",
            "fetch_credit_report",
            "fetch_epf_details",
            "fetch_mutual_fund_transactions",
            "fetch_bank_transactions",
        ]
    );
    for tool in tools {
        assert!(!tool["description"].as_str().unwrap().is_empty());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn test_tools_call_relays_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-call", PHONE).await;

    let (status, body) = post_json(
        &app,
        "/mcp/stream",
        Some("s-call"),
        mcp_request(42, "tools/call", json!({ "name": "fetch_net_worth" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 42);
    assert_eq!(body["result"], net_worth_fixture());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_tools_call_missing_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-missing", PHONE).await;

    let (status, body) = post_json(
        &app,
        "/mcp/stream",
        Some("s-missing"),
        mcp_request(5, "tools/call", json!({ "name": "fetch_epf_details" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
    assert_eq!(body["error"]["code"], -1);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("fetch_epf_details"));
    assert!(body.get("result").is_none(), "must not carry both result and error");
}

#[tokio::test]
async fn test_tools_call_unparseable_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-broken", PHONE).await;

    let (_, body) = post_json(
        &app,
        "/mcp/stream",
        Some("s-broken"),
        mcp_request(6, "tools/call", json!({ "name": "fetch_credit_report" })),
    )
    .await;

    assert_eq!(body["error"]["code"], -1);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("parse"), "got: {message}");
    assert!(message.contains("fetch_credit_report"));
}

#[tokio::test]
async fn test_tools_call_bad_name_is_recovered() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-badname", PHONE).await;

    let cases = [
        json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/call" }),
        mcp_request(2, "tools/call", json!({})),
        mcp_request(3, "tools/call", json!({ "name": 17 })),
        mcp_request(4, "tools/call", json!({ "name": null })),
    ];

    for request in cases {
        let (status, body) = post_json(&app, "/mcp/stream", Some("s-badname"), request.clone()).await;
        assert_eq!(status, StatusCode::OK, "request {request}");
        assert_eq!(body["id"], request["id"]);
        assert_eq!(body["error"]["code"], -1, "request {request}");
        assert!(body.get("result").is_none());
    }
}

#[tokio::test]
async fn test_tools_call_unknown_tool_fails_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-unknown", PHONE).await;

    let (_, body) = post_json(
        &app,
        "/mcp/stream",
        Some("s-unknown"),
        mcp_request(9, "tools/call", json!({ "name": "fetch_crypto_wallet" })),
    )
    .await;

    assert_eq!(body["error"]["code"], -1);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("fetch_crypto_wallet"));
}

#[tokio::test]
async fn test_unsupported_method() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-method", PHONE).await;

    let (status, body) = post_json(
        &app,
        "/mcp/stream",
        Some("s-method"),
        mcp_request(8, "unsupported/method", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 8);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "Method not found");
}

#[tokio::test]
async fn test_malformed_body_when_authenticated() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);
    login(&app, "s-malformed", PHONE).await;

    for raw in [r#"{"jsonrpc":"2.0","id":1,"method":"#, r#"[1, 2, 3]"#, r#"{"id":1,"method":"tools/call","params":[1]}"#] {
        let (status, body) = post_raw(&app, "/mcp/stream", Some("s-malformed"), raw).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw}");
        assert!(body.get("jsonrpc").is_none(), "no JSON-RPC envelope on transport errors");
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }
}

// ═══════════════════════════════════════════════════════
// PAGES & HEALTH
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_login_page_renders_session_and_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, html) = get_text(&app, "/mockWebPage?sessionId=page-session").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("\"page-session\""));
    assert!(html.contains("<option value=\"2222222222\">"));
    assert!(html.contains("<option value=\"1111111111\">"));
    assert!(html.contains("2222222222 - All assets connected (Large MF portfolio)</option>"));

    let (_, html) = get_text(&app, "/mockWebPage").await;
    assert!(html.contains("\"mcp-session-demo\""));
}

#[tokio::test]
async fn test_login_page_escapes_session_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (_, html) = get_text(&app, "/mockWebPage?sessionId=%3C%2Fscript%3E%3Cscript%3Ealert(1)").await;
    assert!(!html.contains("</script><script>alert(1)"));
    assert!(html.contains("\\u003c/script\\u003e"));
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir);

    let (status, text) = get_text(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 0);

    login(&app, "s-health-1", PHONE).await;
    login(&app, "s-health-2", "1111111111").await;
    login(&app, "s-health-1", "1111111111").await;

    let (_, text) = get_text(&app, "/health").await;
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["sessions"], 2);
}

#[tokio::test]
async fn test_front_end_files_and_spa_fallback() {
    let data = tempfile::tempdir().unwrap();
    let dist = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dist.path().join("assets")).unwrap();
    std::fs::write(dist.path().join("assets").join("app.js"), "console.log('fi');").unwrap();
    std::fs::write(dist.path().join("index.html"), "<html>spa</html>").unwrap();

    let mut config = ServerConfig::with_data_roots(vec![data.path().to_path_buf()]);
    config.dist_dir = Some(dist.path().to_path_buf());
    let app = HttpTransport::new(&config).router();

    let (status, js) = get_text(&app, "/assets/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(js, "console.log('fi');");

    let (status, html) = get_text(&app, "/dashboard/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(html, "<html>spa</html>");

    // API routes still win over the fallback
    let (status, text) = get_text(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("\"ok\""));
}
