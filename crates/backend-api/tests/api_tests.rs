use http_body_util::BodyExt;

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION,
            CONTENT_TYPE, ORIGIN,
        },
        Method, Request, StatusCode,
    },
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;
use userdesk_backend_api::{build_router, AppState};
use userdesk_config::DatabaseConfig;
use userdesk_database::initialize_database;
use userdesk_users::utils::Claims;
use userdesk_users::JwtManager;

type TestResult<T = ()> = anyhow::Result<T>;

const SECRET: &str = "api-test-secret";
const ISSUER: &str = "userdesk";
const AUDIENCE: &str = "userdesk-users";

struct TestContext {
    _temp_dir: TempDir,
    pool: SqlitePool,
    state: AppState,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("backend_api.sqlite").display()),
            max_connections: 5,
        };
        let pool = initialize_database(&config).await?;
        let jwt = JwtManager::new(SECRET, ISSUER.to_string(), AUDIENCE.to_string());
        let state = AppState::new(pool.clone(), jwt);

        Ok(Self {
            _temp_dir: temp_dir,
            pool,
            state,
        })
    }

    fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResult<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    async fn register(&self, email: &str, username: &str) -> TestResult<Value> {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/users/register",
                Some(registration(email, username)),
                None,
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        Ok(body)
    }

    async fn login(&self, email: &str, password: &str) -> TestResult<(StatusCode, Value)> {
        self.send(
            Method::POST,
            "/api/users/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    async fn token_for(&self, email: &str, username: &str) -> TestResult<(i64, String)> {
        let user = self.register(email, username).await?;
        let (status, body) = self.login(email, "password123").await?;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        let id = user["id"].as_i64().unwrap_or_default();
        let token = body["token"].as_str().unwrap_or_default().to_string();
        Ok((id, token))
    }

    async fn count(&self, table: &str) -> TestResult<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn registration(email: &str, username: &str) -> Value {
    json!({
        "name": "Leanne Graham",
        "username": username,
        "email": email,
        "password": "password123",
        "phone": "1-770-736-8031 x56442",
        "website": "hildegard.org",
        "address": {
            "street": "Kulas Light",
            "suite": "Apt. 556",
            "city": "Gwenborough",
            "zipcode": "92998-3874",
            "geo": { "lat": "-37.3159", "lng": "81.1496" }
        },
        "company": {
            "name": "Romaguera-Crona",
            "catchPhrase": "Multi-layered client-server neural-net",
            "bs": "harness real-time e-markets"
        }
    })
}

fn signed_token(sub: &str, exp: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        email: "someone@example.com".to_string(),
        exp,
        iat: now - 7200,
        nbf: now - 7200,
        iss: ISSUER.to_string(),
        aud: AUDIENCE.to_string(),
        jti: "test".to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap_or_default()
}

#[tokio::test]
async fn health_check_reports_ok() -> TestResult {
    let ctx = TestContext::new().await?;
    let (status, body) = ctx.send(Method::GET, "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn register_returns_created_user_without_credentials() -> TestResult {
    let ctx = TestContext::new().await?;
    let body = ctx.register("Sincere@april.biz", "Bret").await?;

    assert_eq!(body["email"], "sincere@april.biz");
    assert_eq!(body["company"]["catchPhrase"], "Multi-layered client-server neural-net");
    assert_eq!(body["address"]["geo"]["lat"], "-37.3159");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("auth").is_none());
    Ok(())
}

#[tokio::test]
async fn register_reports_field_errors() -> TestResult {
    let ctx = TestContext::new().await?;
    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/users/register",
            Some(json!({ "email": "nope", "password": "123" })),
            None,
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .map(|errors| errors.iter().filter_map(|e| e["field"].as_str()).collect())
        .unwrap_or_default();
    for field in ["name", "username", "email", "password", "phone"] {
        assert!(fields.contains(&field), "missing {field} in {body}");
    }
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_bad_request() -> TestResult {
    let ctx = TestContext::new().await?;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users/register")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))?;

    let response = ctx.router().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await?.to_bytes();
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"], "bad_request");
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_conflicts() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.register("dup@example.com", "dup").await?;

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/users/register",
            Some(registration("DUP@example.com", "other")),
            None,
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    Ok(())
}

#[tokio::test]
async fn login_failures_are_indistinguishable() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.register("known@example.com", "known").await?;

    let (wrong_status, wrong_body) = ctx.login("known@example.com", "bad-password").await?;
    let (unknown_status, unknown_body) = ctx.login("unknown@example.com", "password123").await?;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "invalid_credentials");
    Ok(())
}

#[tokio::test]
async fn login_returns_token_and_expiry() -> TestResult {
    let ctx = TestContext::new().await?;
    let user = ctx.register("token@example.com", "token").await?;

    let (status, body) = ctx.login("token@example.com", "password123").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user["id"]);
    assert!(body["expiresAt"].is_string());

    let token = body["token"].as_str().unwrap_or_default();
    let claims = JwtManager::new(SECRET, ISSUER.to_string(), AUDIENCE.to_string())
        .validate_token(token)?;
    assert_eq!(Some(claims.user_id()?), user["id"].as_i64());
    Ok(())
}

#[tokio::test]
async fn protected_routes_distinguish_token_failures() -> TestResult {
    let ctx = TestContext::new().await?;
    let (id, _) = ctx.token_for("present@example.com", "present").await?;

    let (status, body) = ctx.send(Method::GET, "/api/users", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_missing");

    let (status, body) = ctx
        .send(Method::GET, "/api/users", None, Some("not.a.token"))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_invalid");

    let expired = signed_token(&id.to_string(), Utc::now().timestamp() - 60);
    let (status, body) = ctx
        .send(Method::GET, "/api/users", None, Some(&expired))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_expired");

    let orphan = signed_token("9999", Utc::now().timestamp() + 600);
    let (status, body) = ctx
        .send(Method::GET, "/api/users", None, Some(&orphan))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "user_missing");
    Ok(())
}

#[tokio::test]
async fn list_and_get_users() -> TestResult {
    let ctx = TestContext::new().await?;
    let (id, token) = ctx.token_for("list@example.com", "lister").await?;
    ctx.register("second@example.com", "second").await?;

    for uri in ["/api/users", "/api/users/"] {
        let (status, body) = ctx.send(Method::GET, uri, None, Some(&token)).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    let (status, body) = ctx
        .send(Method::GET, &format!("/api/users/{id}"), None, Some(&token))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "lister");

    let (status, body) = ctx
        .send(Method::GET, "/api/users/4242", None, Some(&token))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = ctx
        .send(Method::GET, "/api/users/abc", None, Some(&token))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_merges_and_keeps_password() -> TestResult {
    let ctx = TestContext::new().await?;
    let (id, token) = ctx.token_for("update@example.com", "updater").await?;
    let (before,): (String,) = sqlx::query_as("SELECT password_hash FROM auth WHERE user_id = ?")
        .bind(id)
        .fetch_one(&ctx.pool)
        .await?;

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(json!({ "name": "Updated Name", "company": { "bs": "new bs" } })),
            Some(&token),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Updated Name");
    assert_eq!(body["company"]["bs"], "new bs");
    assert_eq!(body["company"]["name"], "Romaguera-Crona");

    let (after,): (String,) = sqlx::query_as("SELECT password_hash FROM auth WHERE user_id = ?")
        .bind(id)
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn update_rejects_invalid_values() -> TestResult {
    let ctx = TestContext::new().await?;
    let (id, token) = ctx.token_for("invalid@example.com", "invalid").await?;

    let (status, body) = ctx
        .send(
            Method::PUT,
            &format!("/api/users/{id}"),
            Some(json!({ "email": "broken", "website": "not a url" })),
            Some(&token),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn delete_cascades_and_invalidates_token() -> TestResult {
    let ctx = TestContext::new().await?;
    let (id, token) = ctx.token_for("delete@example.com", "deleter").await?;

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/api/users/{id}"), None, Some(&token))
        .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    for table in ["users", "addresses", "geos", "companies", "auth"] {
        assert_eq!(ctx.count(table).await?, 0, "{table} still has rows");
    }

    let (status, body) = ctx.send(Method::GET, "/api/users", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "user_missing");
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_user_routes() -> TestResult {
    let ctx = TestContext::new().await?;
    let (status, body) = ctx
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/users/register"].is_object());
    assert!(body["paths"]["/api/users/{id}"]["delete"].is_object());
    assert!(body["components"]["securitySchemes"]["bearerAuth"].is_object());
    Ok(())
}

#[tokio::test]
async fn cors_preflight_is_allowed() -> TestResult {
    let ctx = TestContext::new().await?;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/users/login")
        .header(ORIGIN, "http://localhost:5173")
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())?;

    let response = ctx.router().oneshot(request).await?;
    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    Ok(())
}
