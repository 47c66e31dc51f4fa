//! Jozoor Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused by the binary and the CLI.
//!
//! # Security
//!
//! This crate can modify the catalog and holds the Cloudinary API secret.
//! Every route except login and health checks requires an admin session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cloudinary;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness(State(state): State<state::AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
        routing::get,
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;
    use crate::cloudinary::CloudinaryClient;
    use crate::config::tests::test_config;
    use crate::services::auth::testing::StaticAuthenticator;
    use crate::state::AppState;

    /// Router with an in-memory session store, a pool that never connects and
    /// the fixed admin/admin123 authenticator.
    ///
    /// Only routes that answer before touching the database can be exercised.
    fn test_app() -> Router {
        let config = test_config();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://jozoor@localhost/jozoor_test")
            .unwrap();
        let cloudinary = CloudinaryClient::new(config.cloudinary.clone());
        let state = AppState::with_parts(
            config,
            pool,
            cloudinary,
            Arc::new(StaticAuthenticator::default()),
        );

        Router::new()
            .route("/health", get(health))
            .merge(routes::routes())
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(state)
    }

    fn login_request(username: &str, password: &str) -> Request<Body> {
        Request::post("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .unwrap()
    }

    /// Log in on `app` and return the session cookie pair.
    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(login_request("admin", "admin123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_owned()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_login_page_is_arabic_rtl() {
        let response = test_app()
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("كلمة المرور"));
    }

    #[tokio::test]
    async fn test_login_with_valid_pair_redirects_to_dashboard() {
        let response = test_app()
            .oneshot(login_request("admin", "admin123"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_login_with_wrong_pair_shows_arabic_error() {
        let response = test_app()
            .oneshot(login_request("admin", "wrong"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let html = body_text(response).await;
        assert!(html.contains("اسم المستخدم أو كلمة المرور غير صحيحة"));
        assert!(html.contains(r#"value="admin""#));
    }

    #[tokio::test]
    async fn test_login_with_blank_fields_is_bad_request() {
        let response = test_app().oneshot(login_request("", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(
            body_text(response)
                .await
                .contains("يرجى إدخال اسم المستخدم وكلمة المرور")
        );
    }

    #[tokio::test]
    async fn test_dashboard_requires_login() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn test_product_pages_require_login() {
        for uri in ["/products", "/products/new", "/products/3/edit"] {
            let response = test_app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_api_requires_login() {
        let response = test_app()
            .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Unauthorized");

        let response = test_app()
            .oneshot(
                Request::delete("/api/products/3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_page_redirects_when_logged_in() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = app
            .oneshot(
                Request::get("/login")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[tokio::test]
    async fn test_api_create_reports_missing_field() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = app
            .oneshot(
                Request::post("/api/products")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"price": 10, "description": "d", "category": "c", "stock": 1}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Field 'name' is required"
        );
    }

    #[tokio::test]
    async fn test_upload_without_file_is_bad_request() {
        let app = test_app();
        let cookie = login(&app).await;

        let body = "--XBOUNDARY\r\n\
                    Content-Disposition: form-data; name=\"upload_preset\"\r\n\r\n\
                    jozoor_store\r\n\
                    --XBOUNDARY--\r\n";
        let response = app
            .oneshot(
                Request::post("/api/upload")
                    .header(header::COOKIE, cookie)
                    .header(
                        header::CONTENT_TYPE,
                        "multipart/form-data; boundary=XBOUNDARY",
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_cloudinary_delete_requires_public_id() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = app
            .oneshot(
                Request::post("/api/cloudinary/delete")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"publicId": "  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Public ID is required");
    }

    /// POST `body` to `uri` with the session cookie and an optional content type.
    async fn post_api(
        app: Router,
        cookie: String,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> Response {
        let mut request = Request::post(uri).header(header::COOKIE, cookie);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        app.oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_malformed_json_gets_json_error() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = post_api(
            app,
            cookie,
            "/api/products",
            Some("application/json"),
            "{not json",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(!json["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_json_error() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = post_api(app, cookie, "/api/products", None, r#"{"name": "x"}"#).await;
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_mistyped_public_id_gets_json_error() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = post_api(
            app,
            cookie,
            "/api/cloudinary/delete",
            Some("application/json"),
            r#"{"publicId": 42}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_upload_without_multipart_gets_json_error() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = post_api(
            app,
            cookie,
            "/api/upload",
            Some("application/json"),
            r#"{"file": "honey.jpg"}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = test_app();
        let cookie = login(&app).await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/logout")
                    .header(header::COOKIE, cookie.clone())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");

        let response = app
            .oneshot(
                Request::get("/api/products")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
