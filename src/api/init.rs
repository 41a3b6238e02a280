use crate::api::AppState;
use axum::{
    error_handling::HandleErrorLayer,
    http::{Method, StatusCode},
    routing::{delete, get, post, put},
    BoxError, Router,
};
use std::time::Duration;
use tower::{buffer::BufferLayer, limit::RateLimitLayer, ServiceBuilder};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::{handlers::*, index::index};

pub fn initialize_router(state: AppState) -> Router {
    let error_handler = || {
        ServiceBuilder::new().layer(HandleErrorLayer::new(|err: BoxError| async move {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Unhandled error: {}", err),
            )
        }))
    };

    let global_rate_limit = |req_per_sec: u64| {
        ServiceBuilder::new()
            .layer(error_handler())
            .layer(BufferLayer::new(1024))
            .layer(RateLimitLayer::new(req_per_sec, Duration::from_secs(1)))
    };

    let rate_limit_per_ip = |period: u64, burst: u32| {
        let config = Box::new(
            GovernorConfigBuilder::default()
                .per_second(period)
                .burst_size(burst)
                .use_headers()
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .unwrap(),
        );

        ServiceBuilder::new()
            .layer(error_handler())
            .layer(GovernorLayer {
                config: Box::leak(config),
            })
    };

    let cors = |methods: Vec<Method>| {
        ServiceBuilder::new().layer(CorsLayer::new().allow_methods(methods).allow_origin(Any))
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Mutating routes (stricter rate limits)
    let mut write_routes: Router<AppState> = Router::new()
        .route("/connections/create", post(create_connection))
        .route(
            "/connections/:connection_id/status",
            put(update_connection_status),
        )
        .route("/connections/delete/:connection_id", delete(delete_connection));

    if state.config.local_cursor_development {
        tracing::warn!("Local cursor development routes are enabled");
        write_routes = write_routes.route("/cursor-dev/test-sync/:short_name", post(test_sync));
    }

    let write_routes = write_routes.layer(
        global_rate_limit(100)
            .layer(rate_limit_per_ip(1, 20))
            .layer(cors(vec![Method::POST, Method::PUT, Method::DELETE]))
            .layer(CompressionLayer::new().zstd(true)),
    );

    let read_routes: Router<AppState> = Router::new()
        .route("/destinations/list", get(list_destinations))
        .route("/destinations/detail/:short_name", get(read_destination))
        .route("/sources/list", get(list_sources))
        .route("/sources/detail/:short_name", get(read_source))
        .route("/connections/list/:integration_type", get(list_connections))
        .route(
            "/connections/detail/:connection_id",
            get(get_connection_detail),
        )
        .route(
            "/connections/by-short-name/:short_name",
            get(get_connections_by_short_name),
        )
        .layer(
            global_rate_limit(10000)
                .layer(rate_limit_per_ip(1, 100))
                .layer(cors(vec![Method::GET]))
                .layer(CompressionLayer::new().zstd(true)),
        );

    Router::new()
        .nest("/api/v1", read_routes.merge(write_routes))
        // Base route
        .route("/", get(|| async { index() }))
        .route("/health", get(|| async { StatusCode::OK }))
        // Apply common middleware
        .layer(trace_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, db::DbClient, schema::users};
    use axum::{body::Body, http::Request, response::Response};
    use diesel::ExpressionMethods;
    use diesel_async::RunQueryDsl;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_config(auth_enabled: bool, local_cursor_development: bool) -> Config {
        Config {
            database_url: "postgres://nobody@127.0.0.1:1/none".to_string(),
            redis_url: "redis://127.0.0.1:1".to_string(),
            port: 0,
            auth_enabled,
            first_superuser: "admin@example.com".to_string(),
            local_cursor_development,
            cache_ttl_seconds: 60,
            log_dir: "logs".to_string(),
        }
    }

    fn test_state() -> AppState {
        state_for(test_config(false, true))
    }

    fn state_for(config: Config) -> AppState {
        let db = DbClient::new(&config.database_url, &config.redis_url).unwrap();
        AppState::new(db, config)
    }

    /// Request with a client address the per-IP limiter can key on
    fn request(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.7")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = initialize_router(test_state());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_route_lists_endpoints() {
        let app = initialize_router(test_state());

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        assert!(!value["endpoints"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unauthorized() {
        let app = initialize_router(state_for(test_config(true, false)));

        let response = app
            .oneshot(
                request(Method::GET, "/api/v1/destinations/list")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({ "detail": "Missing or invalid credentials." })
        );
    }

    #[tokio::test]
    async fn test_blank_api_key_is_unauthorized() {
        let app = initialize_router(state_for(test_config(true, false)));

        let response = app
            .oneshot(
                request(Method::GET, "/api/v1/connections/by-short-name/slack")
                    .header("x-api-key", "   ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(json_body(response).await["detail"].is_string());
    }

    #[tokio::test]
    async fn test_sync_route_absent_without_local_development() {
        let app = initialize_router(state_for(test_config(true, false)));

        let response = app
            .oneshot(
                request(Method::POST, "/api/v1/cursor-dev/test-sync/slack")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sync_route_mounted_with_local_development() {
        // Mounted routes reach the auth check, which rejects the keyless call
        let app = initialize_router(state_for(test_config(true, true)));

        let response = app
            .oneshot(
                request(Method::POST, "/api/v1/cursor-dev/test-sync/slack")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_unknown_short_name_is_not_found() {
        dotenv::dotenv().ok();
        let suffix = uuid::Uuid::new_v4().to_string();
        let config = Config {
            database_url: std::env::var("TEST_DATABASE_URL").unwrap(),
            redis_url: std::env::var("TEST_REDIS_URL").unwrap(),
            first_superuser: format!("router-{suffix}@example.com"),
            ..test_config(false, false)
        };
        let state = state_for(config.clone());

        let conn = &mut state.db.get_db_conn().await.unwrap();
        diesel::insert_into(users::table)
            .values((
                users::id.eq(&suffix),
                users::email.eq(&config.first_superuser),
                users::organization_id.eq(format!("org-{suffix}")),
            ))
            .execute(conn)
            .await
            .unwrap();

        let response = initialize_router(state)
            .oneshot(
                request(Method::GET, "/api/v1/connections/by-short-name/not_connected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "detail": "No connections found for short name: not_connected" })
        );

        diesel::delete(users::table)
            .filter(users::id.eq(&suffix))
            .execute(conn)
            .await
            .unwrap();
    }
}
