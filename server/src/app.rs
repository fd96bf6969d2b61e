use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{any, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    // Client-side routes (`/state/ohio`, `/login`, ...) resolve to the SPA shell.
    let index = state.static_dir.join("index.html");
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new(&state.static_dir)
                .precompressed_br()
                .precompressed_gzip()
                .fallback(ServeFile::new(index)),
        )
        .layer(middleware::from_fn(set_static_cache_control));

    let app = Router::new()
        .route("/api/health", get(routes::api::health))
        .route(
            "/api/states/statesDetail",
            get(routes::api::get_states_detail),
        )
        .route(
            "/api/states/updateDetail",
            post(routes::api::update_states_detail),
        )
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/auth/change-password",
            post(routes::auth::change_password),
        )
        .route("/api/{*path}", any(routes::api::api_not_found))
        .route("/data/states.json", get(routes::api::get_states_summary));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    app.layer(CompressionLayer::new())
        .layer(cors)
        .fallback_service(static_assets)
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    if path.starts_with("/StateFlags/") || path.starts_with("/fonts/") {
        return Some("public, max-age=86400");
    }

    if path.starts_with("/data/") {
        return Some("public, max-age=300");
    }

    None
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(ext) = Path::new(path).extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    if !matches!(ext, "wasm" | "js" | "css") {
        return false;
    }

    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::routes::api::tests::{spawn_test_server, test_state};

    #[test]
    fn immutable_cache_for_hashed_bundle_assets() {
        assert_eq!(
            cache_control_for_path("/bellwether-client-5d41402abc4b2a76_bg.wasm"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(
            cache_control_for_path("/style-9e107d9d372bb682.css"),
            Some("public, max-age=31536000, immutable")
        );
    }

    #[test]
    fn day_cache_for_flags_and_fonts() {
        assert_eq!(
            cache_control_for_path("/StateFlags/Flag_of_Ohio.svg"),
            Some("public, max-age=86400")
        );
        assert_eq!(
            cache_control_for_path("/fonts/inter-regular.woff2"),
            Some("public, max-age=86400")
        );
    }

    #[test]
    fn short_cache_for_boundary_data() {
        assert_eq!(
            cache_control_for_path("/data/us-states.json"),
            Some("public, max-age=300")
        );
    }

    #[test]
    fn no_cache_header_override_for_html() {
        assert_eq!(cache_control_for_path("/"), None);
        assert_eq!(cache_control_for_path("/index.html"), None);
        assert_eq!(cache_control_for_path("/state/new-york"), None);
    }

    #[tokio::test]
    async fn client_routes_fall_back_to_index() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dist = dir.path().join("dist");
        std::fs::create_dir_all(dist.join("data")).expect("create dist");
        std::fs::write(dist.join("index.html"), "<html>bellwether</html>").expect("write index");
        std::fs::write(
            dist.join("data").join("us-states.json"),
            r#"{"type":"FeatureCollection","features":[]}"#,
        )
        .expect("write boundaries");

        let (addr, server_handle) = spawn_test_server(test_state(&dir).await).await;
        let base_url = format!("http://{addr}");

        for path in ["/", "/state/new-york", "/login", "/admin"] {
            let response = reqwest::get(format!("{base_url}{path}"))
                .await
                .expect("page request");
            assert!(response.status().is_success(), "{path}");
            assert_eq!(response.text().await.expect("body"), "<html>bellwether</html>");
        }

        let boundaries = reqwest::get(format!("{base_url}/data/us-states.json"))
            .await
            .expect("boundaries request");
        assert_eq!(
            boundaries
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("public, max-age=300")
        );

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn api_preflight_allows_bearer_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = build_app(test_state(&dir).await);

        let request = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/states/updateDetail")
            .header(header::ORIGIN, "http://localhost:8080")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
