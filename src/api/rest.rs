//! REST surface: `GET /{location}?format=j1` plus health, docs and the OpenAPI document.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::clients::wttr::{UpstreamError, WttrClient};
use crate::domain::{QueryError, WeatherQuery};

/// Statically loaded OpenAPI document served at `/openapi.json`.
pub const OPENAPI_DOC: &str = include_str!("../../assets/openapi.json");

const DOCS_HTML: &str = include_str!("../../assets/docs.html");

pub const AVAILABLE_ENDPOINTS: [&str; 3] = [
    "GET /{location}?format=j1 - Get weather data",
    "GET /docs - API documentation",
    "GET /health - Health check",
];

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    format: Option<String>,
}

#[derive(Debug)]
pub enum RestError {
    Query(QueryError),
    Upstream(UpstreamError),
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RestError::Query(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            RestError::Upstream(UpstreamError::NotFound) => {
                (StatusCode::NOT_FOUND, "Location not found".to_owned())
            }
            RestError::Upstream(UpstreamError::Timeout) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Gateway timeout - wttr.in service unavailable".to_owned(),
            ),
            RestError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error while fetching weather data".to_owned(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub async fn weather(
    State(client): State<WttrClient>,
    Path(location): Path<String>,
    params: Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Response, RestError> {
    // An unparseable query string (eg. a repeated `format`) cannot be "j1".
    let format = match &params {
        Ok(Query(p)) => p.format.as_deref(),
        Err(_) => Some(""),
    };
    let query = WeatherQuery::new(location, format).map_err(RestError::Query)?;
    let body = client.fetch(&query).await.map_err(RestError::Upstream)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        body,
    )
        .into_response())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

pub async fn openapi() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], OPENAPI_DOC)
}

pub async fn docs() -> Html<&'static str> {
    Html(DOCS_HTML)
}

pub async fn root() -> Redirect {
    Redirect::to("/docs")
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found", "availableEndpoints": AVAILABLE_ENDPOINTS })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn openapi_document_is_valid_json() {
        let v: serde_json::Value = serde_json::from_str(OPENAPI_DOC).unwrap();
        assert!(v["paths"]["/{location}"]["get"].is_object());
    }

    #[tokio::test]
    async fn docs_page_mounts_swagger_ui_on_the_openapi_document() {
        let Html(page) = docs().await;
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"url: "/openapi.json""#));
        assert!(page.contains(r##"dom_id: "#swagger-ui""##));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[tokio::test]
    async fn upstream_errors_map_to_statuses() {
        let cases = [
            (UpstreamError::NotFound, StatusCode::NOT_FOUND, "Location not found"),
            (
                UpstreamError::Timeout,
                StatusCode::GATEWAY_TIMEOUT,
                "Gateway timeout - wttr.in service unavailable",
            ),
            (
                UpstreamError::Status(502),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error while fetching weather data",
            ),
            (
                UpstreamError::Transport("refused".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error while fetching weather data",
            ),
        ];
        for (err, status, message) in cases {
            let resp = RestError::Upstream(err).into_response();
            assert_eq!(resp.status(), status);
            assert_eq!(body_json(resp).await["error"], message);
        }
    }

    #[tokio::test]
    async fn query_errors_are_400() {
        let resp = RestError::Query(QueryError::UnsupportedFormat).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Format parameter must be \"j1\"");
    }
}
