use std::any::Any;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

/// Requests to this path are never audited.
const UNAUDITED_PATH: &str = "/health";

pub fn headers_as_json(headers: &HeaderMap) -> Value {
    let map: Map<String, Value> = headers
        .iter()
        .map(|(k, v)| {
            let value = String::from_utf8_lossy(v.as_bytes()).into_owned();
            (k.as_str().to_owned(), Value::String(value))
        })
        .collect();
    Value::Object(map)
}

/// The JSON record written for one request/response pair.
pub fn audit_entry(
    method: &str,
    url: &str,
    request_headers: Value,
    status: StatusCode,
    response_headers: Value,
    duration_ms: f64,
) -> Value {
    json!({
        "request": { "method": method, "url": url, "headers": request_headers },
        "response": { "statusCode": status.as_u16(), "headers": response_headers },
        "durationMs": format!("{duration_ms:.2}"),
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    })
}

/// One structured log event per request/response pair.
pub async fn audit_log(req: Request, next: Next) -> Response {
    if req.uri().path() == UNAUDITED_PATH {
        return next.run(req).await;
    }
    let start = Instant::now();
    let method = req.method().clone();
    let url = req.uri().to_string();
    let request_headers = headers_as_json(req.headers());

    let resp = next.run(req).await;

    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    let entry = audit_entry(
        method.as_str(),
        &url,
        request_headers,
        resp.status(),
        headers_as_json(resp.headers()),
        duration_ms,
    );
    tracing::info!(
        method = %method,
        url = %url,
        status = resp.status().as_u16(),
        duration_ms = %format!("{duration_ms:.2}"),
        entry = %entry,
        "[HTTP LOG]"
    );
    resp
}

/// Panic handler for `CatchPanicLayer`: generic 500 JSON body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Unhandled error");
    let body = Json(json!({ "error": "Internal server error" }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::HeaderValue;
    use axum::routing::get;
    use axum::Router;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    async fn logged_for(path: &str) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/London", get(|| async { "weather" }))
            .layer(axum::middleware::from_fn(audit_log));
        let req = axum::http::Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        captured.text()
    }

    #[tokio::test]
    async fn health_checks_are_not_audited() {
        assert!(!logged_for("/health").await.contains("[HTTP LOG]"));
    }

    #[tokio::test]
    async fn one_entry_per_request() {
        let out = logged_for("/London?format=j1").await;
        assert_eq!(out.matches("[HTTP LOG]").count(), 1);
        assert!(out.contains("status=200"));
        assert!(out.contains("durationMs"));
        assert!(out.contains("/London?format=j1"));
    }

    #[test]
    fn entry_records_status_and_rounded_duration() {
        let entry = audit_entry(
            "GET",
            "/Paris",
            json!({"accept": "*/*"}),
            StatusCode::NOT_FOUND,
            json!({}),
            12.3456,
        );
        assert_eq!(entry["request"]["method"], "GET");
        assert_eq!(entry["request"]["headers"]["accept"], "*/*");
        assert_eq!(entry["response"]["statusCode"], 404);
        assert_eq!(entry["durationMs"], "12.35");
        assert!(entry["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn headers_become_a_flat_object() {
        let mut h = HeaderMap::new();
        h.insert("user-agent", HeaderValue::from_static("curl/8"));
        h.insert("accept", HeaderValue::from_static("*/*"));
        let v = headers_as_json(&h);
        assert_eq!(v["user-agent"], "curl/8");
        assert_eq!(v["accept"], "*/*");
    }

    #[tokio::test]
    async fn panics_render_generic_500() {
        let resp = panic_response(Box::new("kaboom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(resp.into_body(), 1 << 20).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v, json!({"error": "Internal server error"}));
    }
}
