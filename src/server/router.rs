//! Request dispatch module
//!
//! Entry point for invoke server requests: health check, method checks and
//! the invoke path that runs the rewrite handler over the posted event.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

use super::{HEALTH_PATH, INVOKE_PATH};
use crate::config::AppState;
use crate::event::CloudFrontEvent;
use crate::handler;
use crate::http;
use crate::logger::{self, InvocationLogEntry};

/// Main entry point for invoke server requests
pub async fn handle_request<B>(
    req: Request<B>,
    state: &AppState,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = match (&method, path.as_str()) {
        (&Method::GET | &Method::HEAD, HEALTH_PATH) => http::build_health_response("ok"),
        (&Method::POST, INVOKE_PATH) => invoke(req, state, peer_addr).await,
        (_, INVOKE_PATH) => {
            logger::log_warning(&format!("Method not allowed on invoke path: {method}"));
            http::build_405_response("POST")
        }
        (_, HEALTH_PATH) => http::build_405_response("GET, HEAD"),
        _ => http::build_404_response(),
    };
    Ok(response)
}

/// Decode the posted event, rewrite it and reply with the request to forward
async fn invoke<B>(
    req: Request<B>,
    state: &AppState,
    peer_addr: Option<SocketAddr>,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);

    let payload = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!("Event payload exceeds {limit} bytes"));
            return http::build_413_response();
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read event payload: {e}"));
            return http::build_error_response(400, "InvalidBody", &e.to_string());
        }
    };

    let invocation = CloudFrontEvent::from_slice(&payload)
        .and_then(|event| handler::invoke(&event, state.default_document()));

    match invocation {
        Ok(invocation) => {
            if state.config.logging.access_log {
                let mut entry = InvocationLogEntry::new(&invocation);
                entry.remote_addr = peer_addr.map(|addr| addr.to_string());
                entry.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
                logger::log_invocation(&entry, state.config.logging.format);
            }
            http::build_json_response(&invocation.request)
        }
        Err(e) => {
            logger::log_warning(&format!("Rejected event: {e}"));
            http::build_error_response(400, e.kind(), &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::{json, Value};

    fn test_state(max_body_size: u64) -> AppState {
        let mut cfg = Config::load_from("/nonexistent/edge-rewrite-config").unwrap();
        cfg.logging.access_log = false;
        cfg.http.max_body_size = max_body_size;
        AppState::new(&cfg)
    }

    fn request(method: Method, path: &str, body: impl Into<Bytes>) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Full::new(body.into()))
            .unwrap()
    }

    async fn send(state: &AppState, req: Request<Full<Bytes>>) -> (u16, Bytes) {
        let resp = handle_request(req, state, None).await.unwrap();
        let status = resp.status().as_u16();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    #[tokio::test]
    async fn test_invoke_rewrites_directory() {
        let state = test_state(1024 * 1024);
        let event = json!({
            "Records": [{"cf": {"request": {
                "uri": "/docs/",
                "method": "GET",
                "querystring": "v=2",
                "headers": {"host": [{"key": "Host", "value": "example.com"}]}
            }}}]
        });
        let (status, body) = send(
            &state,
            request(Method::POST, INVOKE_PATH, event.to_string()),
        )
        .await;

        assert_eq!(status, 200);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "uri": "/docs/index.html",
                "method": "GET",
                "querystring": "v=2",
                "headers": {"host": [{"key": "Host", "value": "example.com"}]}
            })
        );
    }

    #[tokio::test]
    async fn test_invoke_rejects_bad_events() {
        let state = test_state(1024 * 1024);

        let (status, body) = send(&state, request(Method::POST, INVOKE_PATH, "nope")).await;
        assert_eq!(status, 400);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["errorType"], "InvalidEvent");

        let (status, body) =
            send(&state, request(Method::POST, INVOKE_PATH, r#"{"Records":[]}"#)).await;
        assert_eq!(status, 400);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["errorType"], "NoRecords");
    }

    #[tokio::test]
    async fn test_invoke_payload_limit() {
        let state = test_state(16);
        let event = r#"{"Records":[{"cf":{"request":{"uri":"/"}}}]}"#;
        let (status, _) = send(&state, request(Method::POST, INVOKE_PATH, event)).await;
        assert_eq!(status, 413);
    }

    #[tokio::test]
    async fn test_other_routes() {
        let state = test_state(1024);

        let (status, body) = send(&state, request(Method::GET, HEALTH_PATH, "")).await;
        assert_eq!(status, 200);
        assert_eq!(&body[..], b"ok");

        let (status, _) = send(&state, request(Method::GET, INVOKE_PATH, "")).await;
        assert_eq!(status, 405);

        let (status, _) = send(&state, request(Method::GET, "/elsewhere", "")).await;
        assert_eq!(status, 404);
    }
}
