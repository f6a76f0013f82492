use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, header::USER_AGENT},
    middleware::Next,
    response::Response,
};
use base64::Engine as _;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// 12 random bytes, base64url without padding.
fn generate_request_id() -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(rand::random::<[u8; 12]>())
}

/// Client-supplied request ids are kept when they are short, non-empty ASCII.
fn request_id_for(req: &Request) -> String {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id)
}

/// One log line per request; the level follows the response status class.
pub async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    // `Version`'s debug form is already the wire name, e.g. `HTTP/1.1`.
    let protocol = format!("{:?}", req.version());
    let request_id = request_id_for(&req);
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    macro_rules! access_line {
        ($level:ident) => {
            $level!(
                "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
                status.as_u16(),
                request_id,
                method.as_str(),
                protocol,
                path,
                latency_ms,
                user_agent
            )
        };
    }

    if status.is_server_error() {
        access_line!(error);
    } else if status.is_client_error() {
        access_line!(warn);
    } else {
        access_line!(info);
    }

    resp
}
