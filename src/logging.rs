//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};

/// Log each request and its response status at the `info` level.
///
/// Form POST bodies are logged with the password fields redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request = if is_form_post(&request) {
        let (parts, body) = request.into_parts();
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();
        let body_text = String::from_utf8_lossy(&body_bytes).to_string();

        let display_text = redact_field(&body_text, "password");
        let display_text = redact_field(&display_text, "confirm");
        tracing::info!("{method} {uri} body: {display_text}");

        Request::from_parts(parts, Body::from(body_bytes))
    } else {
        tracing::info!("{method} {uri}");
        request
    };

    let response = next.run(request).await;

    tracing::info!("{method} {uri} -> {}", response.status());

    response
}

fn is_form_post(request: &Request) -> bool {
    request.method() == Method::POST
        && request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn redact_field(form_text: &str, field_name: &str) -> String {
    let field_start = form_text.find(&format!("{field_name}="));

    let start = match field_start {
        Some(field_pos) => field_pos,
        None => return form_text.to_string(),
    };

    let field_end = form_text[start..].find('&');
    let end = match field_end {
        Some(end) => start + end,
        None => form_text.len(),
    };
    let field = &form_text[start..end];

    form_text.replace(field, &format!("{field_name}=********"))
}
