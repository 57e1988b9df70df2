use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::HOST, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use log::{info, warn};
use pharmaqr_core::{parse_tablet_id, RawFields, TabletId};
use serde_json::{json, Map, Value};

use crate::{
    error::ApiError,
    render::{render_error_page, render_index_page, render_info_page},
    state::AppState,
};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": pharmaqr_core::core_version(),
    }))
}

/// Entry form; submits to the JSON API from the browser.
pub async fn index_handler() -> Html<String> {
    Html(render_index_page())
}

pub async fn create_tablet_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let fields = raw_fields_from_body(&body)?;
    let id = state.run(move |service| service.create(&fields)).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "tablet_id": id.to_string(),
            "message": "Tablet created successfully",
        })),
    )
        .into_response())
}

pub async fn get_tablet_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = path_id(&raw_id)?;
    let record = state.run(move |service| service.fetch(id)).await?;

    Ok(Json(record.fields()).into_response())
}

pub async fn qrcode_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = path_id(&raw_id)?;
    let base_url = base_url(&state, &headers);
    let generated = state.generate_code(id, base_url).await?;

    info!(
        "event=qrcode_served module=server status=ok tablet_id={id} target={}",
        generated.target_url
    );
    Ok(Json(json!({
        "qr_code": generated.code.data_url(),
        "qr_data": generated.target_url,
        "tablet_info": generated.tablet,
    }))
    .into_response())
}

pub async fn info_page_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let as_of = Local::now().date_naive();
    let resolved = match path_id(&raw_id) {
        Ok(id) => state.run(move |service| service.resolve(id, as_of)).await,
        Err(err) => Err(err),
    };

    match resolved {
        Ok(model) => Html(render_info_page(&model)).into_response(),
        Err(err) => {
            let status = err.status();
            warn!(
                "event=info_page module=server status=error error_code={}",
                err.kind()
            );
            (status, Html(render_error_page(&err.to_string()))).into_response()
        }
    }
}

pub async fn info_json_handler(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = path_id(&raw_id)?;
    let as_of = Local::now().date_naive();
    let model = state.run(move |service| service.resolve(id, as_of)).await?;

    Ok(Json(model).into_response())
}

/// Converts a JSON object body into raw form fields.
///
/// Strings are kept verbatim, `null` counts as absent, numbers and booleans
/// use their JSON text. Nested values are rejected.
pub fn raw_fields_from_body(body: &[u8]) -> Result<RawFields, ApiError> {
    let object: Map<String, Value> = match serde_json::from_slice(body) {
        Ok(Value::Object(object)) if !object.is_empty() => object,
        _ => return Err(ApiError::MissingBody),
    };

    let mut fields = RawFields::with_capacity(object.len());
    for (key, value) in object {
        let text = match value {
            Value::Null => continue,
            Value::String(text) => text,
            Value::Bool(_) | Value::Number(_) => value.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ApiError::MalformedPayload(format!(
                    "field '{key}' must be a string"
                )))
            }
        };
        fields.insert(key, text);
    }

    Ok(fields)
}

fn path_id(raw_id: &str) -> Result<TabletId, ApiError> {
    parse_tablet_id(raw_id).ok_or_else(|| ApiError::UnknownId(raw_id.to_string()))
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.public_base_url {
        return url.clone();
    }

    let scheme = forwarded_scheme(headers).unwrap_or("http");
    headers
        .get(HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("{scheme}://{host}"))
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", state.config.port))
}

/// Scheme a TLS-terminating proxy reports in `X-Forwarded-Proto`.
///
/// Only `http` and `https` are honoured; the first hop wins.
fn forwarded_scheme(headers: &HeaderMap) -> Option<&'static str> {
    let value = headers.get(FORWARDED_PROTO)?.to_str().ok()?;
    match value.split(',').next()?.trim().to_ascii_lowercase().as_str() {
        "https" => Some("https"),
        "http" => Some("http"),
        _ => None,
    }
}
