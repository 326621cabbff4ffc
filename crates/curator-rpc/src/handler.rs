//! JSON-RPC request handlers.

use crate::server::AppState;
use crate::wrapper::wrap_response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use curator_core::{CuratorError, Interception, PluginQuery, Slug};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Code returned for methods the server does not implement.
const METHOD_NOT_FOUND: i32 = -32601;

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    if method == "health_check" {
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::success(id, json!({"status": "ok"}))),
        );
    }

    let Some(result) = dispatch_method(&state, method, &params).await else {
        warn!("Method not found: {}", method);
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            )),
        );
    };

    match result {
        Ok(value) => {
            let wrapped = wrap_response(method, value);
            (StatusCode::OK, Json(JsonRpcResponse::success(id, wrapped)))
        }
        Err(e) => {
            error!("RPC error for {}: {}", method, e);
            let code = e.to_rpc_error_code();
            (
                StatusCode::OK,
                Json(JsonRpcResponse::error(id, code, e.to_string())),
            )
        }
    }
}

/// Dispatch a method call. `None` means the method is unknown.
async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: &Value,
) -> Option<curator_core::Result<Value>> {
    let result = match method {
        "query_plugins" => query_plugins(state, params).await,
        "test_connection" => to_value(&state.curator.test_connection().await),
        "verify_slugs" => verify_slugs(state, params).await,
        "get_cache_stats" => to_value(&state.curator.cache_stats()),
        "get_partial_status" => to_value(&state.curator.partial_status()),
        "clear_cache" => state.curator.clear_cache().map(|()| Value::Null),
        "refresh_cache" => refresh_cache(state).await,
        _ => return None,
    };
    Some(result)
}

fn to_value<T: Serialize>(value: &T) -> curator_core::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Interception result as JSON: the listing, or `null` for "use the default".
fn interception_value(interception: Interception) -> curator_core::Result<Value> {
    match interception {
        Interception::Override(response) => to_value(&response),
        Interception::Fallback(reason) => {
            debug!("Featured listing fell back: {}", reason);
            Ok(Value::Null)
        }
        Interception::NotApplicable => Ok(Value::Null),
    }
}

async fn query_plugins(state: &AppState, params: &Value) -> curator_core::Result<Value> {
    let query: PluginQuery =
        serde_json::from_value(params.clone()).map_err(|e| CuratorError::InvalidParams {
            message: format!("query_plugins expects {{action, browse}}: {}", e),
        })?;
    interception_value(state.curator.query_plugins(&query).await)
}

/// Verify the given slugs, or the current remote list when none are given.
///
/// Strings that are not well-formed slugs are reported invalid without a
/// catalog lookup.
async fn verify_slugs(state: &AppState, params: &Value) -> curator_core::Result<Value> {
    let (slugs, malformed) = match params.get("slugs") {
        None | Some(Value::Null) => (state.curator.slugs(false).await?, Vec::new()),
        Some(Value::Array(items)) => {
            let mut slugs = Vec::new();
            let mut malformed = Vec::new();
            for item in items {
                let raw = item.as_str().ok_or_else(|| CuratorError::InvalidParams {
                    message: "slugs must be an array of strings".to_string(),
                })?;
                match Slug::parse(raw) {
                    Some(slug) => slugs.push(slug),
                    None => malformed.push(raw.to_string()),
                }
            }
            (slugs, malformed)
        }
        Some(_) => {
            return Err(CuratorError::InvalidParams {
                message: "slugs must be an array of strings".to_string(),
            })
        }
    };

    let report = state.curator.verify_slugs(&slugs).await;
    let mut invalid: Vec<String> = report.invalid.into_iter().map(Slug::into_string).collect();
    invalid.extend(malformed);

    Ok(json!({
        "valid": report.valid,
        "invalid": invalid,
    }))
}

async fn refresh_cache(state: &AppState) -> curator_core::Result<Value> {
    match state.curator.refresh().await? {
        Interception::Override(response) => Ok(json!({
            "success": true,
            "results": response.info.results,
            "partial": state.curator.partial_status(),
        })),
        Interception::Fallback(reason) => Ok(json!({
            "success": false,
            "fallback": reason,
        })),
        Interception::NotApplicable => Ok(json!({"success": false})),
    }
}
