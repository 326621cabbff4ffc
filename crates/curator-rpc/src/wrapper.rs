//! Response wrapping for admin front ends.
//!
//! Administrative methods answer in the `{success: bool, ...data}` shape the
//! settings screen renders. `query_plugins` and the introspection methods
//! return their raw payload.

use serde_json::{json, Value};

/// Wrap a method result in its front-end shape.
pub fn wrap_response(method: &str, result: Value) -> Value {
    match method {
        "clear_cache" => json!({
            "success": true,
            "message": "Cache cleared successfully"
        }),

        "get_cache_stats" => json!({
            "success": true,
            "stats": result
        }),

        "verify_slugs" => merge_success(result),

        // query_plugins: object or null; already-shaped reports pass through
        _ => result,
    }
}

/// Add `success: true` to an object result.
fn merge_success(result: Value) -> Value {
    match result {
        Value::Object(mut map) => {
            map.insert("success".to_string(), Value::Bool(true));
            Value::Object(map)
        }
        other => json!({"success": true, "data": other}),
    }
}
