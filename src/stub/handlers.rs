//! Request handlers for the stub backend.

use axum::Json;
use axum::extract::Query;
use axum::http::StatusCode;
use serde_json::{Value, json};

use super::types::{
    ErrorResponse, ItemsBody, LoadingBody, LookupQuery, RandomCasesBody, SymTypeBody,
};
use crate::catalogue::{ActionKind, SymType, json_number};

type Rejection = (StatusCode, Json<ErrorResponse>);

fn unprocessable(detail: String) -> Rejection {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse { detail }),
    )
}

/// Base reply `{"action": <id>, "status": "ok"}` plus extra fields.
fn echo(kind: ActionKind, extra: Value) -> Json<Value> {
    let mut reply = json!({ "action": kind.id(), "status": "ok" });
    if let (Some(reply), Value::Object(extra)) = (reply.as_object_mut(), extra) {
        reply.extend(extra);
    }
    Json(reply)
}

fn optional_number(x: Option<f64>) -> Value {
    x.map_or(Value::Null, json_number)
}

/// Acknowledges an action that takes no parameters.
pub async fn ack(kind: ActionKind) -> Json<Value> {
    echo(kind, Value::Null)
}

/// `POST /sym-type` → 200, or 422 + `ErrorResponse` for an unknown type.
pub async fn sym_type(Json(body): Json<SymTypeBody>) -> Result<Json<Value>, Rejection> {
    let sym_type: SymType = body
        .sym_type
        .parse()
        .map_err(|e: crate::catalogue::ParseError| unprocessable(e.to_string()))?;
    Ok(echo(ActionKind::SymType, json!({ "type": sym_type })))
}

/// `POST|DELETE` on a relay path; echoes the item list (`null` kept).
pub async fn relay_items(kind: ActionKind, Json(body): Json<ItemsBody>) -> Json<Value> {
    echo(kind, json!({ "items": body.items }))
}

pub async fn loading_level(Json(body): Json<LoadingBody>) -> Json<Value> {
    echo(
        ActionKind::LoadingLevel,
        json!({ "loading": optional_number(body.loading) }),
    )
}

pub async fn initial_generation_level(Json(body): Json<LoadingBody>) -> Json<Value> {
    echo(
        ActionKind::InitialGenerationLevel,
        json!({ "loading": optional_number(body.loading) }),
    )
}

pub async fn random_cases(Json(body): Json<RandomCasesBody>) -> Json<Value> {
    echo(
        ActionKind::RandomCases,
        json!({ "num": optional_number(body.num) }),
    )
}

/// `GET /simulation`
pub async fn simulation() -> Json<Value> {
    echo(ActionKind::Simulation, json!({ "message": "Hello, World!" }))
}

/// `GET /lookupdid?value=...` → 200, or 422 when `value` is missing.
pub async fn lookup_did(Query(query): Query<LookupQuery>) -> Result<Json<Value>, Rejection> {
    let value = query
        .value
        .ok_or_else(|| unprocessable("query parameter `value` is required".to_string()))?;
    Ok(Json(json!({
        "action": "lookupdid",
        "status": "ok",
        "value": value,
        "message": "Hello, World!",
    })))
}
