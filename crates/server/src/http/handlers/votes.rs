use axum::{extract::State, Json};
use domain::EntityType;
use serde::Deserialize;
use serde_json::Value;

use super::now;
use crate::board::Board;
use crate::error::ApiError;
use crate::http::extract::{int_value, JsonBody, PathParam};

#[derive(Deserialize)]
pub struct VoteRequest {
    pub direction: Option<Value>,
    pub token: Option<String>,
}

// anything that is not an integer ends up as InvalidDirection
fn parse_direction(v: Option<&Value>) -> Option<i64> {
    int_value(v?)
}

async fn vote(
    board: Board,
    entity_type: EntityType,
    id: i64,
    payload: VoteRequest,
) -> Result<Json<Value>, ApiError> {
    board
        .cast_vote(
            now(),
            entity_type,
            id,
            parse_direction(payload.direction.as_ref()),
            payload.token.as_deref(),
        )
        .await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub async fn vote_post(
    State(board): State<Board>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<VoteRequest>,
) -> Result<Json<Value>, ApiError> {
    vote(board, EntityType::Post, id, payload).await
}

pub async fn vote_comment(
    State(board): State<Board>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<VoteRequest>,
) -> Result<Json<Value>, ApiError> {
    vote(board, EntityType::Comment, id, payload).await
}
