use axum::{extract::State, Json};
use serde::Deserialize;

use super::{now, posts::CreatedResponse};
use crate::board::{Board, CommentDraft};
use crate::error::ApiError;
use crate::http::extract::{opt_id, JsonBody};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default, alias = "post_id", deserialize_with = "opt_id")]
    pub post_id: Option<i64>,
    #[serde(default, alias = "parent_id", deserialize_with = "opt_id")]
    pub parent_id: Option<i64>,
    #[serde(alias = "body_md")]
    pub body_raw: Option<String>,
    pub token: Option<String>,
}

pub async fn post_comment(
    State(board): State<Board>,
    JsonBody(payload): JsonBody<CreateCommentRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let draft = CommentDraft {
        post_id: payload.post_id,
        parent_id: payload.parent_id,
        body: payload.body_raw,
        token: payload.token,
    };
    let created = board.create_comment(now(), draft).await?;
    Ok(Json(CreatedResponse {
        ok: true,
        id: created.id,
        reissued_token: created.token,
    }))
}
