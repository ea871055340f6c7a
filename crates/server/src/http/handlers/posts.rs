use axum::{
    extract::{Query, State},
    Json,
};
use domain::{RankedPost, SortOrder};
use serde::{Deserialize, Serialize};
use storage::PostFilter;

use super::now;
use crate::board::{Board, PostDetail, PostDraft};
use crate::error::ApiError;
use crate::http::extract::{id_list, opt_id, JsonBody, PathParam};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default, alias = "section_id", deserialize_with = "opt_id")]
    pub section_id: Option<i64>,
    pub title: Option<String>,
    #[serde(alias = "body_md")]
    pub body_raw: Option<String>,
    pub kind: Option<String>,
    #[serde(default, alias = "tag_ids", deserialize_with = "id_list")]
    pub tag_ids: Vec<i64>,
    pub token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub ok: bool,
    pub id: i64,
    pub reissued_token: String,
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub q: Option<String>,
    pub section: Option<String>,
    pub tag: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub async fn list_posts(
    State(board): State<Board>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RankedPost>>, ApiError> {
    let order = SortOrder::parse(query.sort.as_deref());
    let filter = PostFilter {
        section: non_empty(query.section),
        tag: non_empty(query.tag),
        query: non_empty(query.q),
    };
    Ok(Json(board.list_posts(&filter, order).await?))
}

pub async fn get_post(
    State(board): State<Board>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<PostDetail>, ApiError> {
    Ok(Json(board.post_detail(id).await?))
}

pub async fn create_post(
    State(board): State<Board>,
    JsonBody(payload): JsonBody<CreatePostRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let draft = PostDraft {
        section_id: payload.section_id,
        title: payload.title,
        body: payload.body_raw,
        kind: payload.kind,
        tag_ids: payload.tag_ids,
        token: payload.token,
    };
    let created = board.create_post(now(), draft).await?;
    Ok(Json(CreatedResponse {
        ok: true,
        id: created.id,
        reissued_token: created.token,
    }))
}
