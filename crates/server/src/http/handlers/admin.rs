use axum::{extract::State, http::HeaderMap, Json};
use domain::ModerationAction;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::board::Overview;
use crate::error::ApiError;
use crate::http::extract::{id_list, JsonBody, PathParam};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_active", alias = "is_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
pub struct TagRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTagsRequest {
    #[serde(default, alias = "tag_ids", deserialize_with = "id_list")]
    pub tag_ids: Vec<i64>,
}

fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), ApiError> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;
    let expected_token = format!("Bearer {}", state.admin_token);
    if auth_header != expected_token {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Overview>, ApiError> {
    require_admin(&headers, &state)?;
    Ok(Json(state.board.overview().await?))
}

pub async fn moderate_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParam((id, action)): PathParam<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers, &state)?;
    let action: ModerationAction = action.parse()?;
    state.board.moderate_post(id, action).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn moderate_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParam((id, action)): PathParam<(i64, String)>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers, &state)?;
    let action: ModerationAction = action.parse()?;
    state.board.moderate_comment(id, action).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn upsert_section(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<SectionRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers, &state)?;
    let id = state
        .board
        .upsert_section(
            payload.slug.as_deref(),
            payload.name.as_deref(),
            payload.description.as_deref(),
            payload.is_active,
        )
        .await?;
    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn upsert_tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<TagRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers, &state)?;
    let id = state
        .board
        .upsert_tag(
            payload.slug.as_deref(),
            payload.name.as_deref(),
            payload.color.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "ok": true, "id": id })))
}

pub async fn set_post_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<PostTagsRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&headers, &state)?;
    let linked = state.board.set_post_tags(id, &payload.tag_ids).await?;
    Ok(Json(json!({ "ok": true, "linked": linked })))
}
