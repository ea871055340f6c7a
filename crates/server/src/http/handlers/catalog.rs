use axum::{extract::State, Json};
use domain::{Section, Tag};

use crate::board::{Board, SectionPage};
use crate::error::ApiError;
use crate::http::extract::PathParam;

pub async fn list_sections(State(board): State<Board>) -> Result<Json<Vec<Section>>, ApiError> {
    Ok(Json(board.sections().await?))
}

pub async fn get_section(
    State(board): State<Board>,
    PathParam(slug): PathParam<String>,
) -> Result<Json<SectionPage>, ApiError> {
    Ok(Json(board.section_page(&slug).await?))
}

pub async fn list_tags(State(board): State<Board>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(board.tags().await?))
}
