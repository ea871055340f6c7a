use domain::{Comment, Post, Section, Status, Tag};
use sqlx::FromRow;

// Unknown status text never becomes public.
fn status_of(raw: &str) -> Status {
    raw.parse().unwrap_or(Status::Hidden)
}

#[derive(FromRow)]
pub struct SqlSection {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
}

impl From<SqlSection> for Section {
    fn from(sql: SqlSection) -> Self {
        Section {
            id: sql.id,
            name: sql.name,
            slug: sql.slug,
            description: sql.description,
            is_active: sql.is_active,
        }
    }
}

#[derive(FromRow)]
pub struct SqlTag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub color: String,
}

impl From<SqlTag> for Tag {
    fn from(sql: SqlTag) -> Self {
        Tag {
            id: sql.id,
            name: sql.name,
            slug: sql.slug,
            color: sql.color,
        }
    }
}

// tag row keyed by the post it is attached to
#[derive(FromRow)]
pub struct SqlPostTag {
    pub post_id: i64,
    #[sqlx(flatten)]
    pub tag: SqlTag,
}

#[derive(FromRow)]
pub struct SqlPost {
    pub id: i64,
    pub section_id: i64,
    pub section_name: String,
    pub section_slug: String,
    pub title: String,
    pub body_md: String,
    pub body_html: String,
    pub kind: String,
    pub score: i64,
    pub status: String,
    pub is_sticky: bool,
    pub created_at: i64,
}

impl From<SqlPost> for Post {
    fn from(sql: SqlPost) -> Self {
        Post {
            id: sql.id,
            section_id: sql.section_id,
            section_name: sql.section_name,
            section_slug: sql.section_slug,
            title: sql.title,
            body_md: sql.body_md,
            body_html: sql.body_html,
            kind: sql.kind,
            score: sql.score,
            status: status_of(&sql.status),
            is_sticky: sql.is_sticky,
            created_at: sql.created_at,
            tags: Vec::new(),
        }
    }
}

#[derive(FromRow)]
pub struct SqlComment {
    pub id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub body_md: String,
    pub body_html: String,
    pub score: i64,
    pub status: String,
    pub created_at: i64,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        Comment {
            id: sql.id,
            post_id: sql.post_id,
            parent_id: sql.parent_id,
            body_md: sql.body_md,
            body_html: sql.body_html,
            score: sql.score,
            status: status_of(&sql.status),
            created_at: sql.created_at,
        }
    }
}
