use std::collections::HashMap;

use crate::{
    models::{SqlPost, SqlPostTag},
    repo::tags::link_tags,
    Db,
};
use domain::{NewPost, Post, PostId, Status, Tag};
use sqlx::{QueryBuilder, Sqlite};

const POST_SELECT: &str = r#"
    SELECT
        p.id, p.section_id,
        s.name AS section_name, s.slug AS section_slug,
        p.title, p.body_md, p.body_html, p.kind,
        p.score, p.status, p.is_sticky, p.created_at
    FROM posts p
    JOIN sections s ON s.id = p.section_id
"#;

/// Listing filters. Every listing is limited to visible posts in active sections.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub section: Option<String>,
    pub tag: Option<String>,
    pub query: Option<String>,
}

impl Db {
    /// Writes the post row and its tag links as one unit. Unknown and
    /// repeated tag ids are skipped without failing the post.
    pub async fn create_post(&self, post: &NewPost) -> anyhow::Result<PostId> {
        let mut tx = self.pool.begin().await?;

        let post_id = sqlx::query(
            r#"
            INSERT INTO posts (
                section_id, title, body_md, body_html, kind,
                score, status, is_sticky, created_at
            )
            VALUES (?, ?, ?, ?, ?, 0, 'visible', 0, ?)
            "#,
        )
        .bind(post.section_id)
        .bind(&post.title)
        .bind(&post.body_md)
        .bind(&post.body_html)
        .bind(&post.kind)
        .bind(post.created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        link_tags(&mut tx, post_id, &post.tag_ids).await?;

        tx.commit().await?;
        Ok(post_id)
    }

    /// Any status; callers decide what is visible.
    pub async fn get_post(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query_as::<_, SqlPost>(&format!("{} WHERE p.id = ?", POST_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut post: Post = row.into();
                post.tags = self.tags_for_post(post.id).await?;
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    /// Visible posts, sticky first and newest first. Ranking happens on top of this order.
    pub async fn list_posts(&self, filter: &PostFilter) -> anyhow::Result<Vec<Post>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(POST_SELECT);
        qb.push(" WHERE p.status = 'visible' AND s.is_active = 1");

        if let Some(section) = &filter.section {
            qb.push(" AND s.slug = ").push_bind(section.clone());
        }
        if let Some(q) = &filter.query {
            let pattern = format!("%{}%", q);
            qb.push(" AND (p.title LIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.body_md LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(tag) = &filter.tag {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.slug = ",
            )
            .push_bind(tag.clone())
            .push(")");
        }
        qb.push(" ORDER BY p.is_sticky DESC, p.created_at DESC, p.id DESC");

        let rows: Vec<SqlPost> = qb.build_query_as().fetch_all(&self.pool).await?;
        let mut posts: Vec<Post> = rows.into_iter().map(Into::into).collect();
        self.attach_tags(&mut posts).await?;
        Ok(posts)
    }

    /// Newest posts in any status, for moderation.
    pub async fn recent_posts(&self, limit: i64) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, SqlPost>(&format!(
            "{} ORDER BY p.created_at DESC, p.id DESC LIMIT ?",
            POST_SELECT
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut posts: Vec<Post> = rows.into_iter().map(Into::into).collect();
        self.attach_tags(&mut posts).await?;
        Ok(posts)
    }

    pub async fn count_posts(&self) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Returns false when no such post exists.
    pub async fn set_post_status(&self, id: PostId, status: Status) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE posts SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_post_sticky(&self, id: PostId, sticky: bool) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE posts SET is_sticky = ? WHERE id = ?")
            .bind(sticky)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_tags(&self, posts: &mut [Post]) -> anyhow::Result<()> {
        if posts.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT pt.post_id, t.id, t.name, t.slug, t.color \
             FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id IN (",
        );
        let mut ids = qb.separated(", ");
        for post in posts.iter() {
            ids.push_bind(post.id);
        }
        qb.push(") ORDER BY t.name ASC");

        let rows: Vec<SqlPostTag> = qb.build_query_as().fetch_all(&self.pool).await?;
        let mut by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_post.entry(row.post_id).or_default().push(row.tag.into());
        }
        for post in posts.iter_mut() {
            post.tags = by_post.remove(&post.id).unwrap_or_default();
        }
        Ok(())
    }
}
