use crate::{models::SqlTag, Db};
use domain::Tag;
use sqlx::SqliteConnection;

pub const DEFAULT_TAG_COLOR: &str = "#4fa3ff";

/// Links `tag_ids` to a post on an open connection. Ids that do not name an
/// existing tag and pairs that already exist are skipped; returns how many
/// links were added.
pub(crate) async fn link_tags(
    conn: &mut SqliteConnection,
    post_id: i64,
    tag_ids: &[i64],
) -> anyhow::Result<u64> {
    let mut linked = 0;
    for tag_id in tag_ids {
        linked += sqlx::query(
            r#"
            INSERT OR IGNORE INTO post_tags (post_id, tag_id)
            SELECT ?, id FROM tags WHERE id = ?
            "#,
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }
    Ok(linked)
}

impl Db {
    pub async fn list_tags(&self) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, SqlTag>("SELECT id, name, slug, color FROM tags ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn tags_for_post(&self, post_id: i64) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, SqlTag>(
            r#"
            SELECT t.id, t.name, t.slug, t.color
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn upsert_tag(&self, slug: &str, name: &str, color: Option<&str>) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tags (slug, name, color)
            VALUES (?, ?, ?)
            ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                color = excluded.color
            RETURNING id
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(color.unwrap_or(DEFAULT_TAG_COLOR))
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Swaps a post's whole tag set in one transaction.
    pub async fn replace_post_tags(&self, post_id: i64, tag_ids: &[i64]) -> anyhow::Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        let linked = link_tags(&mut tx, post_id, tag_ids).await?;

        tx.commit().await?;
        Ok(linked)
    }
}
