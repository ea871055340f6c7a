use crate::{models::SqlComment, Db};
use domain::{Comment, CommentId, NewComment, PostId, Status};

const COMMENT_COLUMNS: &str =
    "id, post_id, parent_id, body_md, body_html, score, status, created_at";

impl Db {
    /// Inserts a comment only while its post is still visible.
    /// `None` means the post was missing or not public at write time.
    pub async fn create_comment(&self, c: &NewComment) -> anyhow::Result<Option<CommentId>> {
        let result = sqlx::query(
            r#"
            INSERT INTO comments (post_id, parent_id, body_md, body_html, score, status, created_at)
            SELECT ?, ?, ?, ?, 0, 'visible', ?
            WHERE EXISTS (SELECT 1 FROM posts WHERE id = ? AND status = 'visible')
            "#,
        )
        .bind(c.post_id)
        .bind(c.parent_id)
        .bind(&c.body_md)
        .bind(&c.body_html)
        .bind(c.created_at)
        .bind(c.post_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_rowid()))
    }

    pub async fn get_comment(&self, id: CommentId) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {} FROM comments WHERE id = ?",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Visible comments of a post, oldest first.
    pub async fn list_comments(&self, post_id: PostId) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {} FROM comments WHERE post_id = ? AND status = 'visible' \
             ORDER BY created_at ASC, id ASC",
            COMMENT_COLUMNS
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn recent_comments(&self, limit: i64) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {} FROM comments ORDER BY created_at DESC, id DESC LIMIT ?",
            COMMENT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn set_comment_status(&self, id: CommentId, status: Status) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE comments SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use domain::{NewComment, NewPost, Status};

    async fn seeded_post(db: &crate::Db) -> i64 {
        let s = testing::section(db, "general", true).await;
        db.create_post(&NewPost {
            section_id: s,
            title: "t".into(),
            body_md: "b".into(),
            body_html: "<p>b</p>".into(),
            kind: "request".into(),
            tag_ids: vec![],
            created_at: 10,
        })
        .await
        .unwrap()
    }

    fn comment(post_id: i64, created_at: i64) -> NewComment {
        NewComment {
            post_id,
            parent_id: None,
            body_md: "hi".into(),
            body_html: "<p>hi</p>".into(),
            created_at,
        }
    }

    #[tokio::test]
    async fn comments_list_oldest_first_and_skip_hidden() {
        let db = testing::db().await;
        let post = seeded_post(&db).await;

        let second = db.create_comment(&comment(post, 30)).await.unwrap().unwrap();
        let first = db.create_comment(&comment(post, 20)).await.unwrap().unwrap();
        let gone = db.create_comment(&comment(post, 40)).await.unwrap().unwrap();
        assert!(db.set_comment_status(gone, Status::Deleted).await.unwrap());

        let ids: Vec<i64> = db
            .list_comments(post)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(db.recent_comments(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn comments_are_refused_on_non_public_posts() {
        let db = testing::db().await;
        let post = seeded_post(&db).await;
        db.set_post_status(post, Status::Frozen).await.unwrap();

        assert_eq!(db.create_comment(&comment(post, 20)).await.unwrap(), None);
        assert_eq!(db.create_comment(&comment(9999, 20)).await.unwrap(), None);
        assert!(db.recent_comments(10).await.unwrap().is_empty());
    }
}
