use crate::Db;
use domain::{EntityType, VoteOutcome, VoteRecord};
use tracing::debug;

fn score_table(entity: EntityType) -> &'static str {
    match entity {
        EntityType::Post => "posts",
        EntityType::Comment => "comments",
    }
}

impl Db {
    /// Records a vote and moves the entity's score in the same transaction.
    ///
    /// The `UNIQUE(entity_type, entity_id, token_hash)` constraint decides
    /// duplicates: a repeat fingerprint inserts nothing and leaves the score
    /// alone. Returns `None`, with nothing written, when the entity does not exist.
    pub async fn record_vote(&self, vote: &VoteRecord) -> anyhow::Result<Option<VoteOutcome>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO votes (entity_type, entity_id, direction, token_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(entity_type, entity_id, token_hash) DO NOTHING
            "#,
        )
        .bind(vote.entity_type.as_str())
        .bind(vote.entity_id)
        .bind(vote.direction.delta())
        .bind(&vote.token_fingerprint)
        .bind(vote.created_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.commit().await?;
            debug!(
                "Duplicate vote on {} {} absorbed",
                vote.entity_type, vote.entity_id
            );
            return Ok(Some(VoteOutcome::AlreadyApplied));
        }

        let updated = sqlx::query(&format!(
            "UPDATE {} SET score = score + ? WHERE id = ?",
            score_table(vote.entity_type)
        ))
        .bind(vote.direction.delta())
        .bind(vote.entity_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(VoteOutcome::Applied))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use domain::{Direction, EntityType, NewComment, NewPost, VoteOutcome, VoteRecord};

    fn vote(entity_type: EntityType, entity_id: i64, direction: Direction, fp: &str) -> VoteRecord {
        VoteRecord {
            entity_type,
            entity_id,
            direction,
            token_fingerprint: fp.to_string(),
            created_at: 1_000,
        }
    }

    async fn post(db: &crate::Db) -> i64 {
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

    async fn vote_rows(db: &crate::Db) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes")
            .fetch_one(&db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn first_vote_wins() {
        let db = testing::db().await;
        let id = post(&db).await;

        let first = db
            .record_vote(&vote(EntityType::Post, id, Direction::Up, "fp-a"))
            .await
            .unwrap();
        assert_eq!(first, Some(VoteOutcome::Applied));
        assert_eq!(db.get_post(id).await.unwrap().unwrap().score, 1);

        let repeat = db
            .record_vote(&vote(EntityType::Post, id, Direction::Down, "fp-a"))
            .await
            .unwrap();
        assert_eq!(repeat, Some(VoteOutcome::AlreadyApplied));
        assert_eq!(db.get_post(id).await.unwrap().unwrap().score, 1);
        assert_eq!(vote_rows(&db).await, 1);
    }

    #[tokio::test]
    async fn distinct_fingerprints_each_count() {
        let db = testing::db().await;
        let id = post(&db).await;

        for fp in ["a", "b", "c"] {
            db.record_vote(&vote(EntityType::Post, id, Direction::Down, fp))
                .await
                .unwrap();
        }
        assert_eq!(db.get_post(id).await.unwrap().unwrap().score, -3);
    }

    #[tokio::test]
    async fn post_and_comment_ledgers_are_separate() {
        let db = testing::db().await;
        let post_id = post(&db).await;
        let comment_id = db
            .create_comment(&NewComment {
                post_id,
                parent_id: None,
                body_md: "c".into(),
                body_html: "<p>c</p>".into(),
                created_at: 11,
            })
            .await
            .unwrap()
            .unwrap();

        db.record_vote(&vote(EntityType::Post, post_id, Direction::Up, "fp"))
            .await
            .unwrap();
        let outcome = db
            .record_vote(&vote(EntityType::Comment, comment_id, Direction::Up, "fp"))
            .await
            .unwrap();
        assert_eq!(outcome, Some(VoteOutcome::Applied));
        assert_eq!(db.get_comment(comment_id).await.unwrap().unwrap().score, 1);
    }

    #[tokio::test]
    async fn vote_on_missing_entity_rolls_back() {
        let db = testing::db().await;
        let outcome = db
            .record_vote(&vote(EntityType::Post, 404, Direction::Up, "fp"))
            .await
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(vote_rows(&db).await, 0);
    }
}
