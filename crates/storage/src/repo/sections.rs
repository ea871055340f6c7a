use crate::{models::SqlSection, Db};
use domain::Section;

const SECTION_COLUMNS: &str = "id, name, slug, description, is_active";

impl Db {
    pub async fn list_active_sections(&self) -> anyhow::Result<Vec<Section>> {
        let rows = sqlx::query_as::<_, SqlSection>(&format!(
            "SELECT {} FROM sections WHERE is_active = 1 ORDER BY name ASC",
            SECTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_sections(&self) -> anyhow::Result<Vec<Section>> {
        let rows = sqlx::query_as::<_, SqlSection>(&format!(
            "SELECT {} FROM sections ORDER BY name ASC",
            SECTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn active_section(&self, id: i64) -> anyhow::Result<Option<Section>> {
        let row = sqlx::query_as::<_, SqlSection>(&format!(
            "SELECT {} FROM sections WHERE id = ? AND is_active = 1",
            SECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    pub async fn active_section_by_slug(&self, slug: &str) -> anyhow::Result<Option<Section>> {
        let row = sqlx::query_as::<_, SqlSection>(&format!(
            "SELECT {} FROM sections WHERE slug = ? AND is_active = 1",
            SECTION_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Inserts or updates a section keyed by slug, returning its id.
    pub async fn upsert_section(
        &self,
        slug: &str,
        name: &str,
        description: &str,
        is_active: bool,
    ) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sections (slug, name, description, is_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(slug) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                is_active = excluded.is_active
            RETURNING id
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(description)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;

    #[tokio::test]
    async fn upsert_keeps_id_and_updates_fields() {
        let db = testing::db().await;
        let id = db.upsert_section("general", "General", "", true).await.unwrap();
        let again = db
            .upsert_section("general", "General Discussion", "talk", false)
            .await
            .unwrap();
        assert_eq!(id, again);

        assert!(db.active_section(id).await.unwrap().is_none());
        let all = db.list_sections().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "General Discussion");
        assert!(!all[0].is_active);
    }

    #[tokio::test]
    async fn only_active_sections_are_listed() {
        let db = testing::db().await;
        testing::section(&db, "tech", true).await;
        testing::section(&db, "archive", false).await;
        testing::section(&db, "general", true).await;

        let slugs: Vec<String> = db
            .list_active_sections()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();
        assert_eq!(slugs, vec!["general", "tech"]);
        assert!(db.active_section_by_slug("archive").await.unwrap().is_none());
        assert!(db.active_section_by_slug("tech").await.unwrap().is_some());
    }
}
