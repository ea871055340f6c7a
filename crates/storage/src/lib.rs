use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::{fs, path::Path};
use tracing::info;

mod models;
mod repo;

pub use repo::posts::PostFilter;

#[derive(Clone)]
pub struct Db {
    pub(crate) pool: Pool<Sqlite>,
}

impl Db {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        let in_memory = db_url.contains(":memory:");
        if db_url.starts_with("sqlite://") && !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://");
            let path = Path::new(path_str);
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
        }
        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        let mut options = SqlitePoolOptions::new();
        if in_memory {
            // each connection to :memory: is its own database
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options.connect(db_url).await?;

        sqlx::query("PRAGMA journal_mode = WAL;")
            .execute(&pool)
            .await?;
        sqlx::query("PRAGMA synchronous = NORMAL;")
            .execute(&pool)
            .await?;
        sqlx::migrate!("../../migrations").run(&pool).await?;

        info!("Database ready at {}", db_url);
        Ok(Self { pool })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Db;

    pub async fn db() -> Db {
        Db::new("sqlite::memory:").await.unwrap()
    }

    pub async fn section(db: &Db, slug: &str, active: bool) -> i64 {
        db.upsert_section(slug, slug, "", active).await.unwrap()
    }

    pub async fn tag(db: &Db, slug: &str) -> i64 {
        db.upsert_tag(slug, slug, None).await.unwrap()
    }
}
