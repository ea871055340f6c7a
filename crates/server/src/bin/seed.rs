use anyhow::Context;
use dotenvy::dotenv;

use domain::{policy::DEFAULT_KIND, render::render_markdown, NewPost};
use plaza::config::Settings;
use storage::Db;

const WELCOME: &str = "Welcome to the plaza.\n\n\
No accounts here. Post what you need or what you can offer, \
and keep it kind. Pinned posts stay on top.";

const HOW_TO: &str = "## How it works\n\n\
- Pick a section and write a post in **Markdown**\n\
- Vote with the arrows, one vote per browser\n\
- Wait a little between posts";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let settings = Settings::new().context("Failed to load configuration")?;
    let url = settings.database.url;
    println!("Seeding {}", url);

    let db = Db::new(&url).await.context("Failed to open database")?;

    println!("\n[1/3] Sections...");
    let general = db
        .upsert_section("general", "General", "Anything goes", true)
        .await?;
    db.upsert_section("tech", "Tech", "Computers, code and gadgets", true)
        .await?;

    println!("\n[2/3] Tags...");
    db.upsert_tag("news", "News", Some("#ff7a59")).await?;
    db.upsert_tag("question", "Question", None).await?;
    db.upsert_tag("opinion", "Opinion", Some("#9b59b6")).await?;

    println!("\n[3/3] Welcome posts...");
    if db.count_posts().await? > 0 {
        println!("   -> Posts already present, skipping");
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp();
    let pinned = db
        .create_post(&NewPost {
            section_id: general,
            title: "Welcome".to_string(),
            body_md: WELCOME.to_string(),
            body_html: render_markdown(WELCOME),
            kind: DEFAULT_KIND.to_string(),
            tag_ids: vec![],
            created_at: now,
        })
        .await?;
    db.set_post_sticky(pinned, true).await?;

    db.create_post(&NewPost {
        section_id: general,
        title: "How posting works".to_string(),
        body_md: HOW_TO.to_string(),
        body_html: render_markdown(HOW_TO),
        kind: DEFAULT_KIND.to_string(),
        tag_ids: vec![],
        created_at: now,
    })
    .await?;
    println!("   -> Created 2 posts, #{} pinned", pinned);

    Ok(())
}
