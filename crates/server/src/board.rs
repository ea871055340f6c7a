use domain::{
    policy::{self, ContentPolicy, DEFAULT_KIND},
    ranking::{self, RankedPost, SortOrder},
    render::render_markdown,
    token, BoardError, Comment, Direction, EntityType, ModerationAction, NewComment, NewPost,
    Post, Section, Tag, TokenCodec, VoteOutcome, VoteRecord,
};
use serde::Serialize;
use storage::{Db, PostFilter};
use tracing::{info, warn};

use crate::error::ApiError;

const ADMIN_RECENT_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub post_cooldown: i64,
    pub comment_cooldown: i64,
}

#[derive(Debug, Default)]
pub struct PostDraft {
    pub section_id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub kind: Option<String>,
    pub tag_ids: Vec<i64>,
    pub token: Option<String>,
}

#[derive(Debug, Default)]
pub struct CommentDraft {
    pub post_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub body: Option<String>,
    pub token: Option<String>,
}

/// A write that went through, with the token the client should keep.
#[derive(Debug)]
pub struct Created {
    pub id: i64,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize)]
pub struct SectionPage {
    pub section: Section,
    pub posts: Vec<RankedPost>,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub sections: Vec<Section>,
    pub tags: Vec<Tag>,
}

/// Composes the cooldown codec, the content policy and the store into the
/// board's write and read operations.
#[derive(Clone)]
pub struct Board {
    db: Db,
    codec: TokenCodec,
    policy: ContentPolicy,
    limits: Limits,
}

impl Board {
    pub fn new(db: Db, codec: TokenCodec, policy: ContentPolicy, limits: Limits) -> Self {
        Self {
            db,
            codec,
            policy,
            limits,
        }
    }

    fn check_cooldown(&self, now: i64, token: &str, min_interval: i64) -> Result<(), BoardError> {
        let retry_after = self.codec.remaining(now, token, min_interval);
        if retry_after > 0 {
            return Err(BoardError::CooldownActive { retry_after });
        }
        Ok(())
    }

    pub async fn create_post(&self, now: i64, draft: PostDraft) -> Result<Created, ApiError> {
        let section_id = draft
            .section_id
            .ok_or_else(|| BoardError::missing("sectionId"))?;
        let title = policy::required("title", draft.title.as_deref())?;
        let body = policy::required("bodyRaw", draft.body.as_deref())?;
        let token = draft.token.as_deref().unwrap_or_default();

        self.check_cooldown(now, token, self.limits.post_cooldown)?;
        self.policy.check_links(body)?;

        if self.db.active_section(section_id).await?.is_none() {
            warn!("Post rejected: section {} is missing or inactive", section_id);
            return Err(BoardError::InvalidSection.into());
        }

        let kind = draft
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(DEFAULT_KIND);

        let new_post = NewPost {
            section_id,
            title: title.to_string(),
            body_md: body.to_string(),
            body_html: render_markdown(body),
            kind: kind.to_string(),
            tag_ids: policy::dedupe_ids(&draft.tag_ids),
            created_at: now,
        };
        let id = self.db.create_post(&new_post).await?;
        info!("Post {} created in section {}", id, section_id);

        Ok(Created {
            id,
            token: self.codec.reissue(now, self.limits.post_cooldown, token),
        })
    }

    pub async fn create_comment(&self, now: i64, draft: CommentDraft) -> Result<Created, ApiError> {
        let post_id = draft.post_id.ok_or_else(|| BoardError::missing("postId"))?;
        let body = policy::required("bodyRaw", draft.body.as_deref())?;
        let token = draft.token.as_deref().unwrap_or_default();

        self.check_cooldown(now, token, self.limits.comment_cooldown)?;
        self.policy.check_links(body)?;

        let post = self
            .db
            .get_post(post_id)
            .await?
            .filter(|p| p.status.is_public())
            .ok_or(BoardError::InvalidPost)?;

        if let Some(parent_id) = draft.parent_id {
            match self.db.get_comment(parent_id).await? {
                Some(parent) if parent.post_id == post.id => {}
                _ => {
                    return Err(BoardError::ValidationError(format!(
                        "Invalid parentId: {}",
                        parent_id
                    ))
                    .into())
                }
            }
        }

        let new_comment = NewComment {
            post_id: post.id,
            parent_id: draft.parent_id,
            body_md: body.to_string(),
            body_html: render_markdown(body),
            created_at: now,
        };
        // the post can be hidden between the read above and this insert
        let id = self
            .db
            .create_comment(&new_comment)
            .await?
            .ok_or(BoardError::InvalidPost)?;
        info!("Comment {} created on post {}", id, post.id);

        Ok(Created {
            id,
            token: self.codec.reissue(now, self.limits.comment_cooldown, token),
        })
    }

    pub async fn cast_vote(
        &self,
        now: i64,
        entity_type: EntityType,
        entity_id: i64,
        direction: Option<i64>,
        token: Option<&str>,
    ) -> Result<VoteOutcome, ApiError> {
        let direction = Direction::try_from(direction.ok_or(BoardError::InvalidDirection)?)?;
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(BoardError::MissingToken)?;

        let record = VoteRecord {
            entity_type,
            entity_id,
            direction,
            token_fingerprint: token::fingerprint(token),
            created_at: now,
        };

        match self.db.record_vote(&record).await? {
            Some(outcome) => Ok(outcome),
            None => Err(BoardError::NotFound(entity_type.to_string()).into()),
        }
    }

    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        order: SortOrder,
    ) -> Result<Vec<RankedPost>, ApiError> {
        let posts = self.db.list_posts(filter).await?;
        Ok(ranking::rank(posts, order))
    }

    pub async fn post_detail(&self, id: i64) -> Result<PostDetail, ApiError> {
        let post = self
            .db
            .get_post(id)
            .await?
            .filter(|p| p.status.is_public())
            .ok_or_else(|| BoardError::NotFound("post".into()))?;
        let comments = self.db.list_comments(post.id).await?;
        Ok(PostDetail { post, comments })
    }

    pub async fn sections(&self) -> Result<Vec<Section>, ApiError> {
        Ok(self.db.list_active_sections().await?)
    }

    pub async fn section_page(&self, slug: &str) -> Result<SectionPage, ApiError> {
        let section = self
            .db
            .active_section_by_slug(slug)
            .await?
            .ok_or_else(|| BoardError::NotFound("section".into()))?;
        let posts = self
            .db
            .list_posts(&PostFilter {
                section: Some(section.slug.clone()),
                ..Default::default()
            })
            .await?;
        Ok(SectionPage {
            section,
            posts: posts.into_iter().map(RankedPost::from).collect(),
        })
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, ApiError> {
        Ok(self.db.list_tags().await?)
    }

    pub async fn overview(&self) -> Result<Overview, ApiError> {
        Ok(Overview {
            posts: self.db.recent_posts(ADMIN_RECENT_LIMIT).await?,
            comments: self.db.recent_comments(ADMIN_RECENT_LIMIT).await?,
            sections: self.db.list_sections().await?,
            tags: self.db.list_tags().await?,
        })
    }

    pub async fn moderate_post(&self, id: i64, action: ModerationAction) -> Result<(), ApiError> {
        let found = match action {
            ModerationAction::Pin => self.db.set_post_sticky(id, true).await?,
            ModerationAction::Unpin => self.db.set_post_sticky(id, false).await?,
            other => match other.status() {
                Some(status) => self.db.set_post_status(id, status).await?,
                None => false,
            },
        };
        if !found {
            return Err(BoardError::NotFound("post".into()).into());
        }
        info!("Post {} moderated: {:?}", id, action);
        Ok(())
    }

    pub async fn moderate_comment(&self, id: i64, action: ModerationAction) -> Result<(), ApiError> {
        let status = action
            .status()
            .ok_or_else(|| BoardError::ValidationError(format!("Bad action: {:?}", action)))?;
        if !self.db.set_comment_status(id, status).await? {
            return Err(BoardError::NotFound("comment".into()).into());
        }
        info!("Comment {} moderated: {:?}", id, action);
        Ok(())
    }

    pub async fn upsert_section(
        &self,
        slug: Option<&str>,
        name: Option<&str>,
        description: Option<&str>,
        is_active: bool,
    ) -> Result<i64, ApiError> {
        let slug = policy::required("slug", slug)?;
        let name = policy::required("name", name)?;
        let description = description.map(str::trim).unwrap_or_default();
        Ok(self
            .db
            .upsert_section(slug, name, description, is_active)
            .await?)
    }

    pub async fn upsert_tag(
        &self,
        slug: Option<&str>,
        name: Option<&str>,
        color: Option<&str>,
    ) -> Result<i64, ApiError> {
        let slug = policy::required("slug", slug)?;
        let name = policy::required("name", name)?;
        let color = color.map(str::trim).filter(|c| !c.is_empty());
        Ok(self.db.upsert_tag(slug, name, color).await?)
    }

    pub async fn set_post_tags(&self, post_id: i64, tag_ids: &[i64]) -> Result<u64, ApiError> {
        if self.db.get_post(post_id).await?.is_none() {
            return Err(BoardError::NotFound("post".into()).into());
        }
        Ok(self
            .db
            .replace_post_tags(post_id, &policy::dedupe_ids(tag_ids))
            .await?)
    }
}
