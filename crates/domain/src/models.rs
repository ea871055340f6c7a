use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;

pub type PostId = i64;
pub type CommentId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Post,
    Comment,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Post => "post",
            EntityType::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = BoardError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::Up),
            -1 => Ok(Direction::Down),
            _ => Err(BoardError::InvalidDirection),
        }
    }
}

/// Moderation state shared by posts and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Visible,
    Hidden,
    Frozen,
    Deleted,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Visible => "visible",
            Status::Hidden => "hidden",
            Status::Frozen => "frozen",
            Status::Deleted => "deleted",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Status::Visible)
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visible" => Ok(Status::Visible),
            "hidden" => Ok(Status::Hidden),
            "frozen" => Ok(Status::Frozen),
            "deleted" => Ok(Status::Deleted),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Hide,
    Show,
    Freeze,
    Delete,
    Pin,
    Unpin,
}

impl ModerationAction {
    /// Status the action moves the entity to; `None` for pin/unpin.
    pub fn status(self) -> Option<Status> {
        match self {
            ModerationAction::Show => Some(Status::Visible),
            ModerationAction::Hide => Some(Status::Hidden),
            ModerationAction::Freeze => Some(Status::Frozen),
            ModerationAction::Delete => Some(Status::Deleted),
            ModerationAction::Pin | ModerationAction::Unpin => None,
        }
    }
}

impl FromStr for ModerationAction {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hide" => Ok(ModerationAction::Hide),
            "show" => Ok(ModerationAction::Show),
            "freeze" => Ok(ModerationAction::Freeze),
            "delete" => Ok(ModerationAction::Delete),
            "pin" => Ok(ModerationAction::Pin),
            "unpin" => Ok(ModerationAction::Unpin),
            other => Err(BoardError::ValidationError(format!("Bad action: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub section_id: i64,
    pub section_name: String,
    pub section_slug: String,
    pub title: String,
    pub body_md: String,
    pub body_html: String,
    pub kind: String,
    pub score: i64,
    pub status: Status,
    pub is_sticky: bool,
    pub created_at: i64,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub body_md: String,
    pub body_html: String,
    pub score: i64,
    pub status: Status,
    pub created_at: i64,
}

/// A validated, rendered post ready to be written together with its tags.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub section_id: i64,
    pub title: String,
    pub body_md: String,
    pub body_html: String,
    pub kind: String,
    pub tag_ids: Vec<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub body_md: String,
    pub body_html: String,
    pub created_at: i64,
}

/// One ledger row. The raw token never reaches storage, only its fingerprint.
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub direction: Direction,
    pub token_fingerprint: String,
    pub created_at: i64,
}

/// Result of a vote that reached the ledger. The HTTP layer reports both as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Applied,
    AlreadyApplied,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_accepts_only_unit_values() {
        assert_eq!(Direction::try_from(1), Ok(Direction::Up));
        assert_eq!(Direction::try_from(-1), Ok(Direction::Down));
        assert_eq!(Direction::try_from(0), Err(BoardError::InvalidDirection));
        assert_eq!(Direction::try_from(2), Err(BoardError::InvalidDirection));
    }

    #[test]
    fn moderation_actions_map_to_status() {
        let hide: ModerationAction = "hide".parse().unwrap();
        assert_eq!(hide.status(), Some(Status::Hidden));
        let pin: ModerationAction = "pin".parse().unwrap();
        assert_eq!(pin.status(), None);
        assert!("nuke".parse::<ModerationAction>().is_err());
    }

    #[test]
    fn status_round_trips_through_text() {
        for s in [Status::Visible, Status::Hidden, Status::Frozen, Status::Deleted] {
            assert_eq!(s.as_str().parse::<Status>(), Ok(s));
        }
        assert!(Status::Visible.is_public());
        assert!(!Status::Frozen.is_public());
    }
}
