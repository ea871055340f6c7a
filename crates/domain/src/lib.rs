mod error;
mod models;
pub mod policy;
pub mod ranking;
pub mod render;
pub mod token;

pub use error::BoardError;
pub use models::{
    Comment, CommentId, Direction, EntityType, ModerationAction, NewComment, NewPost, Post,
    PostId, Section, Status, Tag, VoteOutcome, VoteRecord,
};
pub use ranking::{hot_score, RankedPost, SortOrder};
pub use token::{Cooldown, Token, TokenCodec};
