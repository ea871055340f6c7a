pub mod admin;
pub mod catalog;
pub mod comments;
pub mod posts;
pub mod votes;

use chrono::Utc;

pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}
