pub mod comments;
pub mod posts;
pub mod sections;
pub mod tags;
pub mod votes;
