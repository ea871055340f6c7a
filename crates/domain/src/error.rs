use thiserror::Error;

/// Rejections the board reports back to the client. Storage failures are
/// not part of this taxonomy and travel as `anyhow::Error` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Cooldown in effect, retry in {retry_after}s")]
    CooldownActive { retry_after: i64 },

    #[error("Too many links (max {max})")]
    TooManyLinks { max: usize },

    #[error("Invalid section")]
    InvalidSection,

    #[error("Invalid post")]
    InvalidPost,

    #[error("Vote direction must be 1 or -1")]
    InvalidDirection,

    #[error("Missing token")]
    MissingToken,

    #[error("{0} not found")]
    NotFound(String),
}

impl BoardError {
    /// Stable identifier sent to clients as `errorKind`.
    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::ValidationError(_) => "ValidationError",
            BoardError::CooldownActive { .. } => "CooldownActive",
            BoardError::TooManyLinks { .. } => "TooManyLinks",
            BoardError::InvalidSection => "InvalidSection",
            BoardError::InvalidPost => "InvalidPost",
            BoardError::InvalidDirection => "InvalidDirection",
            BoardError::MissingToken => "MissingToken",
            BoardError::NotFound(_) => "NotFound",
        }
    }

    pub fn missing(field: &str) -> Self {
        BoardError::ValidationError(format!("Missing field: {}", field))
    }
}
