use crate::error::BoardError;

pub const DEFAULT_MAX_LINKS: usize = 5;
pub const DEFAULT_KIND: &str = "request";

/// Counts `http://` and `https://` occurrences, case-insensitively.
pub fn count_links(text: &str) -> usize {
    let lower = text.to_ascii_lowercase();
    lower.matches("http://").count() + lower.matches("https://").count()
}

/// Trims a required text field, rejecting it when missing or blank.
pub fn required<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, BoardError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BoardError::missing(field)),
    }
}

/// Drops repeated ids, keeping first occurrences in order.
pub fn dedupe_ids(ids: &[i64]) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct ContentPolicy {
    pub max_links: usize,
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self {
            max_links: DEFAULT_MAX_LINKS,
        }
    }
}

impl ContentPolicy {
    pub fn check_links(&self, body: &str) -> Result<(), BoardError> {
        if count_links(body) > self.max_links {
            return Err(BoardError::TooManyLinks {
                max: self.max_links,
            });
        }
        Ok(())
    }
}
