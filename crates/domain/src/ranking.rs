use serde::Serialize;

use crate::models::Post;

/// Seconds of age that weigh the same as one order of magnitude of score.
pub const TIME_DIVISOR: f64 = 45_000.0;

/// `log10(max(score, 1)) + created_at / 45000`. Scores at or below 1 rank alike.
pub fn hot_score(score: i64, created_at: i64) -> f64 {
    let s = score.max(1) as f64;
    s.log10() + created_at as f64 / TIME_DIVISOR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Hot,
    New,
    Top,
}

impl SortOrder {
    /// Unknown or missing values fall back to `Hot`.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("new") => SortOrder::New,
            Some("top") => SortOrder::Top,
            _ => SortOrder::Hot,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedPost {
    #[serde(flatten)]
    pub post: Post,
    pub hot: f64,
}

impl From<Post> for RankedPost {
    fn from(post: Post) -> Self {
        let hot = hot_score(post.score, post.created_at);
        RankedPost { post, hot }
    }
}

/// Orders posts for a listing. The sort is stable, so ties keep the order
/// storage returned them in.
pub fn rank(posts: Vec<Post>, order: SortOrder) -> Vec<RankedPost> {
    let mut ranked: Vec<RankedPost> = posts.into_iter().map(RankedPost::from).collect();

    match order {
        SortOrder::Hot => ranked.sort_by(|a, b| b.hot.total_cmp(&a.hot)),
        SortOrder::New => ranked.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at)),
        SortOrder::Top => ranked.sort_by(|a, b| b.post.score.cmp(&a.post.score)),
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    fn post(id: i64, score: i64, created_at: i64) -> Post {
        Post {
            id,
            section_id: 1,
            section_name: "General".into(),
            section_slug: "general".into(),
            title: format!("post {}", id),
            body_md: String::new(),
            body_html: String::new(),
            kind: "request".into(),
            score,
            status: Status::Visible,
            is_sticky: false,
            created_at,
            tags: vec![],
        }
    }

    fn ids(ranked: &[RankedPost]) -> Vec<i64> {
        ranked.iter().map(|r| r.post.id).collect()
    }

    #[test]
    fn newer_posts_rank_higher_at_equal_score() {
        let mut last = hot_score(1, 0);
        for t in [1, 45, 45_000, 1_700_000_000, 1_700_000_001] {
            let next = hot_score(1, t);
            assert!(next > last, "t={}", t);
            last = next;
        }
    }

    #[test]
    fn score_above_one_beats_score_one() {
        let t = 1_700_000_000;
        for s in [2, 10, 1_000] {
            assert!(hot_score(s, t) > hot_score(1, t));
        }
    }

    #[test]
    fn non_positive_scores_rank_like_one() {
        let t = 1_650_000_000;
        assert_eq!(hot_score(0, t), hot_score(1, t));
        assert_eq!(hot_score(-7, t), hot_score(1, t));
    }

    #[test]
    fn ten_votes_are_worth_half_a_day() {
        let t = 1_700_000_000;
        let diff = hot_score(10, t) - hot_score(1, t + 45_000);
        assert!(diff.abs() < 1e-6);
    }

    #[test]
    fn rank_orders_by_requested_key() {
        let posts = vec![post(1, 50, 1_000), post(2, 1, 900_000), post(3, 5, 2_000)];

        assert_eq!(ids(&rank(posts.clone(), SortOrder::Hot)), vec![2, 1, 3]);
        assert_eq!(ids(&rank(posts.clone(), SortOrder::New)), vec![2, 3, 1]);
        assert_eq!(ids(&rank(posts, SortOrder::Top)), vec![1, 3, 2]);
    }

    #[test]
    fn ties_keep_storage_order() {
        let posts = vec![post(7, 3, 100), post(4, 3, 100), post(9, 3, 100)];
        assert_eq!(ids(&rank(posts.clone(), SortOrder::Hot)), vec![7, 4, 9]);
        assert_eq!(ids(&rank(posts, SortOrder::Top)), vec![7, 4, 9]);
    }

    #[test]
    fn annotating_keeps_order_and_adds_hot() {
        let ranked: Vec<RankedPost> = vec![post(5, 1, 10), post(6, 40, 90_000)]
            .into_iter()
            .map(RankedPost::from)
            .collect();
        assert_eq!(ids(&ranked), vec![5, 6]);
        assert_eq!(ranked[1].hot, hot_score(40, 90_000));
    }

    #[test]
    fn unknown_sort_falls_back_to_hot() {
        assert_eq!(SortOrder::parse(None), SortOrder::Hot);
        assert_eq!(SortOrder::parse(Some("weird")), SortOrder::Hot);
        assert_eq!(SortOrder::parse(Some("top")), SortOrder::Top);
        assert_eq!(SortOrder::parse(Some("new")), SortOrder::New);
    }
}
