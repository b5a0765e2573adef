use crate::domain::comment::Comment;

/// Top-level comments, newest first. Replies are left out of this view.
/// Comments sharing a timestamp keep their source order.
pub fn visible_comments(comments: &[Comment]) -> Vec<&Comment> {
    let mut visible: Vec<&Comment> = comments
        .iter()
        .filter(|comment| comment.is_top_level())
        .collect();
    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::domain::user::UserRef;

    fn comment(id: &str, minute: u32, parent: Option<&str>) -> Comment {
        Comment {
            id: id.to_string(),
            author: UserRef::new("u-1"),
            text: format!("comment {id}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 12, minute, 0).unwrap(),
            parent_id: parent.map(str::to_string),
        }
    }

    fn ids(comments: &[&Comment]) -> Vec<String> {
        comments.iter().map(|comment| comment.id.clone()).collect()
    }

    #[test]
    fn drops_replies_and_orders_newest_first() {
        let comments = vec![
            comment("c1", 1, None),
            comment("c2", 2, None),
            comment("c3", 3, Some("c1")),
        ];
        assert_eq!(ids(&visible_comments(&comments)), ["c2", "c1"]);
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let comments = vec![
            comment("a", 5, None),
            comment("b", 5, None),
            comment("c", 9, None),
        ];
        assert_eq!(ids(&visible_comments(&comments)), ["c", "a", "b"]);
    }

    #[test]
    fn empty_thread_renders_nothing() {
        assert!(visible_comments(&[]).is_empty());
    }
}
