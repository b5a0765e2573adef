use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::UserRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: UserRef,
    #[serde(alias = "body", alias = "content")]
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reply_reference() {
        let comment: Comment = serde_json::from_str(
            r#"{"_id":"c-2","author":"u-1","text":"me too","createdAt":"2024-03-01T10:00:00.000Z","parentId":"c-1"}"#,
        )
        .unwrap();
        assert!(!comment.is_top_level());
        assert_eq!(comment.parent_id.as_deref(), Some("c-1"));
    }

    #[test]
    fn null_parent_is_top_level() {
        let comment: Comment = serde_json::from_str(
            r#"{"_id":"c-1","author":{"_id":"u-1","username":"ada"},"body":"hi","createdAt":"2024-03-01T09:00:00Z","parentId":null}"#,
        )
        .unwrap();
        assert!(comment.is_top_level());
        assert_eq!(comment.text, "hi");
        assert_eq!(comment.author.display_name(), "ada");
    }
}
