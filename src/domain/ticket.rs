use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::comment::Comment;
use crate::domain::user::UserRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    Unassigned,
    AwaitingFeedback,
    Complete,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 3] = [
        TicketStatus::Unassigned,
        TicketStatus::AwaitingFeedback,
        TicketStatus::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Unassigned => "unassigned",
            TicketStatus::AwaitingFeedback => "awaiting-feedback",
            TicketStatus::Complete => "complete",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Unassigned => "Unassigned",
            TicketStatus::AwaitingFeedback => "Awaiting Feedback",
            TicketStatus::Complete => "Complete",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "unassigned" => Some(TicketStatus::Unassigned),
            "awaiting-feedback" | "awaiting_feedback" => Some(TicketStatus::AwaitingFeedback),
            "complete" => Some(TicketStatus::Complete),
            _ => None,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub status: TicketStatus,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignees: Vec<UserRef>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Ticket {
    pub fn assignee_ids(&self) -> Vec<String> {
        self.assignees.iter().map(|user| user.id.clone()).collect()
    }
}

/// Ticket fields the viewer can edit in place. All of them are reserved to
/// the ticket author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketEdit {
    Title(String),
    Status(TicketStatus),
    Description(String),
}

impl TicketEdit {
    pub fn field_name(&self) -> &'static str {
        match self {
            TicketEdit::Title(_) => "title",
            TicketEdit::Status(_) => "status",
            TicketEdit::Description(_) => "description",
        }
    }

    pub fn apply(self, ticket: &mut Ticket) {
        match self {
            TicketEdit::Title(title) => ticket.title = title,
            TicketEdit::Status(status) => ticket.status = status,
            TicketEdit::Description(description) => ticket.description = description,
        }
    }
}

/// Body of an update request: the full local snapshot plus the selected
/// assignee identifiers, which replace the ticket's assignee set.
#[derive(Debug, Clone, Serialize)]
pub struct TicketUpdate {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub status: TicketStatus,
    pub author: String,
    pub description: String,
    pub assignees: Vec<String>,
}

impl TicketUpdate {
    pub fn from_snapshot(ticket: &Ticket, assignee_ids: &[String]) -> Self {
        Self {
            id: ticket.id.clone(),
            title: ticket.title.clone(),
            status: ticket.status,
            author: ticket.author.clone(),
            description: ticket.description.clone(),
            assignees: assignee_ids.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ticket_status() {
        assert_eq!(
            TicketStatus::from_str("awaiting-feedback"),
            Some(TicketStatus::AwaitingFeedback)
        );
        assert_eq!(
            TicketStatus::from_str("COMPLETE"),
            Some(TicketStatus::Complete)
        );
        assert_eq!(TicketStatus::from_str("closed"), None);
    }

    #[test]
    fn deserializes_ticket_payload() {
        let payload = r#"{
            "_id": "t-1",
            "title": "Printer on fire",
            "status": "awaiting-feedback",
            "author": "u-1",
            "description": "Again.",
            "assignees": [{"_id": "u-2", "firstName": "Ada", "lastName": "Lovelace"}, "u-3"],
            "comments": []
        }"#;
        let ticket: Ticket = serde_json::from_str(payload).unwrap();
        assert_eq!(ticket.status, TicketStatus::AwaitingFeedback);
        assert_eq!(ticket.assignee_ids(), vec!["u-2", "u-3"]);
        assert_eq!(ticket.assignees[0].display_name(), "Ada Lovelace");
    }

    #[test]
    fn update_carries_selected_assignees() {
        let ticket = Ticket {
            id: "t-1".to_string(),
            title: "Title".to_string(),
            status: TicketStatus::Unassigned,
            author: "u-1".to_string(),
            description: String::new(),
            assignees: vec![UserRef::new("u-9")],
            comments: Vec::new(),
        };
        let update = TicketUpdate::from_snapshot(&ticket, &["u-2".to_string()]);
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["_id"], "t-1");
        assert_eq!(body["status"], "unassigned");
        assert_eq!(body["assignees"], serde_json::json!(["u-2"]));
    }
}
