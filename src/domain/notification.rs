use serde::Serialize;

pub const COMMENT_CREATED_EVENT: &str = "comment-created";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEvent {
    #[serde(skip)]
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub user: String,
    #[serde(rename = "ticketId")]
    pub ticket_id: String,
    pub author: String,
    pub link: String,
}

impl NotificationEvent {
    /// Tells the ticket author that someone commented on their ticket.
    pub fn comment_created(
        actor_name: &str,
        actor_id: Option<&str>,
        ticket_id: &str,
        ticket_author: &str,
    ) -> Self {
        Self {
            name: COMMENT_CREATED_EVENT,
            kind: "comment",
            message: format!("{actor_name} commented on your ticket."),
            user: actor_id.unwrap_or_default().to_string(),
            ticket_id: ticket_id.to_string(),
            author: ticket_author.to_string(),
            link: ticket_edit_link(ticket_id),
        }
    }
}

pub fn ticket_edit_link(ticket_id: &str) -> String {
    format!("/tickets/edit/{ticket_id}")
}
