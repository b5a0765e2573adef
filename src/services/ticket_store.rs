use async_trait::async_trait;

use crate::domain::ticket::{Ticket, TicketUpdate};
use crate::error::AppResult;

#[async_trait]
pub trait TicketStoreService: Send + Sync {
    async fn fetch_ticket(&self, id: &str) -> AppResult<Ticket>;
    /// Returns the confirmation message supplied by the server.
    async fn update_ticket(&self, update: TicketUpdate) -> AppResult<String>;
    async fn create_comment(&self, ticket_id: &str, text: &str) -> AppResult<()>;
}
