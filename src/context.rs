use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::user::Session;
use crate::services::{AssigneeDirectoryService, NotificationService, TicketStoreService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub ticket_store: Arc<dyn TicketStoreService>,
    pub assignee_directory: Arc<dyn AssigneeDirectoryService>,
    pub notifier: Arc<dyn NotificationService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        ticket_store: Arc<dyn TicketStoreService>,
        assignee_directory: Arc<dyn AssigneeDirectoryService>,
        notifier: Arc<dyn NotificationService>,
    ) -> Self {
        Self {
            config,
            ticket_store,
            assignee_directory,
            notifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.config.session
    }
}
