pub mod assignee_directory;
pub mod notifier;
pub mod ticket_store;

pub use assignee_directory::AssigneeDirectoryService;
pub use notifier::{DisabledNotifier, NotificationService};
pub use ticket_store::TicketStoreService;
