pub mod assignee;
pub mod comment;
pub mod notification;
pub mod ticket;
pub mod user;
