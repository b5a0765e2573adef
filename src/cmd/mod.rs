pub mod assignees;
pub mod config;
pub mod ticket;
