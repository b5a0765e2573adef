pub mod ticket_view;
