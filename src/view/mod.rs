pub mod comments;
pub mod composer;
pub mod form;
pub mod render;
