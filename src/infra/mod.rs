pub mod http;
pub mod realtime;
