pub mod chat;
pub mod templates;
