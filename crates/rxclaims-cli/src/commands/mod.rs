//! CLI command handlers

pub mod ask;
pub mod chat;
pub mod inspect;
pub mod session;
pub mod status;
