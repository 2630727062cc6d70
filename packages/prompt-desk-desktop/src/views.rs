//! View modules for the chat window

pub mod chat;
