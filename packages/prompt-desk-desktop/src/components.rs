//! Reusable UI components for the chat window

pub mod message;
pub mod prompt_input;
