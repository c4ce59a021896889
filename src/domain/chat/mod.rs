//! Group chat domain

mod entity;
mod repository;
mod validation;

pub use entity::{ChatMessage, Message, MessageId, NewMessage};
#[cfg(test)]
pub use repository::MockMessageRepository;
pub use repository::MessageRepository;
pub use validation::{validate_message_text, MessageValidationError};
