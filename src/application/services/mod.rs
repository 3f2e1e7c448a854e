//! Application services - Business logic orchestration

pub mod message_service;
pub mod status;

pub use message_service::MessageService;
pub use status::BotProfile;
