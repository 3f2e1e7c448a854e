//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Variable persistence
//! - LLM: Completion API client
//! - Adapters: Platform integrations (Console, Telegram)
//! - Server: Liveness endpoint
//! - System: Host statistics

pub mod config;
pub mod storage;
pub mod llm;
pub mod adapters;
pub mod server;
pub mod system;
