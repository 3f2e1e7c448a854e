//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Command rules, handlers and the router that evaluates them
//! - Services: Event dispatch and status formatting

pub mod errors;
pub mod messaging;
pub mod services;
