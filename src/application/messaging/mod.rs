//! Message handling - Ordered command rules and their handlers

pub mod handlers;
pub mod router;

pub use router::{CommandRouter, Context, Flow, Handler, HandlerResult, Outcome, Rule, RouterState};
