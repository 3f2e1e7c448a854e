//! prick-bot - command-driven chat bot with an AI relay

pub mod domain;
pub mod application;
pub mod infrastructure;
