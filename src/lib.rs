//! histitem - message entities of a chat history.
//!
//! Classifies raw message payloads into content, placeholder and service
//! messages, attaches their optional components and answers the permission
//! and read-state questions a client asks about each message.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing configuration and file loading.
pub mod infrastructure;
/// Presentation layer containing text reports.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "histitem";
