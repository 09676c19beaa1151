//! Application layer: wire payloads, their classification and the use cases
//! that apply them to conversations.

/// Data transfer objects.
pub mod dto;
/// Classification and mapping services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ScenarioDto, WireMessage};
pub use use_cases::{
    ApplyEditUseCase, CreateItemUseCase, LoadScenarioUseCase, MessageOrigin, SendPipeline,
};
