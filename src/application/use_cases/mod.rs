//! Use case implementations.

mod apply_edit_use_case;
mod create_item_use_case;
mod load_scenario_use_case;
mod send_pipeline;

pub use apply_edit_use_case::ApplyEditUseCase;
pub use create_item_use_case::{CreateItemUseCase, MessageOrigin, UNSUPPORTED_UPDATE_LINK};
pub use load_scenario_use_case::LoadScenarioUseCase;
pub use send_pipeline::SendPipeline;
