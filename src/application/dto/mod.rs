//! Data transfer objects for the application layer.

mod scenario_dto;
mod wire_dto;

pub use scenario_dto::ScenarioDto;
pub use wire_dto::{
    WireAction, WireButton, WireCallReason, WireContentMessage, WireDocument,
    WireDocumentAttribute, WireFlags, WireForwardHeader, WireGame, WireGeoPoint, WireMedia,
    WireMessage, WirePhoto, WirePoll, WireReplyMarkup, WireServiceMessage, WireWebPage,
};
