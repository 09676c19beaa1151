mod media_check;
mod service_text;
mod wire_mapper;

pub use media_check::{MediaCheckResult, MediaCheckService};
pub use service_text::{EMPTY_MESSAGE_TEXT, ServiceTextService};
pub use wire_mapper::WireMapper;
