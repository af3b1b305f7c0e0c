//! Cook-mode engine: remote assistant access, effect execution and the timer
//! tick driver.
mod assistant;
mod engine;
mod ticker;
mod types;

pub use assistant::{Assistant, AssistantSettings, HttpAssistant};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use ticker::TickDriver;
pub use types::{
    ActionPayload, AssistantError, ChatReply, EngineCommand, EngineEvent, FailureKind,
    RemoteSessionId,
};
