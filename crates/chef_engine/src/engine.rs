use std::io;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use chef_logging::{chef_debug, chef_warn};
use tokio::runtime::Runtime;

use crate::assistant::{Assistant, AssistantSettings, HttpAssistant};
use crate::ticker::TickDriver;
use crate::{AssistantError, EngineCommand, EngineEvent};

/// Receives engine results. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Owns the async runtime that executes remote commands. Each command runs
/// as its own task; results are delivered to the sink as they complete.
pub struct EngineHandle {
    runtime: Runtime,
    assistant: Arc<dyn Assistant>,
    sink: Arc<dyn EventSink>,
}

impl EngineHandle {
    /// Engine backed by the HTTP assistant.
    pub fn new(settings: AssistantSettings, sink: Arc<dyn EventSink>) -> io::Result<Self> {
        let assistant = HttpAssistant::new(settings)
            .map_err(|err: AssistantError| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        Self::with_assistant(Arc::new(assistant), sink)
    }

    pub fn with_assistant(
        assistant: Arc<dyn Assistant>,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("chef-engine")
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            assistant,
            sink,
        })
    }

    pub fn submit(&self, command: EngineCommand) {
        let assistant = self.assistant.clone();
        let sink = self.sink.clone();
        self.runtime.spawn(async move {
            let event = handle_command(assistant.as_ref(), command).await;
            sink.emit(event);
        });
    }

    /// Starts a periodic tick on the engine runtime. Dropping the returned
    /// driver stops it.
    pub fn start_ticker<F>(&self, period: Duration, on_tick: F) -> TickDriver
    where
        F: FnMut(u64) + Send + 'static,
    {
        TickDriver::start(self.runtime.handle(), period, on_tick)
    }

    /// Stops accepting work and waits up to `timeout` for in-flight commands.
    pub fn shutdown(self, timeout: Duration) {
        self.runtime.shutdown_timeout(timeout);
    }
}

async fn handle_command(assistant: &dyn Assistant, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::CreateSession { ticket, recipe_id } => {
            chef_debug!("Creating remote session for recipe {}", recipe_id);
            let result = assistant.create_session(&recipe_id).await;
            log_failure("create session", &result);
            EngineEvent::SessionCreated { ticket, result }
        }
        EngineCommand::DeleteSession { session_id } => {
            let result = assistant.delete_session(&session_id).await;
            log_failure("delete session", &result);
            EngineEvent::SessionDeleted { session_id, result }
        }
        EngineCommand::FetchStepActions {
            ticket,
            session_id,
            step,
        } => {
            let result = assistant.step_actions(&session_id, step).await;
            log_failure("fetch step actions", &result);
            EngineEvent::StepActionsLoaded {
                ticket,
                step,
                result,
            }
        }
        EngineCommand::SendChat {
            ticket,
            session_id,
            message,
        } => {
            let result = assistant.send_chat(&session_id, &message).await;
            log_failure("send chat", &result);
            EngineEvent::ChatReplied { ticket, result }
        }
    }
}

fn log_failure<T>(operation: &str, result: &Result<T, AssistantError>) {
    if let Err(err) = result {
        chef_warn!("Assistant {} failed: {}", operation, err);
    }
}
