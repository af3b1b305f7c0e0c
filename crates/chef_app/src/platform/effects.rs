use std::io;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use chef_core::{
    ChatReply, Effect, Msg, RemoteFailure, SessionToken, SuggestedAction, TimerId,
};
use chef_engine::{
    ActionPayload, Assistant, AssistantError, AssistantSettings, EngineCommand, EngineEvent,
    EngineHandle, EventSink, TickDriver,
};
use chef_logging::{chef_debug, chef_info, chef_warn};

/// Everything the app loop reacts to, from any thread.
#[derive(Debug)]
pub enum LoopEvent {
    Core(Msg),
    Line(String),
    InputClosed,
    TimersCompleted(Vec<TimerId>),
    RemoteDeleted,
}

/// Forwards engine results to the app loop as core messages.
pub struct LoopSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl LoopSink {
    pub fn new(tx: mpsc::Sender<LoopEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for LoopSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(map_event(event));
    }
}

/// Remote session lifecycle calls handed to the engine by one `enqueue`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Submitted {
    pub creates: usize,
    pub deletes: usize,
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: AssistantSettings, tx: mpsc::Sender<LoopEvent>) -> io::Result<Self> {
        let engine = EngineHandle::new(settings, Arc::new(LoopSink::new(tx)))?;
        Ok(Self { engine })
    }

    pub fn with_assistant(
        assistant: Arc<dyn Assistant>,
        tx: mpsc::Sender<LoopEvent>,
    ) -> io::Result<Self> {
        let engine = EngineHandle::with_assistant(assistant, Arc::new(LoopSink::new(tx)))?;
        Ok(Self { engine })
    }

    /// Submits effects in order and reports the session creates and deletes
    /// among them.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Submitted {
        let mut submitted = Submitted::default();
        for effect in effects {
            let command = match effect {
                Effect::CreateRemoteSession { token, recipe_id } => {
                    chef_info!("CreateRemoteSession token={} recipe={}", token, recipe_id);
                    submitted.creates += 1;
                    EngineCommand::CreateSession {
                        ticket: token.0,
                        recipe_id,
                    }
                }
                Effect::FetchStepActions {
                    token,
                    remote_id,
                    step,
                } => {
                    chef_debug!("FetchStepActions token={} step={}", token, step);
                    EngineCommand::FetchStepActions {
                        ticket: token.0,
                        session_id: remote_id,
                        step,
                    }
                }
                Effect::SendChat {
                    token,
                    remote_id,
                    text,
                } => {
                    chef_debug!("SendChat token={} text_len={}", token, text.len());
                    EngineCommand::SendChat {
                        ticket: token.0,
                        session_id: remote_id,
                        message: text,
                    }
                }
                Effect::DeleteRemoteSession { remote_id } => {
                    chef_info!("DeleteRemoteSession {}", remote_id);
                    submitted.deletes += 1;
                    EngineCommand::DeleteSession {
                        session_id: remote_id,
                    }
                }
            };
            self.engine.submit(command);
        }
        submitted
    }

    pub fn start_ticker<F>(&self, period: Duration, on_tick: F) -> TickDriver
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.engine.start_ticker(period, on_tick)
    }

    pub fn shutdown(self, timeout: Duration) {
        self.engine.shutdown(timeout);
    }
}

fn map_event(event: EngineEvent) -> LoopEvent {
    match event {
        EngineEvent::SessionCreated { ticket, result } => {
            LoopEvent::Core(Msg::RemoteSessionCreated {
                token: SessionToken(ticket),
                result: result.map_err(map_failure),
            })
        }
        EngineEvent::SessionDeleted { session_id, result } => {
            if let Err(err) = result {
                chef_warn!("Remote session {} was not deleted: {}", session_id, err);
            }
            LoopEvent::RemoteDeleted
        }
        EngineEvent::StepActionsLoaded {
            ticket,
            step,
            result,
        } => LoopEvent::Core(Msg::StepActionsLoaded {
            token: SessionToken(ticket),
            step,
            result: result
                .map(|actions| actions.into_iter().map(map_action).collect())
                .map_err(map_failure),
        }),
        EngineEvent::ChatReplied { ticket, result } => LoopEvent::Core(Msg::ChatReplied {
            token: SessionToken(ticket),
            result: result
                .map(|reply| ChatReply {
                    text: reply.message,
                    actions: reply.suggested_actions.into_iter().map(map_action).collect(),
                })
                .map_err(map_failure),
        }),
    }
}

fn map_action(payload: ActionPayload) -> SuggestedAction {
    match payload {
        ActionPayload::Timer {
            duration,
            appliance,
            label,
            description,
        } => SuggestedAction::Timer {
            duration_minutes: duration,
            appliance_hint: appliance,
            label,
            description,
        },
        ActionPayload::Temperature {
            value,
            appliance,
            description,
        } => SuggestedAction::Temperature {
            value_fahrenheit: value,
            appliance_hint: appliance,
            description,
        },
    }
}

fn map_failure(err: AssistantError) -> RemoteFailure {
    RemoteFailure::new(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Instant;

    use chef_core::{update, AppState, Recipe, Sender};
    use chef_engine::FailureKind;
    use pretty_assertions::assert_eq;

    use super::*;

    const WAIT: Duration = Duration::from_secs(5);

    #[derive(Default)]
    struct SlowAssistant {
        create_delay: Duration,
        chats: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Assistant for SlowAssistant {
        async fn create_session(&self, recipe_id: &str) -> Result<String, AssistantError> {
            tokio::time::sleep(self.create_delay).await;
            Ok(format!("remote-{recipe_id}"))
        }

        async fn delete_session(&self, _session_id: &str) -> Result<(), AssistantError> {
            Ok(())
        }

        async fn step_actions(
            &self,
            _session_id: &str,
            _step: usize,
        ) -> Result<Vec<ActionPayload>, AssistantError> {
            Ok(vec![ActionPayload::Temperature {
                value: Some(400),
                appliance: "OVEN".to_string(),
                description: "Preheat".to_string(),
            }])
        }

        async fn send_chat(
            &self,
            _session_id: &str,
            message: &str,
        ) -> Result<chef_engine::ChatReply, AssistantError> {
            self.chats.lock().unwrap().push(message.to_string());
            Ok(chef_engine::ChatReply {
                message: format!("re: {message}"),
                suggested_actions: Vec::new(),
            })
        }
    }

    fn recipe() -> Recipe {
        Recipe {
            id: "soup".to_string(),
            title: "Soup".to_string(),
            ingredients: Vec::new(),
            steps: vec!["Chop.".to_string(), "Simmer.".to_string()],
            servings: 2,
        }
    }

    #[test]
    fn maps_payloads_and_failures_into_core_messages() {
        let event = map_event(EngineEvent::StepActionsLoaded {
            ticket: 3,
            step: 1,
            result: Ok(vec![ActionPayload::Timer {
                duration: 12,
                appliance: "stove".to_string(),
                label: String::new(),
                description: "Simmer".to_string(),
            }]),
        });
        let LoopEvent::Core(Msg::StepActionsLoaded {
            token,
            step,
            result,
        }) = event
        else {
            panic!("unexpected event");
        };
        assert_eq!(token, SessionToken(3));
        assert_eq!(step, 1);
        assert_eq!(
            result.unwrap(),
            vec![SuggestedAction::Timer {
                duration_minutes: 12,
                appliance_hint: "stove".to_string(),
                label: String::new(),
                description: "Simmer".to_string(),
            }]
        );

        let event = map_event(EngineEvent::ChatReplied {
            ticket: 3,
            result: Err(AssistantError {
                kind: FailureKind::Timeout,
                message: "slow".to_string(),
            }),
        });
        let LoopEvent::Core(Msg::ChatReplied { result, .. }) = event else {
            panic!("unexpected event");
        };
        assert_eq!(result, Err(RemoteFailure::new("timeout: slow")));
    }

    #[test]
    fn enqueue_counts_session_lifecycle_calls() {
        let (tx, rx) = mpsc::channel();
        let runner =
            EffectRunner::with_assistant(Arc::new(SlowAssistant::default()), tx).unwrap();

        let submitted = runner.enqueue(vec![
            Effect::CreateRemoteSession {
                token: SessionToken(1),
                recipe_id: "soup".to_string(),
            },
            Effect::DeleteRemoteSession {
                remote_id: "remote-x".to_string(),
            },
        ]);

        assert_eq!(
            submitted,
            Submitted {
                creates: 1,
                deletes: 1,
            }
        );
        let events = [rx.recv_timeout(WAIT).unwrap(), rx.recv_timeout(WAIT).unwrap()];
        assert!(events
            .iter()
            .any(|event| matches!(event, LoopEvent::RemoteDeleted)));
        assert!(events.iter().any(|event| matches!(
            event,
            LoopEvent::Core(Msg::RemoteSessionCreated { token: SessionToken(1), result: Ok(_) })
        )));
        runner.shutdown(Duration::from_secs(1));
    }

    #[test]
    fn chats_queued_during_slow_creation_reach_the_assistant_in_order() {
        chef_logging::initialize_for_tests();
        let assistant = Arc::new(SlowAssistant {
            create_delay: Duration::from_millis(200),
            ..SlowAssistant::default()
        });
        let (tx, rx) = mpsc::channel();
        let runner = EffectRunner::with_assistant(assistant.clone(), tx).unwrap();

        let mut state = AppState::default();
        for msg in [
            Msg::StartCooking(recipe()),
            Msg::ChatSubmitted("how thick?".to_string()),
            Msg::ChatSubmitted("and salt?".to_string()),
        ] {
            let (next, effects) = update(state, msg);
            state = next;
            runner.enqueue(effects);
        }

        let deadline = Instant::now() + WAIT;
        while state.session().is_some_and(|s| s.conversation().len() < 4) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let event = rx.recv_timeout(remaining).expect("engine event");
            if let LoopEvent::Core(msg) = event {
                let (next, effects) = update(state, msg);
                state = next;
                runner.enqueue(effects);
            }
        }

        assert_eq!(
            *assistant.chats.lock().unwrap(),
            vec!["how thick?".to_string(), "and salt?".to_string()]
        );
        let lines: Vec<(Sender, String)> = state
            .session()
            .unwrap()
            .conversation()
            .iter()
            .map(|line| (line.sender, line.text.clone()))
            .collect();
        assert_eq!(
            lines,
            vec![
                (Sender::User, "how thick?".to_string()),
                (Sender::User, "and salt?".to_string()),
                (Sender::Assistant, "re: how thick?".to_string()),
                (Sender::Assistant, "re: and salt?".to_string()),
            ]
        );
        runner.shutdown(Duration::from_secs(1));
    }
}
