use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use chef_core::{update, AppState, Msg, Recipe, TimerBoard};
use chef_logging::{chef_info, chef_warn};
use chrono::Local;

use super::config::AppConfig;
use super::effects::{EffectRunner, LoopEvent, Submitted};
use super::ui::commands::{self, Command};
use super::ui::render;

/// How long exit waits for in-flight creates and best-effort remote deletes.
const EXIT_GRACE: Duration = Duration::from_secs(3);

pub fn run_app(config: &AppConfig, recipe: Recipe) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.assistant_settings(), tx.clone())
        .context("starting the assistant engine")?;

    let board = TimerBoard::new();
    let ticker = {
        let board = board.clone();
        let tx = tx.clone();
        runner.start_ticker(config.tick_period(), move |tick| {
            chef_logging::set_tick(tick);
            let completed = board.tick();
            if !completed.is_empty() {
                let _ = tx.send(LoopEvent::TimersCompleted(completed));
            }
        })
    };
    spawn_input_reader(tx);

    let mut app = CookLoop::new(AppState::new(board), runner);
    chef_info!("Cook mode started for recipe {}", recipe.id);
    app.apply(Msg::StartCooking(recipe));
    app.render_if_dirty();
    println!("Type `help` for commands.");

    while let Ok(event) = rx.recv() {
        match event {
            LoopEvent::Core(msg) => app.apply(msg),
            LoopEvent::Line(line) => match commands::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Core(msg))) => app.apply(msg),
                Ok(Some(Command::ShowTimers)) => {
                    app.apply(Msg::TimersViewOpened);
                    app.render_if_dirty();
                    print!("{}", render::render_timers(&app.state.view().timers));
                }
                Ok(Some(Command::Help)) => println!("{}", commands::HELP),
                Ok(Some(Command::Quit)) => break,
                Err(err) => println!("{err}"),
            },
            LoopEvent::InputClosed => break,
            LoopEvent::TimersCompleted(ids) => {
                for id in ids {
                    if let Some(timer) = app.state.timers().get(id) {
                        println!(
                            "{} {} timer \"{}\" is done!",
                            timer.appliance().icon(),
                            timer.appliance(),
                            timer.label()
                        );
                    }
                }
                app.apply(Msg::Tick);
            }
            LoopEvent::RemoteDeleted => app.remote_deleted(),
        }
        app.render_if_dirty();
    }

    drop(ticker);
    app.apply(Msg::ExitRequested);
    app.drain_remote(&rx);
    app.runner.shutdown(Duration::from_secs(1));
    chef_info!("Cook mode closed");
    Ok(())
}

struct CookLoop {
    state: AppState,
    runner: EffectRunner,
    pending_creates: usize,
    pending_deletes: usize,
}

impl CookLoop {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            pending_creates: 0,
            pending_deletes: 0,
        }
    }

    fn apply(&mut self, msg: Msg) {
        if let Msg::RemoteSessionCreated { .. } = msg {
            self.pending_creates = self.pending_creates.saturating_sub(1);
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        let Submitted { creates, deletes } = self.runner.enqueue(effects);
        self.pending_creates += creates;
        self.pending_deletes += deletes;
    }

    fn remote_deleted(&mut self) {
        self.pending_deletes = self.pending_deletes.saturating_sub(1);
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            let now = Local::now().format("%H:%M").to_string();
            print!("\n{}", render::render(&self.state.view(), &now));
        }
    }

    /// Waits a bounded time for in-flight creates and submitted deletes. A
    /// create that lands after teardown goes through `update`, which deletes
    /// the orphaned remote session.
    fn drain_remote(&mut self, rx: &mpsc::Receiver<LoopEvent>) {
        let deadline = Instant::now() + EXIT_GRACE;
        while self.pending_creates > 0 || self.pending_deletes > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(LoopEvent::RemoteDeleted) => self.remote_deleted(),
                Ok(LoopEvent::Core(msg)) => self.apply(msg),
                Ok(_) => {}
                Err(_) => {
                    chef_warn!(
                        "Gave up waiting for {} create(s) and {} delete(s)",
                        self.pending_creates,
                        self.pending_deletes
                    );
                    break;
                }
            }
        }
    }
}

fn spawn_input_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(LoopEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(LoopEvent::InputClosed);
    });
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chef_core::Recipe;
    use chef_engine::{ActionPayload, Assistant, AssistantError, ChatReply};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Creates slowly and records every delete it receives.
    struct LaggingAssistant {
        create_delay: Duration,
        deleted: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Assistant for LaggingAssistant {
        async fn create_session(&self, recipe_id: &str) -> Result<String, AssistantError> {
            tokio::time::sleep(self.create_delay).await;
            Ok(format!("remote-{recipe_id}"))
        }

        async fn delete_session(&self, session_id: &str) -> Result<(), AssistantError> {
            self.deleted.lock().unwrap().push(session_id.to_string());
            Ok(())
        }

        async fn step_actions(
            &self,
            _session_id: &str,
            _step: usize,
        ) -> Result<Vec<ActionPayload>, AssistantError> {
            Ok(Vec::new())
        }

        async fn send_chat(
            &self,
            _session_id: &str,
            message: &str,
        ) -> Result<ChatReply, AssistantError> {
            Ok(ChatReply {
                message: message.to_string(),
                suggested_actions: Vec::new(),
            })
        }
    }

    fn soup() -> Recipe {
        Recipe {
            id: "soup".to_string(),
            title: "Soup".to_string(),
            ingredients: Vec::new(),
            steps: vec!["Simmer.".to_string()],
            servings: 2,
        }
    }

    fn cook_loop(
        create_delay: Duration,
    ) -> (CookLoop, Arc<LaggingAssistant>, mpsc::Receiver<LoopEvent>) {
        let assistant = Arc::new(LaggingAssistant {
            create_delay,
            deleted: Mutex::new(Vec::new()),
        });
        let (tx, rx) = mpsc::channel();
        let runner = EffectRunner::with_assistant(assistant.clone(), tx).unwrap();
        (CookLoop::new(AppState::default(), runner), assistant, rx)
    }

    #[test]
    fn quitting_during_session_creation_deletes_the_remote_session() {
        chef_logging::initialize_for_tests();
        let (mut app, assistant, rx) = cook_loop(Duration::from_millis(300));

        app.apply(Msg::StartCooking(soup()));
        assert_eq!(app.pending_creates, 1);
        app.apply(Msg::ExitRequested);
        app.drain_remote(&rx);
        app.runner.shutdown(Duration::from_secs(1));

        assert_eq!(
            *assistant.deleted.lock().unwrap(),
            vec!["remote-soup".to_string()]
        );
    }

    #[test]
    fn quitting_a_linked_session_waits_for_its_delete() {
        let (mut app, assistant, rx) = cook_loop(Duration::ZERO);

        app.apply(Msg::StartCooking(soup()));
        while app.pending_creates > 0 {
            if let LoopEvent::Core(msg) = rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                app.apply(msg);
            }
        }
        app.apply(Msg::ExitRequested);
        assert_eq!(app.pending_deletes, 1);
        app.drain_remote(&rx);

        assert_eq!(app.pending_deletes, 0);
        assert_eq!(
            *assistant.deleted.lock().unwrap(),
            vec!["remote-soup".to_string()]
        );
        app.runner.shutdown(Duration::from_secs(1));
    }
}
