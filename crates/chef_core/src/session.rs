//! Step-by-step cooking session: navigation, servings, the link to the remote
//! assistant session, and the chat outbox.

use std::collections::VecDeque;
use std::fmt;

use chef_logging::{chef_debug, chef_warn};

use crate::action::{ActionId, ActionKind, PendingAction, SuggestedAction};
use crate::dispatch::{ActionDispatcher, DispatchOutcome};
use crate::msg::{ChatReply, RemoteFailure};
use crate::{CookError, Effect, Recipe};

pub(crate) const CONNECT_FAILED_TEXT: &str =
    "I couldn't reach the kitchen assistant. Steps and timers still work; chat will retry when you send a message.";
pub(crate) const STEP_ACTIONS_FAILED_TEXT: &str =
    "I couldn't load suggestions for this step. You can keep cooking and ask me in chat.";
pub(crate) const CHAT_FAILED_TEXT: &str =
    "Sorry, I'm having trouble responding right now. Please try again.";

/// Local identity of one cook-mode session. Tokens are never reused, so a
/// result tagged with an old token is recognizably stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(pub u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No recipe is being cooked.
    #[default]
    Idle,
    Cooking,
    /// Advanced past the last step. Navigation is inert.
    Finished,
}

/// State of the remote counterpart of this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLink {
    Unlinked,
    Creating,
    Linked(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CookSession {
    token: SessionToken,
    recipe: Recipe,
    step: usize,
    servings: u32,
    finished: bool,
    remote: RemoteLink,
    pending: Vec<PendingAction>,
    next_action_id: ActionId,
    conversation: Vec<ChatLine>,
    outbox: VecDeque<String>,
    chat_in_flight: bool,
}

impl CookSession {
    /// Opens a session at step 0 with the recipe's default servings and asks
    /// for a remote session. Navigation works before (and without) one.
    pub fn start(token: SessionToken, recipe: Recipe) -> Result<(Self, Vec<Effect>), CookError> {
        if recipe.steps.is_empty() {
            return Err(CookError::EmptyRecipe);
        }
        let effects = vec![Effect::CreateRemoteSession {
            token,
            recipe_id: recipe.id.clone(),
        }];
        let session = Self {
            token,
            servings: recipe.servings.max(1),
            recipe,
            step: 0,
            finished: false,
            remote: RemoteLink::Creating,
            pending: Vec::new(),
            next_action_id: 0,
            conversation: Vec::new(),
            outbox: VecDeque::new(),
            chat_in_flight: false,
        };
        Ok((session, effects))
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else {
            Phase::Cooking
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn remote(&self) -> &RemoteLink {
        &self.remote
    }

    pub fn pending_actions(&self) -> &[PendingAction] {
        &self.pending
    }

    pub fn conversation(&self) -> &[ChatLine] {
        &self.conversation
    }

    pub fn is_chat_busy(&self) -> bool {
        self.chat_in_flight
    }

    /// Messages accepted but not yet handed to the remote assistant.
    pub fn queued_messages(&self) -> impl Iterator<Item = &str> {
        self.outbox.iter().map(String::as_str)
    }

    pub fn current_step_text(&self) -> &str {
        self.recipe.step(self.step).unwrap_or_default()
    }

    pub fn previous_step_text(&self) -> Option<&str> {
        self.step
            .checked_sub(1)
            .and_then(|index| self.recipe.step(index))
    }

    pub fn next_step_text(&self) -> Option<&str> {
        self.recipe.step(self.step + 1)
    }

    /// Moves forward one step, or into `Finished` from the last step.
    pub fn advance(&mut self) -> Vec<Effect> {
        if self.finished {
            return Vec::new();
        }
        if self.step + 1 >= self.recipe.step_count() {
            self.finished = true;
            self.pending.clear();
            return Vec::new();
        }
        self.step += 1;
        self.refresh_step_actions()
    }

    /// Moves back one step. No-op at step 0 and once finished.
    pub fn retreat(&mut self) -> Vec<Effect> {
        if self.finished || self.step == 0 {
            return Vec::new();
        }
        self.step -= 1;
        self.refresh_step_actions()
    }

    /// Only affects locally scaled quantities; nothing is sent remotely.
    pub fn set_servings(&mut self, servings: u32) -> Result<(), CookError> {
        if servings == 0 {
            return Err(CookError::InvalidServings);
        }
        self.servings = servings;
        Ok(())
    }

    /// Queues `text` for the assistant. Messages go out one at a time in
    /// submission order; a remote session is created first if there is none.
    pub fn send_chat(&mut self, text: &str) -> Vec<Effect> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        self.conversation.push(ChatLine {
            sender: Sender::User,
            text: text.to_string(),
        });
        self.outbox.push_back(text.to_string());
        self.pump_chat()
    }

    pub fn on_remote_created(&mut self, result: Result<String, RemoteFailure>) -> Vec<Effect> {
        if self.remote != RemoteLink::Creating {
            chef_debug!(
                "Session {} ignoring create result while {:?}",
                self.token,
                self.remote
            );
            return Vec::new();
        }
        match result {
            Ok(remote_id) => {
                self.remote = RemoteLink::Linked(remote_id);
                let mut effects = self.refresh_step_actions();
                effects.extend(self.pump_chat());
                effects
            }
            Err(failure) => {
                chef_warn!(
                    "Session {} could not create remote session: {}",
                    self.token,
                    failure.reason
                );
                self.remote = RemoteLink::Unlinked;
                self.push_assistant(CONNECT_FAILED_TEXT);
                Vec::new()
            }
        }
    }

    /// Applies a step-actions result. Returns false when the result is for a
    /// step that is no longer current and was discarded.
    pub fn on_step_actions(
        &mut self,
        step: usize,
        result: Result<Vec<SuggestedAction>, RemoteFailure>,
    ) -> bool {
        if self.finished || step != self.step {
            chef_debug!(
                "Session {} discarding actions for step {} (current {}, finished {})",
                self.token,
                step,
                self.step,
                self.finished
            );
            return false;
        }
        match result {
            Ok(actions) => {
                self.pending.clear();
                for action in actions {
                    self.push_pending(action);
                }
            }
            Err(failure) => {
                chef_warn!(
                    "Session {} failed to load actions for step {}: {}",
                    self.token,
                    step,
                    failure.reason
                );
                self.push_assistant(STEP_ACTIONS_FAILED_TEXT);
            }
        }
        true
    }

    pub fn on_chat_reply(&mut self, result: Result<ChatReply, RemoteFailure>) -> Vec<Effect> {
        if !self.chat_in_flight {
            chef_debug!("Session {} ignoring unexpected chat reply", self.token);
            return Vec::new();
        }
        self.chat_in_flight = false;
        match result {
            Ok(reply) => {
                self.push_assistant(&reply.text);
                for action in reply.actions {
                    let duplicate = self
                        .pending
                        .iter()
                        .any(|pending| pending.action.same_directive(&action));
                    if !duplicate {
                        self.push_pending(action);
                    }
                }
            }
            Err(failure) => {
                chef_warn!("Session {} chat failed: {}", self.token, failure.reason);
                self.push_assistant(CHAT_FAILED_TEXT);
            }
        }
        self.pump_chat()
    }

    /// Dispatches a pending action. Timer actions are consumed on success;
    /// temperature actions stay pending until the notice is acknowledged.
    /// Returns `Ok(None)` when `id` is not pending.
    pub fn accept_action(
        &mut self,
        id: ActionId,
        dispatcher: &mut ActionDispatcher,
    ) -> Result<Option<DispatchOutcome>, CookError> {
        let Some(index) = self.pending.iter().position(|pending| pending.id == id) else {
            return Ok(None);
        };
        let outcome = dispatcher.dispatch(&self.pending[index])?;
        if let DispatchOutcome::TimerStarted(_) = outcome {
            self.pending.remove(index);
        }
        Ok(Some(outcome))
    }

    /// Drops a pending action. A notice it raised goes with it.
    pub fn dismiss_action(&mut self, id: ActionId, dispatcher: &mut ActionDispatcher) -> bool {
        dispatcher.withdraw(id);
        self.remove_pending(id)
    }

    /// Acknowledges the active notice and drops the action that raised it.
    pub fn acknowledge_notice(&mut self, dispatcher: &mut ActionDispatcher) -> bool {
        match dispatcher.acknowledge() {
            Some(notice) => {
                self.remove_pending(notice.action_id);
                true
            }
            None => false,
        }
    }

    /// Starts every pending timer action once, in list order. Actions that
    /// cannot become timers stay pending. Returns the number started.
    pub fn start_pending_timers(&mut self, dispatcher: &mut ActionDispatcher) -> usize {
        let mut started = 0;
        let mut kept = Vec::with_capacity(self.pending.len());
        for pending in std::mem::take(&mut self.pending) {
            if pending.action.kind() != ActionKind::Timer {
                kept.push(pending);
                continue;
            }
            match dispatcher.dispatch(&pending) {
                Ok(_) => started += 1,
                Err(err) => {
                    chef_warn!("Pending action {} not started: {}", pending.id, err);
                    kept.push(pending);
                }
            }
        }
        self.pending = kept;
        started
    }

    /// Ends the session locally. The returned effect, if any, deletes the
    /// remote counterpart on a best-effort basis.
    pub fn teardown(self) -> Vec<Effect> {
        match self.remote {
            RemoteLink::Linked(remote_id) => vec![Effect::DeleteRemoteSession { remote_id }],
            RemoteLink::Unlinked | RemoteLink::Creating => Vec::new(),
        }
    }

    fn remove_pending(&mut self, id: ActionId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|pending| pending.id != id);
        self.pending.len() != before
    }

    fn refresh_step_actions(&mut self) -> Vec<Effect> {
        self.pending.clear();
        match &self.remote {
            RemoteLink::Linked(remote_id) if !self.finished => vec![Effect::FetchStepActions {
                token: self.token,
                remote_id: remote_id.clone(),
                step: self.step,
            }],
            _ => Vec::new(),
        }
    }

    fn pump_chat(&mut self) -> Vec<Effect> {
        if self.outbox.is_empty() {
            return Vec::new();
        }
        match self.remote.clone() {
            RemoteLink::Linked(remote_id) => {
                if self.chat_in_flight {
                    return Vec::new();
                }
                let Some(text) = self.outbox.pop_front() else {
                    return Vec::new();
                };
                self.chat_in_flight = true;
                vec![Effect::SendChat {
                    token: self.token,
                    remote_id,
                    text,
                }]
            }
            RemoteLink::Unlinked => {
                self.remote = RemoteLink::Creating;
                vec![Effect::CreateRemoteSession {
                    token: self.token,
                    recipe_id: self.recipe.id.clone(),
                }]
            }
            RemoteLink::Creating => Vec::new(),
        }
    }

    fn push_pending(&mut self, action: SuggestedAction) {
        self.next_action_id += 1;
        self.pending.push(PendingAction {
            id: self.next_action_id,
            action,
        });
    }

    fn push_assistant(&mut self, text: &str) {
        self.conversation.push(ChatLine {
            sender: Sender::Assistant,
            text: text.to_string(),
        });
    }
}
