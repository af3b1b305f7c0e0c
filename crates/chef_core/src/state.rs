use crate::dispatch::ActionDispatcher;
use crate::session::{CookSession, Phase, RemoteLink, SessionToken};
use crate::timer::TimerBoard;
use crate::view_model::{
    ActionRow, ConnectionStatus, CookViewModel, IngredientRow, NoticeView, TimerRow,
};
use crate::{serving_factor, scale, CookError, Effect};

/// Everything the cook-mode screen owns: at most one session, the dispatcher
/// (which holds the shared timer board) and the last input error.
#[derive(Debug, Clone)]
pub struct AppState {
    session: Option<CookSession>,
    dispatcher: ActionDispatcher,
    next_token: u64,
    last_error: Option<CookError>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TimerBoard::new())
    }
}

impl AppState {
    pub fn new(timers: TimerBoard) -> Self {
        Self {
            session: None,
            dispatcher: ActionDispatcher::new(timers),
            next_token: 0,
            last_error: None,
            dirty: false,
        }
    }

    pub fn session(&self) -> Option<&CookSession> {
        self.session.as_ref()
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn timers(&self) -> &TimerBoard {
        self.dispatcher.timers()
    }

    pub fn last_error(&self) -> Option<CookError> {
        self.last_error
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(CookSession::phase)
            .unwrap_or_default()
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> CookViewModel {
        let timers = self
            .timers()
            .snapshot()
            .into_iter()
            .map(|timer| TimerRow {
                id: timer.id(),
                label: timer.label().to_string(),
                appliance: timer.appliance(),
                remaining: timer.remaining_display(),
                running: timer.is_running(),
                complete: timer.is_complete(),
            })
            .collect();
        let notice = self.dispatcher.notice().map(|notice| NoticeView {
            value_fahrenheit: notice.value_fahrenheit,
            appliance: notice.appliance,
            description: notice.description.clone(),
        });

        let mut view = CookViewModel {
            timers,
            notice,
            last_error: self.last_error,
            dirty: self.dirty,
            ..CookViewModel::default()
        };

        let Some(session) = &self.session else {
            return view;
        };
        let recipe = session.recipe();
        let factor = serving_factor(session.servings(), recipe.servings);

        view.phase = session.phase();
        view.recipe_title = Some(recipe.title.clone());
        view.step_index = session.step_index();
        view.step_count = recipe.step_count();
        view.current_step = Some(session.current_step_text().to_string());
        view.previous_step = session.previous_step_text().map(ToOwned::to_owned);
        view.next_step = session.next_step_text().map(ToOwned::to_owned);
        view.servings = session.servings();
        view.ingredients = recipe
            .ingredients
            .iter()
            .map(|ingredient| IngredientRow {
                name: ingredient.name.clone(),
                amount: scale(&ingredient.amount, factor),
            })
            .collect();
        view.pending_actions = session
            .pending_actions()
            .iter()
            .map(ActionRow::from_pending)
            .collect();
        view.conversation = session.conversation().to_vec();
        view.chat_busy = session.is_chat_busy();
        view.queued_messages = session.queued_messages().count();
        view.connection = match session.remote() {
            RemoteLink::Unlinked => ConnectionStatus::Offline,
            RemoteLink::Creating => ConnectionStatus::Connecting,
            RemoteLink::Linked(_) => ConnectionStatus::Connected,
        };
        view
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn record_error(&mut self, err: CookError) {
        self.last_error = Some(err);
        self.dirty = true;
    }

    pub(crate) fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn issue_token(&mut self) -> SessionToken {
        self.next_token += 1;
        SessionToken(self.next_token)
    }

    pub(crate) fn install(&mut self, session: CookSession) {
        self.session = Some(session);
    }

    /// The active session and the dispatcher, borrowed together.
    pub(crate) fn parts_mut(&mut self) -> (Option<&mut CookSession>, &mut ActionDispatcher) {
        (self.session.as_mut(), &mut self.dispatcher)
    }

    /// The active session, if it is the one identified by `token`.
    pub(crate) fn session_for(&mut self, token: SessionToken) -> Option<&mut CookSession> {
        self.session
            .as_mut()
            .filter(|session| session.token() == token)
    }

    /// Drops the active session and any notice it raised. Timers outlive it.
    pub(crate) fn teardown_session(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.take() else {
            return Vec::new();
        };
        self.dispatcher.acknowledge();
        self.dirty = true;
        session.teardown()
    }
}
