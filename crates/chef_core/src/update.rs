use chef_logging::chef_debug;

use crate::session::CookSession;
use crate::{ActionDispatcher, AppState, CookError, Effect, Msg};

/// Applies a message to state and returns the remote work it requires.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if msg.is_user_input() {
        state.clear_error();
    }

    let effects = match msg {
        Msg::StartCooking(recipe) => {
            let mut effects = state.teardown_session();
            let token = state.issue_token();
            match CookSession::start(token, recipe) {
                Ok((session, start_effects)) => {
                    state.install(session);
                    state.mark_dirty();
                    effects.extend(start_effects);
                }
                Err(err) => state.record_error(err),
            }
            effects
        }
        Msg::NextStep => with_session(&mut state, |session, _| Ok(session.advance())),
        Msg::PreviousStep => with_session(&mut state, |session, _| Ok(session.retreat())),
        Msg::ServingsChanged(servings) => with_session(&mut state, |session, _| {
            session.set_servings(servings)?;
            Ok(Vec::new())
        }),
        Msg::ChatSubmitted(text) => {
            if text.trim().is_empty() {
                return (state, Vec::new());
            }
            with_session(&mut state, |session, _| Ok(session.send_chat(&text)))
        }
        Msg::ActionAccepted(id) => with_session(&mut state, |session, dispatcher| {
            session.accept_action(id, dispatcher)?;
            Ok(Vec::new())
        }),
        Msg::ActionDismissed(id) => with_session(&mut state, |session, dispatcher| {
            session.dismiss_action(id, dispatcher);
            Ok(Vec::new())
        }),
        Msg::NoticeAcknowledged => {
            let (session, dispatcher) = state.parts_mut();
            let acknowledged = match session {
                Some(session) => session.acknowledge_notice(dispatcher),
                None => dispatcher.acknowledge().is_some(),
            };
            if acknowledged {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TimersViewOpened => {
            let (session, dispatcher) = state.parts_mut();
            let started = session.map_or(0, |session| session.start_pending_timers(dispatcher));
            if started > 0 {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ManualTimerRequested {
            appliance,
            label,
            minutes,
        } => {
            let label = if label.trim().is_empty() {
                appliance.display_name().to_string()
            } else {
                label
            };
            let duration_secs = u64::from(minutes) * 60;
            match state
                .timers()
                .add_timer(duration_secs, label, appliance, false)
            {
                Ok(_) => state.mark_dirty(),
                Err(err) => state.record_error(err),
            }
            Vec::new()
        }
        Msg::TimerToggled(id) => {
            if state.timers().toggle(id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TimerReset(id) => {
            if state.timers().reset(id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TimerDeleted(id) => {
            if state.timers().delete(id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExitRequested => state.teardown_session(),
        Msg::RemoteSessionCreated { token, result } => match state.session_for(token) {
            Some(session) => {
                let effects = session.on_remote_created(result);
                state.mark_dirty();
                effects
            }
            None => match result {
                // The session this was created for is gone; clean up remotely.
                Ok(remote_id) => {
                    chef_debug!("Deleting orphaned remote session {} for {}", remote_id, token);
                    vec![Effect::DeleteRemoteSession { remote_id }]
                }
                Err(_) => Vec::new(),
            },
        },
        Msg::StepActionsLoaded {
            token,
            step,
            result,
        } => {
            let applied = state
                .session_for(token)
                .is_some_and(|session| session.on_step_actions(step, result));
            if applied {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ChatReplied { token, result } => match state.session_for(token) {
            Some(session) => {
                let effects = session.on_chat_reply(result);
                state.mark_dirty();
                effects
            }
            None => {
                chef_debug!("Discarding chat reply for stale session {}", token);
                Vec::new()
            }
        },
        Msg::Tick => {
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Runs a user operation against the active session. Errors are recorded on
/// the state and produce no effects.
fn with_session<F>(state: &mut AppState, op: F) -> Vec<Effect>
where
    F: FnOnce(&mut CookSession, &mut ActionDispatcher) -> Result<Vec<Effect>, CookError>,
{
    let (session, dispatcher) = state.parts_mut();
    let result = match session {
        Some(session) => op(session, dispatcher),
        None => Err(CookError::NoActiveSession),
    };
    match result {
        Ok(effects) => {
            state.mark_dirty();
            effects
        }
        Err(err) => {
            state.record_error(err);
            Vec::new()
        }
    }
}

impl Msg {
    fn is_user_input(&self) -> bool {
        !matches!(
            self,
            Msg::RemoteSessionCreated { .. }
                | Msg::StepActionsLoaded { .. }
                | Msg::ChatReplied { .. }
                | Msg::Tick
                | Msg::NoOp
        )
    }
}
