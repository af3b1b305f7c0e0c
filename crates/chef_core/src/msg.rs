use crate::{ActionId, Appliance, Recipe, SessionToken, SuggestedAction, TimerId};

/// Why a remote call failed, as far as the core cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub reason: String,
}

impl RemoteFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub actions: Vec<SuggestedAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User opened cook mode for a recipe.
    StartCooking(Recipe),
    /// User moved to the next step.
    NextStep,
    /// User moved to the previous step.
    PreviousStep,
    /// User changed the serving count.
    ServingsChanged(u32),
    /// User submitted a chat message.
    ChatSubmitted(String),
    /// User accepted a pending suggested action.
    ActionAccepted(ActionId),
    /// User dismissed a pending suggested action without acting on it.
    ActionDismissed(ActionId),
    /// User acknowledged the pending temperature notice.
    NoticeAcknowledged,
    /// User switched to the timer view; pending timer actions auto-start.
    TimersViewOpened,
    /// User created a timer by hand.
    ManualTimerRequested {
        appliance: Appliance,
        label: String,
        minutes: u32,
    },
    TimerToggled(TimerId),
    TimerReset(TimerId),
    TimerDeleted(TimerId),
    /// User left cook mode.
    ExitRequested,
    /// Result of a remote session-create call.
    RemoteSessionCreated {
        token: SessionToken,
        result: Result<String, RemoteFailure>,
    },
    /// Result of a step-actions fetch.
    StepActionsLoaded {
        token: SessionToken,
        step: usize,
        result: Result<Vec<SuggestedAction>, RemoteFailure>,
    },
    /// Result of a chat send.
    ChatReplied {
        token: SessionToken,
        result: Result<ChatReply, RemoteFailure>,
    },
    /// Timer board advanced; re-render.
    Tick,
    /// Input that maps to no cook-mode action. Changes nothing.
    NoOp,
}
