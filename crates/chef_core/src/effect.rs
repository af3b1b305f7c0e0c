use crate::SessionToken;

/// Remote work requested by the core. Every request carries the token of the
/// session that issued it so late results can be matched or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateRemoteSession {
        token: SessionToken,
        recipe_id: String,
    },
    FetchStepActions {
        token: SessionToken,
        remote_id: String,
        step: usize,
    },
    SendChat {
        token: SessionToken,
        remote_id: String,
        text: String,
    },
    /// Best effort; the outcome never feeds back into session state.
    DeleteRemoteSession { remote_id: String },
}
