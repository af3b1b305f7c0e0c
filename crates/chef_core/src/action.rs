use crate::timer::Appliance;

/// Session-local handle for a pending suggested action.
pub type ActionId = u64;

/// Directive emitted by the remote assistant for the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestedAction {
    Timer {
        duration_minutes: i32,
        appliance_hint: String,
        label: String,
        description: String,
    },
    Temperature {
        value_fahrenheit: Option<i32>,
        appliance_hint: String,
        description: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Timer,
    Temperature,
}

impl SuggestedAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            SuggestedAction::Timer { .. } => ActionKind::Timer,
            SuggestedAction::Temperature { .. } => ActionKind::Temperature,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            SuggestedAction::Timer { description, .. }
            | SuggestedAction::Temperature { description, .. } => description,
        }
    }

    pub fn appliance(&self) -> Appliance {
        match self {
            SuggestedAction::Timer { appliance_hint, .. }
            | SuggestedAction::Temperature { appliance_hint, .. } => {
                Appliance::from_hint(appliance_hint)
            }
        }
    }

    /// Two actions describe the same directive when kind and description match.
    pub fn same_directive(&self, other: &SuggestedAction) -> bool {
        self.kind() == other.kind() && self.description() == other.description()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub id: ActionId,
    pub action: SuggestedAction,
}
