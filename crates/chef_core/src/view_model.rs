use crate::action::{ActionId, ActionKind, PendingAction, SuggestedAction};
use crate::session::{ChatLine, Phase};
use crate::timer::{Appliance, TimerId};
use crate::CookError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Offline,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookViewModel {
    pub phase: Phase,
    pub recipe_title: Option<String>,
    pub step_index: usize,
    pub step_count: usize,
    pub current_step: Option<String>,
    pub previous_step: Option<String>,
    pub next_step: Option<String>,
    pub servings: u32,
    pub ingredients: Vec<IngredientRow>,
    pub pending_actions: Vec<ActionRow>,
    pub conversation: Vec<ChatLine>,
    pub chat_busy: bool,
    pub queued_messages: usize,
    pub connection: ConnectionStatus,
    pub notice: Option<NoticeView>,
    pub timers: Vec<TimerRow>,
    pub last_error: Option<CookError>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientRow {
    pub name: String,
    /// Amount scaled to the current servings.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub id: ActionId,
    pub kind: ActionKind,
    pub appliance: Appliance,
    pub summary: String,
}

impl ActionRow {
    pub(crate) fn from_pending(pending: &PendingAction) -> Self {
        let appliance = pending.action.appliance();
        let summary = match &pending.action {
            SuggestedAction::Timer {
                duration_minutes,
                label,
                description,
                ..
            } => {
                let name = if label.trim().is_empty() {
                    description
                } else {
                    label
                };
                format!("{duration_minutes} min timer ({appliance}): {name}")
            }
            SuggestedAction::Temperature {
                value_fahrenheit: Some(value),
                description,
                ..
            } => format!("{appliance} to {value}°F: {description}"),
            SuggestedAction::Temperature {
                value_fahrenheit: None,
                description,
                ..
            } => format!("{appliance}: {description}"),
        };
        Self {
            id: pending.id,
            kind: pending.action.kind(),
            appliance,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub value_fahrenheit: Option<i32>,
    pub appliance: Appliance,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRow {
    pub id: TimerId,
    pub label: String,
    pub appliance: Appliance,
    /// `MM:SS` or `H:MM:SS`.
    pub remaining: String,
    pub running: bool,
    pub complete: bool,
}
