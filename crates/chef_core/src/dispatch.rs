//! Routes accepted suggested actions to the timer board or to the single
//! pending temperature notice slot.

use chef_logging::{chef_debug, chef_info};

use crate::action::{ActionId, PendingAction, SuggestedAction};
use crate::timer::{Appliance, TimerBoard, TimerId};
use crate::CookError;

/// Temperature instruction waiting for the user to acknowledge it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemperatureNotice {
    /// Pending action that raised this notice; removed on acknowledgement.
    pub action_id: ActionId,
    pub value_fahrenheit: Option<i32>,
    pub appliance: Appliance,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The action became a running timer and is consumed.
    TimerStarted(TimerId),
    /// The action is now the pending notice and stays pending until acknowledged.
    NoticeRaised,
}

#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    timers: TimerBoard,
    notice: Option<TemperatureNotice>,
}

impl ActionDispatcher {
    pub fn new(timers: TimerBoard) -> Self {
        Self {
            timers,
            notice: None,
        }
    }

    pub fn timers(&self) -> &TimerBoard {
        &self.timers
    }

    pub fn dispatch(&mut self, pending: &PendingAction) -> Result<DispatchOutcome, CookError> {
        let appliance = pending.action.appliance();
        match &pending.action {
            SuggestedAction::Timer {
                duration_minutes,
                label,
                description,
                ..
            } => {
                if *duration_minutes <= 0 {
                    return Err(CookError::InvalidDuration);
                }
                let duration_secs = u64::from(duration_minutes.unsigned_abs()) * 60;
                let label = if label.trim().is_empty() {
                    description.clone()
                } else {
                    label.clone()
                };
                let timer_id = self.timers.add_timer(duration_secs, label, appliance, true)?;
                Ok(DispatchOutcome::TimerStarted(timer_id))
            }
            SuggestedAction::Temperature {
                value_fahrenheit,
                description,
                ..
            } => {
                if let Some(previous) = &self.notice {
                    chef_debug!(
                        "Temperature notice for action {} superseded by action {}",
                        previous.action_id,
                        pending.id
                    );
                }
                chef_info!(
                    "Temperature notice raised: {:?}F on {}",
                    value_fahrenheit,
                    appliance
                );
                self.notice = Some(TemperatureNotice {
                    action_id: pending.id,
                    value_fahrenheit: *value_fahrenheit,
                    appliance,
                    description: description.clone(),
                });
                Ok(DispatchOutcome::NoticeRaised)
            }
        }
    }

    pub fn notice(&self) -> Option<&TemperatureNotice> {
        self.notice.as_ref()
    }

    pub fn is_showing_notice(&self) -> bool {
        self.notice.is_some()
    }

    /// Clears the notice if `action_id` raised it.
    pub fn withdraw(&mut self, action_id: ActionId) -> bool {
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| notice.action_id == action_id)
        {
            chef_debug!("Temperature notice for action {} withdrawn", action_id);
            self.notice = None;
            true
        } else {
            false
        }
    }

    /// Clears the slot and hands back the acknowledged notice, if any.
    pub fn acknowledge(&mut self) -> Option<TemperatureNotice> {
        self.notice.take()
    }
}
