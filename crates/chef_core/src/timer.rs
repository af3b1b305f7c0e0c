//! Kitchen timers advanced in lockstep by a shared one-second tick.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chef_logging::chef_info;

use crate::CookError;

pub type TimerId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Appliance {
    Oven,
    Stovetop,
    Microwave,
    AirFryer,
    PressureCooker,
    RiceCooker,
    Other,
}

impl Appliance {
    pub const ALL: [Appliance; 7] = [
        Appliance::Oven,
        Appliance::Stovetop,
        Appliance::Microwave,
        Appliance::AirFryer,
        Appliance::PressureCooker,
        Appliance::RiceCooker,
        Appliance::Other,
    ];

    /// Maps an assistant-supplied appliance hint. Only oven and stove hints
    /// are recognized; everything else is `Other`.
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "oven" => Appliance::Oven,
            "stove" | "stovetop" => Appliance::Stovetop,
            _ => Appliance::Other,
        }
    }

    /// Parses a user-typed appliance name, accepting the display name with
    /// or without spaces, hyphens or underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "oven" => Some(Appliance::Oven),
            "stove" | "stovetop" => Some(Appliance::Stovetop),
            "microwave" => Some(Appliance::Microwave),
            "airfryer" => Some(Appliance::AirFryer),
            "pressurecooker" => Some(Appliance::PressureCooker),
            "ricecooker" => Some(Appliance::RiceCooker),
            "other" => Some(Appliance::Other),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Appliance::Oven => "Oven",
            Appliance::Stovetop => "Stovetop",
            Appliance::Microwave => "Microwave",
            Appliance::AirFryer => "Air Fryer",
            Appliance::PressureCooker => "Pressure Cooker",
            Appliance::RiceCooker => "Rice Cooker",
            Appliance::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Appliance::Oven => "🎛️",
            Appliance::Stovetop => "🔥",
            Appliance::Microwave => "⚡️",
            Appliance::AirFryer => "💨",
            Appliance::PressureCooker => "♨️",
            Appliance::RiceCooker => "🍚",
            Appliance::Other => "⏲️",
        }
    }
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One countdown. Fields are private so that `complete` can only be reached
/// through [`KitchenTimer::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenTimer {
    id: TimerId,
    appliance: Appliance,
    label: String,
    duration_secs: u64,
    remaining_secs: u64,
    running: bool,
    complete: bool,
}

impl KitchenTimer {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn appliance(&self) -> Appliance {
        self.appliance
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn remaining_display(&self) -> String {
        format_remaining(self.remaining_secs)
    }

    /// Advances by one second. Returns true when this tick completed the timer.
    fn tick(&mut self) -> bool {
        if !self.running || self.complete {
            return false;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
        }
        if self.remaining_secs == 0 {
            self.complete = true;
            self.running = false;
            return true;
        }
        false
    }

    fn toggle(&mut self) {
        self.running = !self.running;
        // Starting a finished timer restarts it from the full duration.
        if self.running && self.complete {
            self.complete = false;
            self.remaining_secs = self.duration_secs;
        }
    }

    fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.complete = false;
        self.running = false;
    }
}

/// Collection of timers. Ids are handed out in creation order and never
/// reused, so iteration order is creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerEngine {
    timers: BTreeMap<TimerId, KitchenTimer>,
    next_id: TimerId,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_timer(
        &mut self,
        duration_secs: u64,
        label: impl Into<String>,
        appliance: Appliance,
        auto_start: bool,
    ) -> Result<TimerId, CookError> {
        if duration_secs == 0 {
            return Err(CookError::InvalidDuration);
        }
        self.next_id += 1;
        let id = self.next_id;
        let timer = KitchenTimer {
            id,
            appliance,
            label: label.into(),
            duration_secs,
            remaining_secs: duration_secs,
            running: auto_start,
            complete: false,
        };
        chef_info!(
            "Timer {} added: label={:?} appliance={} duration={}s running={}",
            id,
            timer.label,
            appliance,
            duration_secs,
            auto_start
        );
        self.timers.insert(id, timer);
        Ok(id)
    }

    /// Advances every running timer by one second. Returns the ids of timers
    /// that completed on this tick.
    pub fn tick(&mut self) -> Vec<TimerId> {
        let mut completed = Vec::new();
        for timer in self.timers.values_mut() {
            if timer.tick() {
                completed.push(timer.id);
            }
        }
        for id in &completed {
            chef_info!("Timer {} complete", id);
        }
        completed
    }

    /// Returns false when `id` is unknown.
    pub fn toggle(&mut self, id: TimerId) -> bool {
        match self.timers.get_mut(&id) {
            Some(timer) => {
                timer.toggle();
                true
            }
            None => false,
        }
    }

    /// Returns false when `id` is unknown.
    pub fn reset(&mut self, id: TimerId) -> bool {
        match self.timers.get_mut(&id) {
            Some(timer) => {
                timer.reset();
                true
            }
            None => false,
        }
    }

    /// Returns false when `id` is unknown.
    pub fn delete(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(&id).is_some();
        if removed {
            chef_info!("Timer {} deleted", id);
        }
        removed
    }

    pub fn get(&self, id: TimerId) -> Option<&KitchenTimer> {
        self.timers.get(&id)
    }

    pub fn timers(&self) -> impl Iterator<Item = &KitchenTimer> {
        self.timers.values()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Shared handle to one [`TimerEngine`]. The tick driver and the cook-mode
/// loop each hold a clone; every operation runs under one lock so a timer's
/// remaining/running/complete triple is never observed half-updated.
#[derive(Debug, Clone, Default)]
pub struct TimerBoard {
    inner: Arc<Mutex<TimerEngine>>,
}

impl TimerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_timer(
        &self,
        duration_secs: u64,
        label: impl Into<String>,
        appliance: Appliance,
        auto_start: bool,
    ) -> Result<TimerId, CookError> {
        self.lock().add_timer(duration_secs, label, appliance, auto_start)
    }

    pub fn tick(&self) -> Vec<TimerId> {
        self.lock().tick()
    }

    pub fn toggle(&self, id: TimerId) -> bool {
        self.lock().toggle(id)
    }

    pub fn reset(&self, id: TimerId) -> bool {
        self.lock().reset(id)
    }

    pub fn delete(&self, id: TimerId) -> bool {
        self.lock().delete(id)
    }

    pub fn get(&self, id: TimerId) -> Option<KitchenTimer> {
        self.lock().get(id).cloned()
    }

    /// Copy of all timers in creation order.
    pub fn snapshot(&self) -> Vec<KitchenTimer> {
        self.lock().timers().cloned().collect()
    }

    // Timer mutations have no fallible steps, so a poisoned lock still holds
    // consistent timers.
    fn lock(&self) -> MutexGuard<'_, TimerEngine> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Formats seconds as `H:MM:SS` when at least an hour remains, otherwise `MM:SS`.
pub fn format_remaining(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = secs / 60 % 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
