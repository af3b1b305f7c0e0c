use std::fmt::Write;

use chef_core::{ConnectionStatus, CookViewModel, Phase, Sender, TimerRow};

const CONVERSATION_TAIL: usize = 6;

/// Full cook-mode screen as plain text. `now` is the wall-clock label shown
/// in the header.
pub fn render(view: &CookViewModel, now: &str) -> String {
    let mut out = String::new();

    let title = view.recipe_title.as_deref().unwrap_or("No recipe");
    let connection = match view.connection {
        ConnectionStatus::Offline => "offline",
        ConnectionStatus::Connecting => "connecting",
        ConnectionStatus::Connected => "assistant ready",
    };
    let _ = writeln!(out, "== {title} == [{now}] ({connection})");

    match view.phase {
        Phase::Idle => {
            let _ = writeln!(out, "Nothing is cooking.");
        }
        Phase::Finished => {
            let _ = writeln!(out, "All {} steps done. Enjoy your meal!", view.step_count);
        }
        Phase::Cooking => {
            let _ = writeln!(
                out,
                "Step {} of {}  |  serves {}",
                view.step_index + 1,
                view.step_count,
                view.servings
            );
            if let Some(previous) = &view.previous_step {
                let _ = writeln!(out, "  (before) {previous}");
            }
            if let Some(current) = &view.current_step {
                let _ = writeln!(out, "  > {current}");
            }
            if let Some(next) = &view.next_step {
                let _ = writeln!(out, "  (next)   {next}");
            }
        }
    }

    if !view.ingredients.is_empty() {
        let _ = writeln!(out, "Ingredients:");
        for row in &view.ingredients {
            let _ = writeln!(out, "  - {} {}", row.amount, row.name);
        }
    }

    if !view.pending_actions.is_empty() {
        let _ = writeln!(out, "Suggestions:");
        for row in &view.pending_actions {
            let _ = writeln!(out, "  [{}] {} {}", row.id, row.appliance.icon(), row.summary);
        }
    }

    if let Some(notice) = &view.notice {
        let target = match notice.value_fahrenheit {
            Some(value) => format!("{} to {value}°F", notice.appliance),
            None => notice.appliance.to_string(),
        };
        let _ = writeln!(out, "!! {target}: {} (type `ack`)", notice.description);
    }

    let skipped = view.conversation.len().saturating_sub(CONVERSATION_TAIL);
    for line in &view.conversation[skipped..] {
        let who = match line.sender {
            Sender::User => "you",
            Sender::Assistant => "chef",
        };
        let _ = writeln!(out, "{who}: {}", line.text);
    }
    if view.chat_busy {
        let waiting = if view.queued_messages > 0 {
            format!("chef is typing... ({} queued)", view.queued_messages)
        } else {
            "chef is typing...".to_string()
        };
        let _ = writeln!(out, "{waiting}");
    }

    let running = view.timers.iter().filter(|row| row.running).count();
    if running > 0 {
        let _ = writeln!(out, "{running} timer(s) running; type `timers` to see them");
    }

    if let Some(err) = view.last_error {
        let _ = writeln!(out, "error: {err}");
    }
    out
}

pub fn render_timers(timers: &[TimerRow]) -> String {
    if timers.is_empty() {
        return "No timers.\n".to_string();
    }
    let mut out = String::new();
    for row in timers {
        let state = if row.complete {
            "done"
        } else if row.running {
            "running"
        } else {
            "paused"
        };
        let _ = writeln!(
            out,
            "  [{}] {} {:<20} {:>8}  {} ({})",
            row.id,
            row.appliance.icon(),
            row.label,
            row.remaining,
            state,
            row.appliance
        );
    }
    out
}
