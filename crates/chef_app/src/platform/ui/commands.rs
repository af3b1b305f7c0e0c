//! Parses one line of terminal input into a cook-mode command.

use chef_core::{ActionId, Appliance, Msg, TimerId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Core(Msg),
    ShowTimers,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`; type `help` for the list")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("unknown appliance `{0}`")]
    UnknownAppliance(String),
}

pub const HELP: &str = "\
next | n                      go to the next step
back | b                      go to the previous step
serves <n>                    change the number of servings
say <text>                    ask the kitchen assistant
accept <id> | dismiss <id>    act on a suggested action
ack                           acknowledge the temperature notice
timers                        show timers (starts suggested timers)
timer add <appliance> <minutes> [label]
timer toggle|reset|delete <id>
help                          show this list
quit | q                      leave cook mode";

/// Returns `Ok(None)` for blank lines.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "next" | "n" => Command::Core(Msg::NextStep),
        "back" | "b" => Command::Core(Msg::PreviousStep),
        "serves" => Command::Core(Msg::ServingsChanged(number(rest, "serves", "a count")?)),
        "say" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "say",
                    expected: "a message",
                });
            }
            Command::Core(Msg::ChatSubmitted(rest.to_string()))
        }
        "accept" => Command::Core(Msg::ActionAccepted(action_id(rest, "accept")?)),
        "dismiss" => Command::Core(Msg::ActionDismissed(action_id(rest, "dismiss")?)),
        "ack" => Command::Core(Msg::NoticeAcknowledged),
        "timers" => Command::ShowTimers,
        "timer" => parse_timer(rest)?,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_timer(rest: &str) -> Result<Command, CommandError> {
    let mut parts = rest.split_whitespace();
    let sub = parts.next().unwrap_or_default().to_ascii_lowercase();
    match sub.as_str() {
        "add" => {
            let appliance_name = parts.next().ok_or(CommandError::MissingArgument {
                command: "timer add",
                expected: "an appliance",
            })?;
            let appliance = Appliance::from_name(appliance_name)
                .ok_or_else(|| CommandError::UnknownAppliance(appliance_name.to_string()))?;
            let minutes = number(parts.next().unwrap_or_default(), "timer add", "minutes")?;
            let label = parts.collect::<Vec<_>>().join(" ");
            Ok(Command::Core(Msg::ManualTimerRequested {
                appliance,
                label,
                minutes,
            }))
        }
        "toggle" => Ok(Command::Core(Msg::TimerToggled(timer_id(parts.next(), "timer toggle")?))),
        "reset" => Ok(Command::Core(Msg::TimerReset(timer_id(parts.next(), "timer reset")?))),
        "delete" => Ok(Command::Core(Msg::TimerDeleted(timer_id(parts.next(), "timer delete")?))),
        "" => Err(CommandError::MissingArgument {
            command: "timer",
            expected: "add, toggle, reset or delete",
        }),
        other => Err(CommandError::Unknown(format!("timer {other}"))),
    }
}

fn number<T: std::str::FromStr>(
    text: &str,
    command: &'static str,
    expected: &'static str,
) -> Result<T, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    text.parse()
        .map_err(|_| CommandError::NotANumber(text.to_string()))
}

fn action_id(text: &str, command: &'static str) -> Result<ActionId, CommandError> {
    number(text, command, "an action id")
}

fn timer_id(text: Option<&str>, command: &'static str) -> Result<TimerId, CommandError> {
    number(text.unwrap_or_default(), command, "a timer id")
}
