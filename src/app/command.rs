use crate::utils::error::{Result, RosterError};
use std::str::FromStr;

pub const HELP_TEXT: &str = "\
Commands:
  view all              List every member with their hours
  view below [hours]    List members below the goal (or the given hours)
  reset                 Set every member's hours to 0
  populate | sync       Add members from the group chat (existing members are kept)
  members               Show the group chat's member list without changing the roster
  save [path]           Write the roster to its file (or to the given path)
  help                  Show this help
  exit | quit           Leave the program";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ViewAll,
    ViewBelow(Option<f64>),
    Reset,
    Populate,
    Members,
    Save(Option<String>),
    Help,
    Exit,
}

impl FromStr for Command {
    type Err = RosterError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match keyword.to_lowercase().as_str() {
            "view" => parse_view(rest),
            "reset" => Ok(Command::Reset),
            "populate" | "sync" => Ok(Command::Populate),
            "members" => Ok(Command::Members),
            "save" if rest.is_empty() => Ok(Command::Save(None)),
            "save" => Ok(Command::Save(Some(rest.to_string()))),
            "help" | "?" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            "" => Err(RosterError::Command {
                message: "empty command".to_string(),
            }),
            other => Err(RosterError::Command {
                message: format!("'{}' is not a command", other),
            }),
        }
    }
}

fn parse_view(rest: &str) -> Result<Command> {
    let mut parts = rest.split_whitespace();
    match parts.next().map(str::to_lowercase).as_deref() {
        None | Some("all") => Ok(Command::ViewAll),
        Some("below") => match parts.next() {
            None => Ok(Command::ViewBelow(None)),
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|hours| !hours.is_nan())
                .map(|hours| Command::ViewBelow(Some(hours)))
                .ok_or_else(|| RosterError::Command {
                    message: format!("'{}' is not a number of hours", value),
                }),
        },
        Some(other) => Err(RosterError::Command {
            message: format!("unknown view '{}', expected 'all' or 'below'", other),
        }),
    }
}
