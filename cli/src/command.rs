//! Line commands understood by the interactive loop.

use optimist_todos::{ParseFilterError, TodoFilter, TodoId};
use std::str::FromStr;
use thiserror::Error;

/// Help text printed by `help`
pub const HELP: &str = "\
commands:
  list                     show the list
  add <title>              add a todo
  toggle <id>              flip a todo's completion
  toggle-all               complete all (or un-complete if all are done)
  rm <id>                  delete a todo
  edit <id> <title>        rename a todo (an empty title deletes it)
  clear                    delete completed todos
  filter <all|active|completed>
  dismiss                  hide the error
  help                     show this help
  quit                     exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(String),
    Toggle(TodoId),
    ToggleAll,
    Remove(TodoId),
    Edit { id: TodoId, title: String },
    Clear,
    Filter(TodoFilter),
    Dismiss,
    Help,
    Quit,
}

/// Why a line could not be parsed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,

    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs a todo id")]
    MissingId(&'static str),

    #[error("{0:?} is not a todo id")]
    InvalidId(String),

    #[error(transparent)]
    Filter(#[from] ParseFilterError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word {
            "" => Err(CommandError::Empty),
            "list" | "ls" => Ok(Self::List),
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" => parse_id("toggle", rest).map(Self::Toggle),
            "toggle-all" => Ok(Self::ToggleAll),
            "rm" | "delete" => parse_id("rm", rest).map(Self::Remove),
            "edit" => {
                let (id, title) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(id, title)| (id, title.trim()));
                Ok(Self::Edit {
                    id: parse_id("edit", id)?,
                    title: title.to_string(),
                })
            },
            "clear" => Ok(Self::Clear),
            "filter" => Ok(Self::Filter(rest.parse()?)),
            "dismiss" => Ok(Self::Dismiss),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(command: &'static str, value: &str) -> Result<TodoId, CommandError> {
    if value.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    value
        .parse::<i64>()
        .map(TodoId::new)
        .map_err(|_| CommandError::InvalidId(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!("add  Buy milk ".parse(), Ok(Command::Add("Buy milk".to_string())));
        assert_eq!("toggle 3".parse(), Ok(Command::Toggle(TodoId::new(3))));
        assert_eq!("rm 12".parse(), Ok(Command::Remove(TodoId::new(12))));
        assert_eq!(
            "edit 4 Walk the dog".parse(),
            Ok(Command::Edit {
                id: TodoId::new(4),
                title: "Walk the dog".to_string()
            })
        );
        assert_eq!(
            "filter #/completed".parse(),
            Ok(Command::Filter(TodoFilter::Completed))
        );
    }

    #[test]
    fn bare_words() {
        assert_eq!("list".parse(), Ok(Command::List));
        assert_eq!("toggle-all".parse(), Ok(Command::ToggleAll));
        assert_eq!("clear".parse(), Ok(Command::Clear));
        assert_eq!("dismiss".parse(), Ok(Command::Dismiss));
        assert_eq!("quit".parse(), Ok(Command::Quit));
    }

    #[test]
    fn blank_titles_reach_the_controller() {
        // Validation and rename-to-delete are the controller's call
        assert_eq!("add".parse(), Ok(Command::Add(String::new())));
        assert_eq!(
            "edit 2".parse(),
            Ok(Command::Edit {
                id: TodoId::new(2),
                title: String::new()
            })
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("toggle".parse::<Command>(), Err(CommandError::MissingId("toggle")));
        assert_eq!(
            "rm x".parse::<Command>(),
            Err(CommandError::InvalidId("x".to_string()))
        );
        assert_eq!(
            "frobnicate".parse::<Command>(),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
        assert!(matches!(
            "filter done".parse::<Command>(),
            Err(CommandError::Filter(_))
        ));
    }
}
