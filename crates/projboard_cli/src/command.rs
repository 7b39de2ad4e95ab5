//! Line command parsing for the interactive board.

use projboard_core::ProjectStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <title> | <description> | <people>`
    Add {
        title: String,
        description: String,
        people: String,
    },
    /// `drag <id-or-prefix> <active|finished>`
    Drag { id: String, to: ProjectStatus },
    /// `abandon <id-or-prefix>`: drag-start then drag-end, no drop.
    Abandon { id: String },
    Show,
    Json,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add <title> | <description> | <people>   submit the project form
  drag <id> <active|finished>              drag a card onto a list
  abandon <id>                             start a drag and let go outside any list
  show                                     print the board
  json                                     print the store as JSON
  help                                     show this text
  quit                                     exit";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "add" => {
            let parts: Vec<&str> = rest.splitn(3, '|').collect();
            match parts.as_slice() {
                [title, description, people] => Ok(Command::Add {
                    title: title.trim().to_string(),
                    description: description.trim().to_string(),
                    people: people.trim().to_string(),
                }),
                _ => Err("usage: add <title> | <description> | <people>".to_string()),
            }
        }
        "drag" => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next().and_then(ProjectStatus::parse), args.next()) {
                (Some(id), Some(to), None) => Ok(Command::Drag {
                    id: id.to_string(),
                    to,
                }),
                _ => Err("usage: drag <id> <active|finished>".to_string()),
            }
        }
        "abandon" if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
            Ok(Command::Abandon {
                id: rest.to_string(),
            })
        }
        "abandon" => Err("usage: abandon <id>".to_string()),
        "show" | "ls" => Ok(Command::Show),
        "json" => Ok(Command::Json),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "" => Err(String::new()),
        other => Err(format!("unknown command `{other}`; try `help`")),
    }
}
