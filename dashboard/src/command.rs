//! Interactive commands typed by the user while the feed is running.

use std::str::FromStr;

use market::view::SortKey;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the search term. `search` with no argument clears it.
    Search(String),
    Clear,
    Sort(SortKey),
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "search" | "/" => Ok(Command::Search(arg.to_string())),
            "clear" => Ok(Command::Clear),
            "sort" => Ok(Command::Sort(arg.parse()?)),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(AppError::UnknownCommand(line.to_string())),
        }
    }
}
