//! Parsing of lines typed at the dashboard prompt.

use std::str::FromStr;

/// A user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search a city by name
    Search(String),
    /// Detect the device location and show its weather
    Locate,
    /// Switch between Celsius and Fahrenheit
    ToggleUnits,
    /// Search the n-th recent city (1-based as typed)
    Recent(usize),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("Nothing to search for")]
    Empty,
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Usage: :recent <1-5>")]
    BadRecentIndex,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseCommandError::Empty);
        }

        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Command::Search(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        match parts.next().unwrap_or_default() {
            "locate" | "l" => Ok(Command::Locate),
            "units" | "u" => Ok(Command::ToggleUnits),
            "recent" | "r" => parts
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n >= 1)
                .map(Command::Recent)
                .ok_or(ParseCommandError::BadRecentIndex),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP_TEXT: &str = "\
Type a city name and press Enter to search.
  :locate      use this device's location
  :units       toggle °C / °F
  :recent N    search the N-th recent city
  :help        show this help
  :quit        exit";
