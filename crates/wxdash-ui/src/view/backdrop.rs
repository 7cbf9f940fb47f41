//! Backdrop image chosen from the current condition keyword.

use crate::services::Snapshot;

const IMAGE_PARAMS: &str = "?auto=format&fit=crop&w=1920&q=80";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    Clear,
    Clouds,
    Rain,
    Default,
}

impl Backdrop {
    /// First match wins: `clear`, then `cloud`, then `rain`.
    pub fn for_condition(main: &str) -> Self {
        let main = main.to_lowercase();
        if main.contains("clear") {
            Self::Clear
        } else if main.contains("cloud") {
            Self::Clouds
        } else if main.contains("rain") {
            Self::Rain
        } else {
            Self::Default
        }
    }

    pub fn for_snapshot(snapshot: Option<&Snapshot>) -> Self {
        snapshot
            .map(|s| Self::for_condition(&s.current.condition.main))
            .unwrap_or(Self::Default)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "clear skies",
            Self::Clouds => "overcast",
            Self::Rain => "rainfall",
            Self::Default => "mountains",
        }
    }

    pub fn url(&self) -> String {
        let photo = match self {
            Self::Clear => "photo-1601297183305-6df142704ea2",
            Self::Clouds => "photo-1534088568595-a066f410bcda",
            Self::Rain => "photo-1519692933481-e162a57d6721",
            Self::Default => "photo-1464822759023-fed622ff2c3b",
        };
        format!("https://images.unsplash.com/{}{}", photo, IMAGE_PARAMS)
    }
}
