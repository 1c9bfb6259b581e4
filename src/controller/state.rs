//! Search input states and the popover view derived from them

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SuggestionConfig;
use crate::suggest::types::SuggestionResult;

/// Where the search input is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputState {
    /// Input not focused, no suggestions shown
    Idle,
    /// Text entered, lookup pending
    Typing,
    /// Remote suggestions for the current text are shown
    Suggesting,
    /// Input empty; only recent searches are shown
    RecentOnly,
    /// Query committed; transient before returning to idle
    Submitted,
}

impl InputState {
    /// Convert state to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InputState::Idle => "idle",
            InputState::Typing => "typing",
            InputState::Suggesting => "suggesting",
            InputState::RecentOnly => "recent_only",
            InputState::Submitted => "submitted",
        }
    }

    /// Whether the suggestion popover may be shown in this state
    pub fn shows_popover(&self) -> bool {
        matches!(
            self,
            InputState::Typing | InputState::Suggesting | InputState::RecentOnly
        )
    }
}

/// Everything needed to render the suggestion popover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopoverSnapshot {
    pub state: InputState,
    pub input: String,
    pub is_open: bool,
    pub recent_searches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<SuggestionResult>,
}

impl PopoverSnapshot {
    pub fn suggestion_count(&self) -> usize {
        self.suggestions.as_ref().map_or(0, SuggestionResult::len)
    }
}

/// Behaviour knobs for the search input
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub debounce: Duration,
    pub min_query_length: usize,
    pub include_recent_matches: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&SuggestionConfig::default())
    }
}

impl From<&SuggestionConfig> for ControllerSettings {
    fn from(config: &SuggestionConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_length: config.min_query_length.max(1),
            include_recent_matches: config.include_recent_matches,
        }
    }
}
