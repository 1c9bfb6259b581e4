//! Output types for search tool operations
//!
//! These types are used as the return values from search tool methods.
//! They are serialized to JSON strings for the MCP protocol, and can be
//! deserialized in tests for type-safe validation.

use serde::{Deserialize, Serialize};

use crate::controller::state::PopoverSnapshot;
use crate::navigation::NavigationTarget;

/// Popover after a focus, keystroke, blur or clear
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PopoverOutput {
    #[serde(flatten)]
    pub popover: PopoverSnapshot,
    pub suggestion_count: usize,
}

impl From<PopoverSnapshot> for PopoverOutput {
    fn from(popover: PopoverSnapshot) -> Self {
        Self {
            suggestion_count: popover.suggestion_count(),
            popover,
        }
    }
}

impl PopoverOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// Outcome of submitting a search or following a suggestion
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(tag = "status")]
pub enum SubmitOutput {
    /// The storefront navigated to `url`
    #[serde(rename = "navigated")]
    Navigated {
        url: String,
        target: NavigationTarget,
        recent_searches: Vec<String>,
    },
    /// Nothing happened, e.g. the query was blank
    #[serde(rename = "ignored")]
    Ignored { message: String },
    #[serde(rename = "error")]
    Error { error: String },
}

impl SubmitOutput {
    pub fn navigated(target: NavigationTarget, recent_searches: Vec<String>) -> Self {
        SubmitOutput::Navigated {
            url: target.to_url(),
            target,
            recent_searches,
        }
    }

    /// A blank query was submitted
    pub fn empty_query() -> Self {
        SubmitOutput::Ignored {
            message: "Search query is empty; nothing was submitted".to_string(),
        }
    }

    pub fn is_navigated(&self) -> bool {
        matches!(self, SubmitOutput::Navigated { .. })
    }

    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

/// The session's recent searches
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RecentSearchesOutput {
    pub recent_searches: Vec<String>,
    pub limit: usize,
}

impl RecentSearchesOutput {
    /// Convert to JSON string for MCP response
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"Failed to serialize response"}"#.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::InputState;

    #[test]
    fn test_submit_output_tagging() {
        let output = SubmitOutput::navigated(
            NavigationTarget::new("/search").with_param("q", "Ties"),
            vec!["Ties".to_string()],
        );
        let json: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(json["status"], "navigated");
        assert_eq!(json["url"], "/search?q=Ties");

        let ignored = SubmitOutput::Ignored {
            message: "blank".to_string(),
        };
        let parsed: SubmitOutput = serde_json::from_str(&ignored.to_json()).unwrap();
        assert!(!parsed.is_navigated());
    }

    #[test]
    fn test_popover_output_flattens_snapshot() {
        let output = PopoverOutput::from(PopoverSnapshot {
            state: InputState::RecentOnly,
            input: String::new(),
            is_open: true,
            recent_searches: vec!["Dresses".to_string()],
            suggestions: None,
        });
        let json: serde_json::Value = serde_json::from_str(&output.to_json()).unwrap();
        assert_eq!(json["state"], "recent_only");
        assert_eq!(json["suggestion_count"], 0);
        assert_eq!(json["recent_searches"][0], "Dresses");
    }
}
