//! # Suggest Module
//!
//! Remote search suggestions for the text typed so far.
//!
//! ## Key Components
//!
//! - [`types`] - Wire format of the suggestions endpoint and the render-ready result
//! - [`client`] - The [`SuggestionSource`] seam, its HTTP implementation and a no-op source
//! - [`fetcher`] - Last-query-wins fetching with timeout and soft-fail handling

pub mod client;
pub mod fetcher;
pub mod types;

pub use client::{CommerceSuggestionClient, NoSuggestions, SuggestionSource};
pub use fetcher::SuggestionFetcher;
pub use types::{Suggestion, SuggestionKind, SuggestionResult};
