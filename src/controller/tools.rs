use rmcp::schemars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::controller::SearchInputController;
use crate::controller::outputs::{PopoverOutput, RecentSearchesOutput, SubmitOutput};
use crate::navigation::Navigator;
use crate::session::SessionStore;
use crate::suggest::client::SuggestionSource;
use crate::suggest::types::SuggestionKind;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeSearchParams {
    #[schemars(
        description = "The full text of the search box after the keystroke (not just the typed character)"
    )]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubmitSearchParams {
    #[schemars(
        description = "Optional query to submit. When omitted, the current search box text is submitted."
    )]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChooseRecentSearchParams {
    #[schemars(description = "A term from the recent searches list")]
    pub term: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChooseSuggestionParams {
    #[schemars(description = "Suggestion group: category, product, brand or phrase")]
    pub kind: String,
    #[schemars(description = "Display name of the suggestion as shown in the popover")]
    pub name: String,
}

fn parse_kind(kind: &str) -> Option<SuggestionKind> {
    match kind.trim().to_lowercase().as_str() {
        "category" | "categories" => Some(SuggestionKind::Category),
        "product" | "products" => Some(SuggestionKind::Product),
        "brand" | "brands" => Some(SuggestionKind::Brand),
        "phrase" | "phrases" => Some(SuggestionKind::Phrase),
        _ => None,
    }
}

/// Search box operations exposed as tools, each answering with a JSON string
pub struct SearchTools<St, Src, N> {
    controller: SearchInputController<St, Src, N>,
}

impl<St, Src, N> Clone for SearchTools<St, Src, N> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<St, Src, N> SearchTools<St, Src, N>
where
    St: SessionStore,
    Src: SuggestionSource,
    N: Navigator,
{
    pub fn new(controller: SearchInputController<St, Src, N>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &SearchInputController<St, Src, N> {
        &self.controller
    }

    pub async fn focus_search(&self) -> String {
        PopoverOutput::from(self.controller.focus().await).to_json()
    }

    pub async fn blur_search(&self) -> String {
        PopoverOutput::from(self.controller.blur().await).to_json()
    }

    pub async fn type_search(&self, params: TypeSearchParams) -> String {
        PopoverOutput::from(self.controller.input(&params.text).await).to_json()
    }

    pub async fn submit_search(&self, params: SubmitSearchParams) -> String {
        let submitted = match params.query {
            Some(query) => self.controller.submit_text(&query).await,
            None => self.controller.submit().await,
        };

        match submitted {
            Some(target) => {
                SubmitOutput::navigated(target, self.controller.recent_searches().await)
            }
            None => SubmitOutput::empty_query(),
        }
        .to_json()
    }

    pub async fn choose_recent_search(&self, params: ChooseRecentSearchParams) -> String {
        match self.controller.choose_recent(&params.term).await {
            Some(target) => {
                SubmitOutput::navigated(target, self.controller.recent_searches().await)
            }
            None => SubmitOutput::Ignored {
                message: "Recent search term is empty".to_string(),
            },
        }
        .to_json()
    }

    pub async fn choose_suggestion(&self, params: ChooseSuggestionParams) -> String {
        let Some(kind) = parse_kind(&params.kind) else {
            return SubmitOutput::Error {
                error: format!(
                    "Unknown suggestion kind '{}'. Expected category, product, brand or phrase",
                    params.kind
                ),
            }
            .to_json();
        };

        let snapshot = self.controller.snapshot().await;
        let suggestion = snapshot.suggestions.as_ref().and_then(|result| {
            let group = match kind {
                SuggestionKind::Category => &result.categories,
                SuggestionKind::Product => &result.products,
                SuggestionKind::Brand => &result.brands,
                SuggestionKind::Phrase => &result.phrases,
            };
            group.iter().find(|s| s.name == params.name).cloned()
        });

        match suggestion {
            Some(suggestion) => {
                let target = self.controller.choose_suggestion(&suggestion).await;
                SubmitOutput::navigated(target, self.controller.recent_searches().await)
            }
            None => SubmitOutput::Error {
                error: format!(
                    "No {} suggestion named '{}' is currently shown",
                    params.kind, params.name
                ),
            },
        }
        .to_json()
    }

    pub async fn get_recent_searches(&self) -> String {
        RecentSearchesOutput {
            recent_searches: self.controller.recent_searches().await,
            limit: self.controller.recent_limit().await,
        }
        .to_json()
    }

    pub async fn clear_recent_searches(&self) -> String {
        PopoverOutput::from(self.controller.clear_recent().await).to_json()
    }
}
