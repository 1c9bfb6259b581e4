use anyhow::Result;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::config::SearchConfig;
use crate::controller::{
    SearchInputController, SearchTools,
    tools::{ChooseRecentSearchParams, ChooseSuggestionParams, SubmitSearchParams, TypeSearchParams},
};
use crate::navigation::HistoryNavigator;
use crate::session::SessionStore;
use crate::suggest::CommerceSuggestionClient;

/// Controller wired to the commerce API and a runtime-selected session store
pub type StorefrontController =
    SearchInputController<Box<dyn SessionStore>, CommerceSuggestionClient, HistoryNavigator>;

#[derive(Clone)]
pub struct StorefrontSearchService {
    search_tools: SearchTools<Box<dyn SessionStore>, CommerceSuggestionClient, HistoryNavigator>,
    tool_router: ToolRouter<Self>,
}

impl StorefrontSearchService {
    pub fn new(config: &SearchConfig, store: Box<dyn SessionStore>) -> Result<Self> {
        let controller = StorefrontController::from_config(config, store, HistoryNavigator::new())?;

        Ok(Self {
            search_tools: SearchTools::new(controller),
            tool_router: Self::tool_router(),
        })
    }

    pub fn controller(&self) -> &StorefrontController {
        self.search_tools.controller()
    }
}

#[tool_router]
impl StorefrontSearchService {
    #[tool(
        description = "Focus the storefront search box. With an empty box this opens the popover with the shopper's recent searches for this session."
    )]
    pub async fn focus_search(&self) -> String {
        self.search_tools.focus_search().await
    }

    #[tool(
        description = "Move focus away from the search box. Closes the popover; the typed text is kept."
    )]
    pub async fn blur_search(&self) -> String {
        self.search_tools.blur_search().await
    }

    #[tool(
        description = "Update the search box text as the shopper types. Returns the popover with remote suggestions (categories, products, brands, phrases) for the text plus matching recent searches. Only the latest text's suggestions are ever shown."
    )]
    pub async fn type_search(&self, params: Parameters<TypeSearchParams>) -> String {
        self.search_tools.type_search(params.0).await
    }

    #[tool(
        description = "Submit a search, like pressing Enter. Saves the query to recent searches and navigates to the search results page. Blank queries are ignored."
    )]
    pub async fn submit_search(&self, params: Parameters<SubmitSearchParams>) -> String {
        self.search_tools.submit_search(params.0).await
    }

    #[tool(
        description = "Search again for one of the recent searches shown in the popover. Moves it to the front of the recent searches list."
    )]
    pub async fn choose_recent_search(
        &self,
        params: Parameters<ChooseRecentSearchParams>,
    ) -> String {
        self.search_tools.choose_recent_search(params.0).await
    }

    #[tool(
        description = "Follow one of the remote suggestions currently shown in the popover, e.g. open a category or product page. Does not change recent searches."
    )]
    pub async fn choose_suggestion(&self, params: Parameters<ChooseSuggestionParams>) -> String {
        self.search_tools.choose_suggestion(params.0).await
    }

    #[tool(description = "List the recent searches of this session, most recent first.")]
    pub async fn get_recent_searches(&self) -> String {
        self.search_tools.get_recent_searches().await
    }

    #[tool(
        description = "Clear the recent searches of this session. Remote suggestions already shown are unaffected."
    )]
    pub async fn clear_recent_searches(&self) -> String {
        self.search_tools.clear_recent_searches().await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for StorefrontSearchService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation::from_build_env(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "MCP server driving a storefront search box. Use focus_search to see recent searches, type_search to get suggestions for the text typed so far, and submit_search to run a search. Recent searches live for the session only; clear them with clear_recent_searches.".to_string(),
            ),
            ..Default::default()
        }
    }
}
