//! Remote suggestion lookups
//!
//! [`SuggestionSource`] is the seam between the fetcher and whatever answers
//! suggestion queries. [`CommerceSuggestionClient`] answers them from the
//! Shopper Search `search-suggestions` endpoint.

use anyhow::{Context, Result, bail};
use std::future::Future;
use zeroize::Zeroizing;

use crate::config::{CommerceApiConfig, SiteContext};
use crate::suggest::types::{SuggestionResponse, SuggestionResult};

/// Something that can answer a suggestion query
pub trait SuggestionSource: Send + Sync {
    fn fetch_suggestions(
        &self,
        query: &str,
        site: &SiteContext,
    ) -> impl Future<Output = Result<SuggestionResult>> + Send;
}

/// Source that never suggests anything, for front ends that only submit
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuggestions;

impl SuggestionSource for NoSuggestions {
    async fn fetch_suggestions(&self, query: &str, _site: &SiteContext) -> Result<SuggestionResult> {
        Ok(SuggestionResult::empty(query))
    }
}

/// HTTP client for the search-suggestions endpoint
#[derive(Clone)]
pub struct CommerceSuggestionClient {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    access_token: Option<Zeroizing<String>>,
    limit: u32,
}

impl std::fmt::Debug for CommerceSuggestionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceSuggestionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl CommerceSuggestionClient {
    /// Create a client for the configured organization
    pub fn new(api: &CommerceApiConfig, limit: u32) -> Result<Self> {
        let endpoint = api.suggestions_url()?;
        let client = Self::build_http_client()?;
        tracing::debug!("Search suggestions endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            access_token: api.access_token.clone(),
            limit,
        })
    }

    /// Build the HTTP client with proper configuration
    fn build_http_client() -> Result<reqwest::Client> {
        let user_agent = Self::format_user_agent();

        tracing::info!("Creating HTTP client with User-Agent: {}", user_agent);

        reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")
    }

    /// Format the user-agent string for API compliance
    fn format_user_agent() -> String {
        format!(
            "{}/{} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_REPOSITORY")
        )
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

impl SuggestionSource for CommerceSuggestionClient {
    async fn fetch_suggestions(&self, query: &str, site: &SiteContext) -> Result<SuggestionResult> {
        let limit = self.limit.to_string();
        let mut request = self.client.get(self.endpoint.clone()).query(&[
            ("siteId", site.site_id.as_str()),
            ("q", query),
            ("locale", site.locale.as_str()),
            ("currency", site.currency.as_str()),
            ("limit", limit.as_str()),
        ]);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token.as_str());
        }

        tracing::debug!("Requesting suggestions for '{}'", query);
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to request suggestions for '{query}'"))?;

        if !response.status().is_success() {
            bail!(
                "Suggestion request for '{}' failed: HTTP {}",
                query,
                response.status()
            );
        }

        let body: SuggestionResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse suggestions for '{query}'"))?;

        Ok(SuggestionResult::from_response(query, body, site))
    }
}
