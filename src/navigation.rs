//! Navigation targets and the navigation collaborator

use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

use crate::config::SiteContext;

/// A storefront route: path plus query-string parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<(String, String)>,
}

fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

impl NavigationTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Search results page for `term`
    pub fn search(site: &SiteContext, term: &str) -> Self {
        Self::new(format!("{}/search", site.path_prefix())).with_param("q", term)
    }

    /// Category listing page
    pub fn category(site: &SiteContext, category_id: &str) -> Self {
        Self::new(format!(
            "{}/category/{}",
            site.path_prefix(),
            encode_segment(category_id)
        ))
    }

    /// Product detail page
    pub fn product(site: &SiteContext, product_id: &str) -> Self {
        Self::new(format!(
            "{}/product/{}",
            site.path_prefix(),
            encode_segment(product_id)
        ))
    }

    /// Value of the first parameter named `key`
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `path?key=value` with form-encoded parameters
    pub fn to_url(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Performs client-side route transitions
pub trait Navigator: Send {
    fn navigate(&mut self, target: &NavigationTarget);
}

/// Navigator that records every transition, newest last
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Vec<NavigationTarget>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[NavigationTarget] {
        &self.history
    }

    pub fn current(&self) -> Option<&NavigationTarget> {
        self.history.last()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&mut self, target: &NavigationTarget) {
        tracing::info!("Navigating to {}", target);
        self.history.push(target.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uk_site() -> SiteContext {
        SiteContext {
            site_alias: Some("uk".to_string()),
            show_locale_in_path: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_search_target_with_prefix() {
        let target = NavigationTarget::search(&uk_site(), "Dresses");
        assert_eq!(target.path, "/uk/en-GB/search");
        assert_eq!(target.param("q"), Some("Dresses"));
        assert_eq!(target.to_url(), "/uk/en-GB/search?q=Dresses");
    }

    #[test]
    fn test_search_target_encodes_query() {
        let target = NavigationTarget::search(&SiteContext::default(), "red & blue");
        assert_eq!(target.to_url(), "/search?q=red+%26+blue");
    }

    #[test]
    fn test_category_and_product_links() {
        let site = uk_site();
        assert_eq!(
            NavigationTarget::category(&site, "womens-clothing-dresses").to_url(),
            "/uk/en-GB/category/womens-clothing-dresses"
        );
        assert_eq!(
            NavigationTarget::product(&site, "25565189M").to_string(),
            "/uk/en-GB/product/25565189M"
        );
    }

    #[test]
    fn test_history_navigator_records_in_order() {
        let site = SiteContext::default();
        let mut navigator = HistoryNavigator::new();
        navigator.navigate(&NavigationTarget::search(&site, "Tops"));
        navigator.navigate(&NavigationTarget::search(&site, "Ties"));

        assert_eq!(navigator.history().len(), 2);
        assert_eq!(navigator.current().unwrap().param("q"), Some("Ties"));
    }
}
