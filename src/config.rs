//! # Configuration
//!
//! Settings are read from a TOML file (by default
//! `~/.storefront-search/config.toml`). Every section is optional and falls
//! back to the defaults below; command-line flags override file values.
//!
//! ```toml
//! [commerce_api]
//! short_code = "kv7kzm78"
//! organization_id = "f_ecom_zzrf_001"
//!
//! [site]
//! site_id = "RefArchGlobal"
//! locale = "en-GB"
//! currency = "GBP"
//! site_alias = "uk"
//! show_locale_in_path = true
//!
//! [suggestions]
//! debounce_ms = 300
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zeroize::Zeroizing;

use crate::session::constants::{
    APP_ROOT_DIR, CONFIG_FILE, RECENT_SEARCH_KEY, RECENT_SEARCH_LIMIT,
};

const SUGGESTIONS_PATH: &str = "search/shopper-search/v1/organizations";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub commerce_api: CommerceApiConfig,
    pub site: SiteContext,
    pub recent_searches: RecentSearchConfig,
    pub suggestions: SuggestionConfig,
    pub session: SessionConfig,
}

/// Connection settings for the commerce API
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceApiConfig {
    /// Short code of the API instance, used to derive the host name
    pub short_code: String,
    pub organization_id: String,
    /// Full base URL, overriding the one derived from `short_code`
    pub base_url: Option<String>,
    /// Pre-issued shopper access token sent as a bearer token
    #[serde(skip_serializing, deserialize_with = "deserialize_secret")]
    pub access_token: Option<Zeroizing<String>>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<Zeroizing<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()).map(Zeroizing::new))
}

impl fmt::Debug for CommerceApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommerceApiConfig")
            .field("short_code", &self.short_code)
            .field("organization_id", &self.organization_id)
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl CommerceApiConfig {
    /// Base URL of the API instance
    pub fn base_url(&self) -> Result<String> {
        if let Some(base_url) = self.base_url.as_deref().filter(|u| !u.is_empty()) {
            return Ok(base_url.trim_end_matches('/').to_string());
        }
        if self.short_code.is_empty() {
            bail!("Either commerce_api.base_url or commerce_api.short_code must be set");
        }
        Ok(format!(
            "https://{}.api.commercecloud.salesforce.com",
            self.short_code
        ))
    }

    /// URL of the search-suggestions endpoint for the configured organization
    pub fn suggestions_url(&self) -> Result<reqwest::Url> {
        if self.organization_id.is_empty() {
            bail!("commerce_api.organization_id must be set");
        }
        let url = format!(
            "{}/{SUGGESTIONS_PATH}/{}/search-suggestions",
            self.base_url()?,
            self.organization_id
        );
        reqwest::Url::parse(&url).with_context(|| format!("Invalid suggestions URL: {url}"))
    }
}

/// Site and locale the shopper is browsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteContext {
    pub site_id: String,
    pub locale: String,
    pub currency: String,
    /// Short alias shown as the first path segment (e.g. `uk`)
    pub site_alias: Option<String>,
    /// Whether the locale is shown as a path segment after the alias
    pub show_locale_in_path: bool,
}

impl Default for SiteContext {
    fn default() -> Self {
        Self {
            site_id: "RefArchGlobal".to_string(),
            locale: "en-GB".to_string(),
            currency: "GBP".to_string(),
            site_alias: None,
            show_locale_in_path: false,
        }
    }
}

impl SiteContext {
    /// Path prefix for storefront links, e.g. `/uk/en-GB` or an empty string
    pub fn path_prefix(&self) -> String {
        let mut prefix = String::new();
        if let Some(alias) = self.site_alias.as_deref().filter(|a| !a.is_empty()) {
            prefix.push('/');
            prefix.push_str(alias);
        }
        if self.show_locale_in_path && !self.locale.is_empty() {
            prefix.push('/');
            prefix.push_str(&self.locale);
        }
        prefix
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentSearchConfig {
    /// Session storage key holding the list
    pub key: String,
    pub limit: usize,
}

impl Default for RecentSearchConfig {
    fn default() -> Self {
        Self {
            key: RECENT_SEARCH_KEY.to_string(),
            limit: RECENT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Quiet period after a keystroke before the lookup is issued
    pub debounce_ms: u64,
    pub timeout_ms: u64,
    /// Maximum hits requested per suggestion group
    pub limit: u32,
    /// Shortest trimmed input that triggers a remote lookup
    pub min_query_length: usize,
    /// Merge recent searches matching the input into remote suggestions
    pub include_recent_matches: bool,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            timeout_ms: 5_000,
            limit: 5,
            min_query_length: 1,
            include_recent_matches: true,
        }
    }
}

impl SuggestionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory holding file-backed sessions (defaults to ~/.storefront-search/sessions)
    pub dir: Option<String>,
    /// Sessions untouched for longer than this are pruned
    pub max_age_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_age_hours: 24,
        }
    }
}

impl SessionConfig {
    /// Sessions directory with `~` and environment variables expanded
    pub fn sessions_dir(&self) -> Result<Option<PathBuf>> {
        self.dir.as_deref().map(expand_path).transpose()
    }

    pub fn max_age(&self) -> chrono::Duration {
        // Capped at roughly a century
        chrono::Duration::hours(self.max_age_hours.min(876_000) as i64)
    }
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .with_context(|| format!("Failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

impl SearchConfig {
    /// Default configuration file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .context("Failed to get home directory")?
            .join(APP_ROOT_DIR)
            .join(CONFIG_FILE))
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// An explicit path must exist. A missing default file yields the default
    /// configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Ok(path) if path.exists() => path,
                _ => {
                    tracing::debug!("No configuration file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.recent_searches.limit == 0 {
            bail!("recent_searches.limit must be at least 1");
        }
        if self.recent_searches.key.is_empty() {
            bail!("recent_searches.key cannot be empty");
        }
        if self.suggestions.min_query_length == 0 {
            bail!("suggestions.min_query_length must be at least 1");
        }
        Ok(())
    }
}
