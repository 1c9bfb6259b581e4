use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use storefront_search::StorefrontSearchService;
use storefront_search::config::SearchConfig;
use storefront_search::controller::outputs::{PopoverOutput, RecentSearchesOutput, SubmitOutput};
use storefront_search::SearchInputController;
use storefront_search::controller::ControllerSettings;
use storefront_search::navigation::HistoryNavigator;
use storefront_search::recent::RecentSearches;
use storefront_search::service::StorefrontController;
use storefront_search::session::constants::DEFAULT_SESSION_QUOTA_BYTES;
use storefront_search::session::{FileSessionStore, MemorySessionStore, SessionStore};
use storefront_search::suggest::{NoSuggestions, SuggestionFetcher};

/// Storefront search box: session-scoped recent searches and live suggestions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ~/.storefront-search/config.toml)
    #[arg(long, env = "STOREFRONT_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Session to resume. Sessions are stored as files so separate invocations can share one
    #[arg(long, env = "STOREFRONT_SEARCH_SESSION")]
    session: Option<String>,

    /// Directory holding session files (defaults to ~/.storefront-search/sessions)
    #[arg(long, env = "STOREFRONT_SEARCH_SESSIONS_DIR")]
    sessions_dir: Option<PathBuf>,

    /// Commerce API base URL, overriding the one derived from the short code
    #[arg(long, env = "STOREFRONT_SEARCH_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "STOREFRONT_SEARCH_ORGANIZATION_ID")]
    organization_id: Option<String>,

    #[arg(long, env = "STOREFRONT_SEARCH_SITE_ID")]
    site_id: Option<String>,

    #[arg(long, env = "STOREFRONT_SEARCH_LOCALE")]
    locale: Option<String>,

    /// Pre-issued shopper access token
    #[arg(long, env = "STOREFRONT_SEARCH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the search box as MCP tools on stdio (default)
    Serve,
    /// Show the suggestion popover for a query
    Suggest { query: String },
    /// Submit a search, saving it to the session's recent searches
    Submit { query: String },
    /// List the session's recent searches
    Recent,
    /// Clear the session's recent searches
    ClearRecent,
    /// End the session, deleting everything stored for it
    EndSession,
    /// Remove sessions that have not been used recently
    Prune,
}

impl Args {
    fn load_config(&self) -> Result<SearchConfig> {
        let mut config = SearchConfig::load(self.config.as_deref())?;
        if let Some(base_url) = &self.base_url {
            config.commerce_api.base_url = Some(base_url.clone());
        }
        if let Some(organization_id) = &self.organization_id {
            config.commerce_api.organization_id = organization_id.clone();
        }
        if let Some(site_id) = &self.site_id {
            config.site.site_id = site_id.clone();
        }
        if let Some(locale) = &self.locale {
            config.site.locale = locale.clone();
        }
        if let Some(token) = &self.access_token {
            config.commerce_api.access_token = Some(Zeroizing::new(token.clone()));
        }
        Ok(config)
    }

    fn sessions_dir(&self, config: &SearchConfig) -> Result<Option<PathBuf>> {
        match &self.sessions_dir {
            Some(dir) => Ok(Some(dir.clone())),
            None => config.session.sessions_dir(),
        }
    }

    fn open_session(&self, config: &SearchConfig) -> Result<FileSessionStore> {
        let store =
            FileSessionStore::open(self.sessions_dir(config)?, self.session.as_deref())?;
        if self.session.is_none() {
            eprintln!("Started session {}", store.session_id());
        }
        Ok(store)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Log to stderr to avoid conflicts with stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = args.load_config()?;

    match args.command {
        None | Some(Commands::Serve) => serve(&args, &config).await,
        Some(Commands::Suggest { ref query }) => suggest(&args, config, query).await,
        Some(Commands::Submit { ref query }) => submit(&args, &config, query).await,
        Some(Commands::Recent) => {
            let recent = recent_searches(&args, &config)?;
            let output = RecentSearchesOutput {
                recent_searches: recent.get(),
                limit: recent.limit(),
            };
            println!("{}", output.to_json());
            Ok(())
        }
        Some(Commands::ClearRecent) => {
            recent_searches(&args, &config)?.clear();
            println!("Cleared recent searches");
            Ok(())
        }
        Some(Commands::EndSession) => {
            if args.session.is_none() {
                bail!("--session is required to end a session");
            }
            args.open_session(&config)?.end()
        }
        Some(Commands::Prune) => {
            let dir = match args.sessions_dir(&config)? {
                Some(dir) => dir,
                None => FileSessionStore::default_sessions_dir()?,
            };
            let removed = FileSessionStore::prune_expired(&dir, config.session.max_age())?;
            println!("Removed {} expired session(s)", removed.len());
            Ok(())
        }
    }
}

async fn serve(args: &Args, config: &SearchConfig) -> Result<()> {
    tracing::info!("Starting storefront search MCP server on stdio...");

    // Without an explicit session the process lifetime is the session
    let store: Box<dyn SessionStore> = match &args.session {
        Some(_) => Box::new(args.open_session(config)?),
        None => Box::new(MemorySessionStore::with_quota(DEFAULT_SESSION_QUOTA_BYTES)),
    };

    let search_service = StorefrontSearchService::new(config, store)?;

    let service = search_service.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}

async fn suggest(args: &Args, mut config: SearchConfig, query: &str) -> Result<()> {
    // One keystroke, so there is nothing to debounce
    config.suggestions.debounce_ms = 0;
    let store: Box<dyn SessionStore> = Box::new(args.open_session(&config)?);
    let controller = StorefrontController::from_config(&config, store, HistoryNavigator::new())
        .context("Suggestions need commerce_api.organization_id and a base URL or short code")?;

    controller.focus().await;
    let snapshot = controller.input(query).await;
    println!("{}", PopoverOutput::from(snapshot).to_json());
    Ok(())
}

/// Submitting needs no suggestions, so it works without a commerce API
async fn submit(args: &Args, config: &SearchConfig, query: &str) -> Result<()> {
    let controller = SearchInputController::new(
        recent_searches(args, config)?,
        SuggestionFetcher::new(NoSuggestions),
        HistoryNavigator::new(),
        config.site.clone(),
        ControllerSettings::from(&config.suggestions),
    );

    let output = match controller.submit_text(query).await {
        Some(target) => SubmitOutput::navigated(target, controller.recent_searches().await),
        None => SubmitOutput::empty_query(),
    };
    println!("{}", output.to_json());
    Ok(())
}

fn recent_searches(args: &Args, config: &SearchConfig) -> Result<RecentSearches<FileSessionStore>> {
    let store = args.open_session(config)?;
    Ok(RecentSearches::with_settings(
        store,
        config.recent_searches.key.clone(),
        config.recent_searches.limit,
    ))
}
