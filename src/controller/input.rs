//! Search input controller
//!
//! Drives the search box through its states in response to discrete events
//! (focus, keystroke, submit, clear). Keystrokes merge the session's recent
//! searches with remote suggestions; submits commit the query to navigation
//! and to the recent search list.
//!
//! State lives behind one async mutex that is never held across the debounce
//! delay or the remote lookup, so later keystrokes are handled while an
//! earlier lookup is still in flight. Each keystroke bumps a counter, and a
//! lookup result is applied only if its keystroke is still the latest.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{SearchConfig, SiteContext};
use crate::controller::state::{ControllerSettings, InputState, PopoverSnapshot};
use crate::navigation::{NavigationTarget, Navigator};
use crate::recent::RecentSearches;
use crate::session::SessionStore;
use crate::suggest::client::{CommerceSuggestionClient, SuggestionSource};
use crate::suggest::fetcher::SuggestionFetcher;
use crate::suggest::types::{Suggestion, SuggestionResult};

struct InputInner<St, N> {
    state: InputState,
    input: String,
    keystroke: u64,
    suggestions: Option<SuggestionResult>,
    recent: RecentSearches<St>,
    navigator: N,
}

impl<St: SessionStore, N: Navigator> InputInner<St, N> {
    fn snapshot(&self, settings: &ControllerSettings) -> PopoverSnapshot {
        let recent_searches = match self.state {
            InputState::RecentOnly => self.recent.get(),
            InputState::Typing | InputState::Suggesting if settings.include_recent_matches => {
                self.recent.matching(&self.input)
            }
            _ => Vec::new(),
        };
        let suggestions = if self.state.shows_popover() {
            self.current_suggestions().cloned()
        } else {
            None
        };
        let has_content = !recent_searches.is_empty()
            || suggestions.as_ref().is_some_and(|s| !s.is_empty());

        PopoverSnapshot {
            state: self.state,
            input: self.input.clone(),
            is_open: self.state.shows_popover() && has_content,
            recent_searches,
            suggestions,
        }
    }

    /// Held suggestions, if they answer the text currently in the input
    fn current_suggestions(&self) -> Option<&SuggestionResult> {
        self.suggestions
            .as_ref()
            .filter(|s| s.query == self.input.trim())
    }

    /// Leave the input empty and unfocused
    fn reset(&mut self) {
        self.input.clear();
        self.suggestions = None;
        self.keystroke += 1;
        self.state = InputState::Idle;
    }
}

/// Search box state machine over recent searches, suggestions and navigation
pub struct SearchInputController<St, Src, N> {
    inner: Arc<Mutex<InputInner<St, N>>>,
    fetcher: Arc<SuggestionFetcher<Src>>,
    site: Arc<SiteContext>,
    settings: Arc<ControllerSettings>,
}

impl<St, Src, N> Clone for SearchInputController<St, Src, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            fetcher: self.fetcher.clone(),
            site: self.site.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<St, N> SearchInputController<St, CommerceSuggestionClient, N>
where
    St: SessionStore,
    N: Navigator,
{
    /// Build a controller backed by the commerce API suggestions endpoint
    pub fn from_config(config: &SearchConfig, store: St, navigator: N) -> Result<Self> {
        let client =
            CommerceSuggestionClient::new(&config.commerce_api, config.suggestions.limit)?;
        let fetcher = SuggestionFetcher::with_timeout(client, config.suggestions.timeout());
        let recent = RecentSearches::with_settings(
            store,
            config.recent_searches.key.clone(),
            config.recent_searches.limit,
        );

        Ok(Self::new(
            recent,
            fetcher,
            navigator,
            config.site.clone(),
            ControllerSettings::from(&config.suggestions),
        ))
    }
}

impl<St, Src, N> SearchInputController<St, Src, N>
where
    St: SessionStore,
    Src: SuggestionSource,
    N: Navigator,
{
    pub fn new(
        recent: RecentSearches<St>,
        fetcher: SuggestionFetcher<Src>,
        navigator: N,
        site: SiteContext,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InputInner {
                state: InputState::Idle,
                input: String::new(),
                keystroke: 0,
                suggestions: None,
                recent,
                navigator,
            })),
            fetcher: Arc::new(fetcher),
            site: Arc::new(site),
            settings: Arc::new(settings),
        }
    }

    pub fn site(&self) -> &SiteContext {
        &self.site
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Current popover view
    pub async fn snapshot(&self) -> PopoverSnapshot {
        self.inner.lock().await.snapshot(&self.settings)
    }

    pub async fn state(&self) -> InputState {
        self.inner.lock().await.state
    }

    /// Recent searches of this session, most recent first
    pub async fn recent_searches(&self) -> Vec<String> {
        self.inner.lock().await.recent.get()
    }

    /// Maximum number of recent searches kept
    pub async fn recent_limit(&self) -> usize {
        self.inner.lock().await.recent.limit()
    }

    /// Run `f` against the navigator
    pub async fn with_navigator<R>(&self, f: impl FnOnce(&N) -> R) -> R {
        f(&self.inner.lock().await.navigator)
    }

    /// The input gained focus
    ///
    /// Text without suggestions of its own, e.g. because a lookup was dropped
    /// on blur, is looked up again.
    pub async fn focus(&self) -> PopoverSnapshot {
        let (keystroke, query) = {
            let mut inner = self.inner.lock().await;
            let query = inner.input.trim().to_string();
            if query.is_empty() {
                inner.state = InputState::RecentOnly;
                return inner.snapshot(&self.settings);
            }
            if inner.current_suggestions().is_some() {
                inner.state = InputState::Suggesting;
                return inner.snapshot(&self.settings);
            }

            inner.state = InputState::Typing;
            if query.chars().count() < self.settings.min_query_length {
                return inner.snapshot(&self.settings);
            }
            inner.keystroke += 1;
            (inner.keystroke, query)
        };

        self.lookup(keystroke, query).await
    }

    /// The input lost focus; the typed text is kept
    pub async fn blur(&self) -> PopoverSnapshot {
        let mut inner = self.inner.lock().await;
        inner.state = InputState::Idle;
        inner.snapshot(&self.settings)
    }

    /// The input text changed to `text`
    ///
    /// Resolves once the lookup for this keystroke finished or was
    /// superseded, returning the popover as it stands at that point.
    pub async fn input(&self, text: &str) -> PopoverSnapshot {
        let (keystroke, query) = {
            let mut inner = self.inner.lock().await;
            inner.keystroke += 1;
            inner.input = text.to_string();

            let query = text.trim().to_string();
            if query.is_empty() {
                inner.suggestions = None;
                inner.state = InputState::RecentOnly;
                self.fetcher.cancel();
                return inner.snapshot(&self.settings);
            }

            inner.state = InputState::Typing;
            if query.chars().count() < self.settings.min_query_length {
                inner.suggestions = None;
                self.fetcher.cancel();
                return inner.snapshot(&self.settings);
            }
            (inner.keystroke, query)
        };

        self.lookup(keystroke, query).await
    }

    /// Debounce, then fetch suggestions for `query` and apply them if
    /// `keystroke` is still the latest and the input still awaits them
    async fn lookup(&self, keystroke: u64, query: String) -> PopoverSnapshot {
        if !self.settings.debounce.is_zero() {
            tokio::time::sleep(self.settings.debounce).await;
            let inner = self.inner.lock().await;
            if inner.keystroke != keystroke {
                tracing::debug!("Skipping lookup for '{}', input changed", query);
                return inner.snapshot(&self.settings);
            }
        }

        let fetched = self.fetcher.fetch(&query, &self.site).await;

        let mut inner = self.inner.lock().await;
        if inner.keystroke != keystroke || inner.state != InputState::Typing {
            tracing::debug!("Dropping suggestions for '{}', input moved on", query);
            return inner.snapshot(&self.settings);
        }
        if let Some(result) = fetched {
            inner.suggestions = Some(result);
            inner.state = InputState::Suggesting;
        }
        inner.snapshot(&self.settings)
    }

    /// Commit the current input as a search
    ///
    /// A blank input is ignored: nothing is navigated to or remembered.
    pub async fn submit(&self) -> Option<NavigationTarget> {
        let mut inner = self.inner.lock().await;
        let term = inner.input.trim().to_string();
        if term.is_empty() {
            return None;
        }
        Some(self.commit(&mut inner, &term))
    }

    /// Replace the input with `text` and submit it at once, as when text is
    /// pasted and Enter pressed
    ///
    /// Pending lookups are dropped. A blank `text` is ignored like a blank
    /// submit and leaves the popover showing recent searches.
    pub async fn submit_text(&self, text: &str) -> Option<NavigationTarget> {
        let mut inner = self.inner.lock().await;
        inner.keystroke += 1;
        inner.input = text.to_string();
        inner.suggestions = None;
        self.fetcher.cancel();

        let term = text.trim().to_string();
        if term.is_empty() {
            inner.state = InputState::RecentOnly;
            return None;
        }
        Some(self.commit(&mut inner, &term))
    }

    /// Search again for a recent search picked from the popover
    pub async fn choose_recent(&self, term: &str) -> Option<NavigationTarget> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        let mut inner = self.inner.lock().await;
        inner.input = term.to_string();
        Some(self.commit(&mut inner, term))
    }

    fn commit(&self, inner: &mut InputInner<St, N>, term: &str) -> NavigationTarget {
        inner.recent.add(term);
        let target = NavigationTarget::search(&self.site, term);
        inner.state = InputState::Submitted;
        inner.navigator.navigate(&target);

        inner.reset();
        self.fetcher.cancel();
        target
    }

    /// Follow a remote suggestion's link; recent searches are not touched
    pub async fn choose_suggestion(&self, suggestion: &Suggestion) -> NavigationTarget {
        let mut inner = self.inner.lock().await;
        inner.navigator.navigate(&suggestion.link);
        inner.reset();
        self.fetcher.cancel();
        suggestion.link.clone()
    }

    /// Forget this session's recent searches
    ///
    /// Remote suggestions, shown or still on their way, are unaffected.
    pub async fn clear_recent(&self) -> PopoverSnapshot {
        let mut inner = self.inner.lock().await;
        inner.recent.clear();
        if inner.input.trim().is_empty() {
            inner.state = InputState::RecentOnly;
        }
        inner.snapshot(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::session::MemorySessionStore;
    use crate::suggest::client::NoSuggestions;
    use crate::suggest::types::SuggestionKind;
    use anyhow::bail;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Suggests "<query>es" as a category, after an optional per-query delay
    #[derive(Default)]
    struct StubSource {
        delays: HashMap<String, Duration>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl SuggestionSource for StubSource {
        async fn fetch_suggestions(
            &self,
            query: &str,
            site: &SiteContext,
        ) -> anyhow::Result<SuggestionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail {
                bail!("service unavailable");
            }
            let mut result = SuggestionResult::empty(query);
            result.categories.push(Suggestion {
                kind: SuggestionKind::Category,
                name: format!("{query}es"),
                link: NavigationTarget::category(site, &query.to_lowercase()),
                parent_name: None,
                price: None,
                currency: None,
            });
            Ok(result)
        }
    }

    type TestController = SearchInputController<MemorySessionStore, StubSource, HistoryNavigator>;

    fn settings() -> ControllerSettings {
        ControllerSettings {
            debounce: Duration::ZERO,
            min_query_length: 1,
            include_recent_matches: true,
        }
    }

    fn controller_with(source: StubSource, recent: &[&str], settings: ControllerSettings) -> TestController {
        let mut searches = RecentSearches::new(MemorySessionStore::new());
        for term in recent.iter().rev() {
            searches.add(term);
        }
        SearchInputController::new(
            searches,
            SuggestionFetcher::new(source),
            HistoryNavigator::new(),
            SiteContext::default(),
            settings,
        )
    }

    fn controller(recent: &[&str]) -> TestController {
        controller_with(StubSource::default(), recent, settings())
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let controller = controller(&["Dresses"]);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state, InputState::Idle);
        assert!(!snapshot.is_open);
        assert!(snapshot.recent_searches.is_empty());
    }

    #[tokio::test]
    async fn test_focus_with_empty_input_shows_recent() {
        let controller = controller(&["Dresses", "Suits", "Tops"]);
        let snapshot = controller.focus().await;
        assert_eq!(snapshot.state, InputState::RecentOnly);
        assert!(snapshot.is_open);
        assert_eq!(snapshot.recent_searches, vec!["Dresses", "Suits", "Tops"]);
    }

    #[tokio::test]
    async fn test_focus_without_recent_keeps_popover_closed() {
        let controller = controller(&[]);
        let snapshot = controller.focus().await;
        assert_eq!(snapshot.state, InputState::RecentOnly);
        assert!(!snapshot.is_open);
    }

    #[tokio::test]
    async fn test_keystroke_shows_suggestions() {
        let controller = controller(&["red dress", "Suits"]);
        controller.focus().await;
        let snapshot = controller.input("Dress").await;

        assert_eq!(snapshot.state, InputState::Suggesting);
        assert!(snapshot.is_open);
        let suggestions = snapshot.suggestions.unwrap();
        assert_eq!(suggestions.query, "Dress");
        assert_eq!(suggestions.categories[0].name, "Dresses");
        // Matching recent entries are merged in
        assert_eq!(snapshot.recent_searches, vec!["red dress"]);
    }

    #[tokio::test]
    async fn test_recent_matches_can_be_disabled() {
        let settings = ControllerSettings {
            include_recent_matches: false,
            ..settings()
        };
        let controller = controller_with(StubSource::default(), &["red dress"], settings);
        let snapshot = controller.input("dress").await;
        assert!(snapshot.recent_searches.is_empty());
        assert_eq!(snapshot.suggestion_count(), 1);
    }

    #[tokio::test]
    async fn test_short_input_skips_lookup() {
        let settings = ControllerSettings {
            min_query_length: 3,
            ..settings()
        };
        let controller = controller_with(StubSource::default(), &[], settings);
        let snapshot = controller.input("Dr").await;
        assert_eq!(snapshot.state, InputState::Typing);
        assert!(snapshot.suggestions.is_none());
        assert_eq!(controller.fetcher.source().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_superseded_lookup_never_reaches_view() {
        let mut source = StubSource::default();
        source
            .delays
            .insert("Dre".to_string(), Duration::from_millis(150));
        source
            .delays
            .insert("Dress".to_string(), Duration::from_millis(10));
        let controller = controller_with(source, &[], settings());
        controller.focus().await;

        let (first, second) = tokio::join!(controller.input("Dre"), controller.input("Dress"));

        assert_eq!(second.suggestions.unwrap().query, "Dress");
        assert_ne!(
            first.suggestions.as_ref().map(|s| s.query.as_str()),
            Some("Dre")
        );
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.input, "Dress");
        assert_eq!(snapshot.suggestions.unwrap().query, "Dress");
    }

    #[tokio::test]
    async fn test_superseded_when_earlier_answer_is_faster() {
        let mut source = StubSource::default();
        source
            .delays
            .insert("Dre".to_string(), Duration::from_millis(10));
        source
            .delays
            .insert("Dress".to_string(), Duration::from_millis(80));
        let controller = controller_with(source, &[], settings());

        tokio::join!(controller.input("Dre"), controller.input("Dress"));

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state, InputState::Suggesting);
        assert_eq!(snapshot.suggestions.unwrap().query, "Dress");
    }

    #[tokio::test]
    async fn test_debounce_skips_intermediate_keystrokes() {
        let settings = ControllerSettings {
            debounce: Duration::from_millis(50),
            ..settings()
        };
        let controller = controller_with(StubSource::default(), &[], settings);

        let later = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.input("Dress").await
        };
        let (_, last) = tokio::join!(controller.input("Dre"), later);

        assert_eq!(last.suggestions.unwrap().query, "Dress");
        assert_eq!(controller.fetcher.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_recent() {
        let source = StubSource {
            fail: true,
            ..Default::default()
        };
        let controller = controller_with(source, &["Dresses"], settings());
        let snapshot = controller.input("Dress").await;

        assert_eq!(snapshot.state, InputState::Suggesting);
        assert_eq!(snapshot.suggestion_count(), 0);
        assert_eq!(snapshot.recent_searches, vec!["Dresses"]);
        assert!(snapshot.is_open);
    }

    #[tokio::test]
    async fn test_submit_records_and_navigates() {
        let controller = controller(&["Dresses", "Suits", "Tops"]);
        controller.focus().await;
        controller.input("Gloves").await;

        let target = controller.submit().await.unwrap();
        assert_eq!(target.to_url(), "/search?q=Gloves");
        assert_eq!(
            controller.recent_searches().await,
            vec!["Gloves", "Dresses", "Suits", "Tops"]
        );

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state, InputState::Idle);
        assert!(snapshot.input.is_empty());
        let history = controller.with_navigator(|n| n.history().to_vec()).await;
        assert_eq!(history, vec![target]);
    }

    #[tokio::test]
    async fn test_submit_respects_limit() {
        let controller = controller(&["Dresses", "Suits", "Tops", "Gloves", "Bracelets"]);
        controller.input("Ties").await;
        controller.submit().await.unwrap();

        assert_eq!(
            controller.recent_searches().await,
            vec!["Ties", "Dresses", "Suits", "Tops", "Gloves"]
        );
    }

    #[tokio::test]
    async fn test_blank_submit_is_noop() {
        let controller = controller(&["Dresses"]);
        controller.input("   ").await;
        assert!(controller.submit().await.is_none());

        assert_eq!(controller.recent_searches().await, vec!["Dresses"]);
        assert!(controller.with_navigator(|n| n.history().is_empty()).await);
    }

    #[tokio::test]
    async fn test_clearing_input_keeps_recent() {
        let controller = controller(&["Dresses"]);
        controller.input("Dress").await;
        let snapshot = controller.input("").await;

        assert_eq!(snapshot.state, InputState::RecentOnly);
        assert!(snapshot.suggestions.is_none());
        assert_eq!(snapshot.recent_searches, vec!["Dresses"]);
        assert!(controller.with_navigator(|n| n.history().is_empty()).await);
    }

    #[tokio::test]
    async fn test_clear_recent_in_recent_only() {
        let controller = controller(&["Dresses", "Suits"]);
        controller.focus().await;
        let snapshot = controller.clear_recent().await;

        assert_eq!(snapshot.state, InputState::RecentOnly);
        assert!(snapshot.recent_searches.is_empty());
        assert!(controller.recent_searches().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_recent_keeps_remote_suggestions() {
        let controller = controller(&["Dresses"]);
        controller.input("Dress").await;
        let snapshot = controller.clear_recent().await;

        assert_eq!(snapshot.state, InputState::Suggesting);
        assert!(snapshot.recent_searches.is_empty());
        assert_eq!(snapshot.suggestions.unwrap().categories[0].name, "Dresses");
    }

    #[tokio::test]
    async fn test_choose_recent_moves_to_front() {
        let controller = controller(&["Dresses", "Suits", "Tops"]);
        controller.focus().await;
        let target = controller.choose_recent("Tops").await.unwrap();

        assert_eq!(target.param("q"), Some("Tops"));
        assert_eq!(
            controller.recent_searches().await,
            vec!["Tops", "Dresses", "Suits"]
        );
    }

    #[tokio::test]
    async fn test_choose_suggestion_follows_link() {
        let controller = controller(&[]);
        let snapshot = controller.input("Dress").await;
        let suggestion = snapshot.suggestions.unwrap().categories[0].clone();

        let target = controller.choose_suggestion(&suggestion).await;
        assert_eq!(target.to_url(), "/category/dress");
        assert!(controller.recent_searches().await.is_empty());
        assert_eq!(controller.state().await, InputState::Idle);
    }

    #[tokio::test]
    async fn test_blur_keeps_text_and_refocus_restores_suggestions() {
        let controller = controller(&[]);
        controller.input("Dress").await;
        let blurred = controller.blur().await;
        assert_eq!(blurred.state, InputState::Idle);
        assert!(!blurred.is_open);
        assert_eq!(blurred.input, "Dress");

        let refocused = controller.focus().await;
        assert_eq!(refocused.state, InputState::Suggesting);
        assert!(refocused.is_open);
    }

    #[tokio::test]
    async fn test_result_ignored_after_blur() {
        let mut source = StubSource::default();
        source
            .delays
            .insert("Dress".to_string(), Duration::from_millis(50));
        let controller = controller_with(source, &[], settings());

        let blur_soon = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.blur().await
        };
        tokio::join!(controller.input("Dress"), blur_soon);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state, InputState::Idle);
        assert!(snapshot.suggestions.is_none());
    }

    #[tokio::test]
    async fn test_clear_recent_during_lookup_keeps_suggestions() {
        let mut source = StubSource::default();
        source
            .delays
            .insert("Dress".to_string(), Duration::from_millis(60));
        let controller = controller_with(source, &["Dresses"], settings());
        controller.focus().await;

        let clear_soon = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.clear_recent().await
        };
        let (_, cleared) = tokio::join!(controller.input("Dress"), clear_soon);
        assert_eq!(cleared.state, InputState::Typing);
        assert!(cleared.recent_searches.is_empty());

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state, InputState::Suggesting);
        assert_eq!(snapshot.input, "Dress");
        assert_eq!(snapshot.suggestions.unwrap().query, "Dress");
        assert!(snapshot.recent_searches.is_empty());
    }

    #[tokio::test]
    async fn test_short_input_drops_previous_suggestions() {
        let settings = ControllerSettings {
            min_query_length: 3,
            ..settings()
        };
        let controller = controller_with(StubSource::default(), &[], settings);
        controller.input("Dress").await;

        let snapshot = controller.input("Dr").await;
        assert_eq!(snapshot.state, InputState::Typing);
        assert!(snapshot.suggestions.is_none());
        assert!(!snapshot.is_open);

        // Refocusing does not bring the old suggestions back either
        controller.blur().await;
        let refocused = controller.focus().await;
        assert_eq!(refocused.state, InputState::Typing);
        assert!(refocused.suggestions.is_none());
    }

    #[tokio::test]
    async fn test_refocus_after_dropped_lookup_fetches_again() {
        let mut source = StubSource::default();
        source
            .delays
            .insert("Dress".to_string(), Duration::from_millis(40));
        let controller = controller_with(source, &[], settings());

        let blur_soon = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.blur().await
        };
        tokio::join!(controller.input("Dress"), blur_soon);
        assert!(controller.snapshot().await.suggestions.is_none());

        let refocused = controller.focus().await;
        assert_eq!(refocused.state, InputState::Suggesting);
        assert_eq!(refocused.suggestions.unwrap().query, "Dress");
        assert_eq!(controller.fetcher.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_submit_text_supersedes_pending_lookup() {
        let mut source = StubSource::default();
        source
            .delays
            .insert("Dre".to_string(), Duration::from_millis(50));
        let controller = controller_with(source, &[], settings());

        let submit_soon = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.submit_text("Dresses").await
        };
        let (typed, target) = tokio::join!(controller.input("Dre"), submit_soon);

        assert_eq!(target.unwrap().param("q"), Some("Dresses"));
        assert!(typed.suggestions.is_none());
        assert_eq!(controller.recent_searches().await, vec!["Dresses"]);

        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.state, InputState::Idle);
        assert!(snapshot.input.is_empty());
        assert!(snapshot.suggestions.is_none());
    }

    #[tokio::test]
    async fn test_blank_submit_text_is_noop() {
        let controller = controller(&["Dresses"]);
        assert!(controller.submit_text("   ").await.is_none());

        assert_eq!(controller.state().await, InputState::RecentOnly);
        assert_eq!(controller.recent_searches().await, vec!["Dresses"]);
        assert!(controller.with_navigator(|n| n.history().is_empty()).await);
    }

    #[tokio::test]
    async fn test_submit_text_without_suggestion_source() {
        let controller = SearchInputController::new(
            RecentSearches::new(MemorySessionStore::new()),
            SuggestionFetcher::new(NoSuggestions),
            HistoryNavigator::new(),
            SiteContext::default(),
            settings(),
        );

        let target = controller.submit_text(" Gloves ").await.unwrap();
        assert_eq!(target.to_url(), "/search?q=Gloves");
        assert_eq!(controller.recent_searches().await, vec!["Gloves"]);
        let history = controller.with_navigator(|n| n.history().to_vec()).await;
        assert_eq!(history, vec![target]);
    }
}
