use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::dom::{Document, ElementId};

use super::client::{SearchClient, SearchError, SearchResult};
use super::debounce::Debouncer;
use super::render::render_results;

pub const SEARCH_INPUT_ID: &str = "liveSearchInput";
pub const SEARCH_RESULTS_ID: &str = "liveSearchResults";
/// Class that makes the results panel visible.
pub const ACTIVE_CLASS: &str = "active";

/// Tuning for [`LiveSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_chars: usize,
    /// Ignore a response once the reader has typed again since its request.
    pub discard_stale: bool,
    pub no_results: String,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: config.search_debounce(),
            min_chars: config.search_min_chars,
            discard_stale: config.discard_stale_search_results,
            no_results: config.messages.no_results.clone(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A finished request, reported back to the page.
#[derive(Debug)]
pub struct SearchCompletion {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<SearchResult>, SearchError>,
}

/// What applying a [`SearchCompletion`] did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// The panel now shows this many results (0 = empty state).
    Rendered(usize),
    /// The request failed; the panel is unchanged.
    Failed,
    /// Superseded by newer input; the panel is unchanged.
    Stale,
}

/// Debounced live search bound to the header search box.
///
/// Requests run on background tasks and report through the `completions`
/// channel; the page feeds them back through [`LiveSearch::apply`].
pub struct LiveSearch<C> {
    input: ElementId,
    results: ElementId,
    client: Arc<C>,
    settings: SearchSettings,
    debouncer: Debouncer,
    generation: u64,
    completions: mpsc::Sender<SearchCompletion>,
}

impl<C: SearchClient> LiveSearch<C> {
    /// Bind to the page's search box. `None` when the input or the results
    /// panel is missing.
    pub fn attach(
        doc: &Document,
        client: Arc<C>,
        settings: SearchSettings,
        completions: mpsc::Sender<SearchCompletion>,
    ) -> Option<Self> {
        let input = doc.get_element_by_id(SEARCH_INPUT_ID)?;
        let results = doc.get_element_by_id(SEARCH_RESULTS_ID)?;
        Some(Self {
            input,
            results,
            client,
            debouncer: Debouncer::new(settings.debounce),
            settings,
            generation: 0,
            completions,
        })
    }

    pub fn input(&self) -> ElementId {
        self.input
    }

    pub fn results_panel(&self) -> ElementId {
        self.results
    }

    /// Generation of the most recent search request or clear.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a request is waiting out the debounce period.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// React to the search box now holding `value`.
    pub fn on_input(&mut self, doc: &mut Document, value: &str) {
        let query = value.trim();
        self.debouncer.cancel();

        if query.chars().count() < self.settings.min_chars {
            doc.remove_class(self.results, ACTIVE_CLASS);
            doc.clear_children(self.results);
            if self.settings.discard_stale {
                self.generation = self.generation.wrapping_add(1);
            }
            return;
        }

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let client = Arc::clone(&self.client);
        let tx = self.completions.clone();
        let query = query.to_string();

        tracing::debug!(query = %query, generation, "Scheduling live search");

        self.debouncer.schedule(async move {
            tracing::debug!(query = %query, generation, "Sending live search request");
            let result = client.search(&query).await;
            let completion = SearchCompletion {
                generation,
                query,
                result,
            };
            if let Err(e) = tx.send(completion).await {
                tracing::warn!(error = %e, "Failed to deliver search results (page dropped)");
            }
        });
    }

    /// Hide the panel when a click lands outside the box and the panel.
    /// The rendered results are kept.
    pub fn on_document_click(&self, doc: &mut Document, target: ElementId) {
        if !doc.contains(self.input, target) && !doc.contains(self.results, target) {
            doc.remove_class(self.results, ACTIVE_CLASS);
        }
    }

    /// Render a finished request.
    pub fn apply(&mut self, doc: &mut Document, completion: SearchCompletion) -> CompletionStatus {
        let SearchCompletion {
            generation,
            query,
            result,
        } = completion;

        if self.settings.discard_stale && generation != self.generation {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                query = %query,
                "Ignoring stale search result (generation mismatch)"
            );
            return CompletionStatus::Stale;
        }

        match result {
            Ok(results) => {
                render_results(doc, self.results, &results, &self.settings.no_results);
                doc.add_class(self.results, ACTIVE_CLASS);
                tracing::debug!(query = %query, count = results.len(), "Search completed");
                CompletionStatus::Rendered(results.len())
            }
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Search error");
                CompletionStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Client answering from a canned table, with per-query latency.
    #[derive(Default)]
    struct MockClient {
        calls: Mutex<Vec<String>>,
        latency: HashMap<String, Duration>,
        failing: bool,
    }

    impl MockClient {
        fn with_latency(pairs: &[(&str, u64)]) -> Self {
            Self {
                latency: pairs
                    .iter()
                    .map(|(q, ms)| (q.to_string(), Duration::from_millis(*ms)))
                    .collect(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SearchClient for MockClient {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.latency.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.failing {
                return Err(SearchError::HttpStatus(502));
            }
            Ok(vec![SearchResult {
                url: format!("/articles/{query}/"),
                title: query.to_string(),
                short_description: String::new(),
                category: None,
            }])
        }
    }

    struct Harness {
        doc: Document,
        search: LiveSearch<MockClient>,
        client: Arc<MockClient>,
        rx: mpsc::Receiver<SearchCompletion>,
    }

    fn harness(client: MockClient, settings: SearchSettings) -> Harness {
        let doc = Document::site_skeleton("Home", "https://example.com/");
        let client = Arc::new(client);
        let (tx, rx) = mpsc::channel(8);
        let search = LiveSearch::attach(&doc, Arc::clone(&client), settings, tx).unwrap();
        Harness {
            doc,
            search,
            client,
            rx,
        }
    }

    fn panel_titles(h: &Harness) -> Vec<String> {
        h.doc
            .descendants(h.search.results_panel())
            .into_iter()
            .filter(|id| h.doc.element(*id).tag() == "strong")
            .map(|id| h.doc.element(id).text().to_string())
            .collect()
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_attach_requires_both_elements() {
        let doc = Document::new("Bare", "https://example.com/");
        let (tx, _rx) = mpsc::channel(1);
        let search = LiveSearch::attach(
            &doc,
            Arc::new(MockClient::default()),
            SearchSettings::default(),
            tx,
        );
        assert!(search.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_keystrokes_collapse_to_one_request() {
        let mut h = harness(MockClient::default(), SearchSettings::default());

        for value in ["ro", "roc", "rock"] {
            h.search.on_input(&mut h.doc, value);
            tokio::time::advance(Duration::from_millis(100)).await;
            settle().await;
        }
        assert!(h.client.calls().is_empty());

        let completion = h.rx.recv().await.unwrap();
        assert_eq!(completion.query, "rock");
        assert_eq!(h.client.calls(), vec!["rock".to_string()]);

        assert_eq!(h.search.apply(&mut h.doc, completion), CompletionStatus::Rendered(1));
        assert!(h.doc.has_class(h.search.results_panel(), ACTIVE_CLASS));

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(h.client.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_is_trimmed() {
        let mut h = harness(MockClient::default(), SearchSettings::default());
        h.search.on_input(&mut h.doc, "  jazz  ");
        let completion = h.rx.recv().await.unwrap();
        assert_eq!(completion.query, "jazz");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_clears_and_cancels() {
        let mut h = harness(MockClient::default(), SearchSettings::default());

        h.search.on_input(&mut h.doc, "jazz");
        let completion = h.rx.recv().await.unwrap();
        h.search.apply(&mut h.doc, completion);
        assert_eq!(panel_titles(&h), vec!["jazz".to_string()]);

        h.search.on_input(&mut h.doc, "blues");
        assert!(h.search.is_pending());
        h.search.on_input(&mut h.doc, " b ");

        assert!(!h.search.is_pending());
        assert!(h.doc.element(h.search.results_panel()).children().is_empty());
        assert!(!h.doc.has_class(h.search.results_panel(), ACTIVE_CLASS));

        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(h.client.calls(), vec!["jazz".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_chars_counts_characters() {
        let mut h = harness(MockClient::default(), SearchSettings::default());
        // One Cyrillic letter is two bytes but a single character.
        h.search.on_input(&mut h.doc, "ж");
        assert!(!h.search.is_pending());

        h.search.on_input(&mut h.doc, "ук");
        assert!(h.search.is_pending());
        let completion = h.rx.recv().await.unwrap();
        assert_eq!(completion.query, "ук");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_results() {
        let mut h = harness(MockClient::default(), SearchSettings::default());
        h.search.on_input(&mut h.doc, "jazz");
        let completion = h.rx.recv().await.unwrap();
        h.search.apply(&mut h.doc, completion);

        let failed = SearchCompletion {
            generation: h.search.generation(),
            query: "jazz".to_string(),
            result: Err(SearchError::HttpStatus(500)),
        };
        assert_eq!(h.search.apply(&mut h.doc, failed), CompletionStatus::Failed);
        assert_eq!(panel_titles(&h), vec!["jazz".to_string()]);
        assert!(h.doc.has_class(h.search.results_panel(), ACTIVE_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_client_reports_failed() {
        let client = MockClient {
            failing: true,
            ..MockClient::default()
        };
        let mut h = harness(client, SearchSettings::default());
        h.search.on_input(&mut h.doc, "jazz");
        let completion = h.rx.recv().await.unwrap();
        assert_eq!(h.search.apply(&mut h.doc, completion), CompletionStatus::Failed);
        assert!(h.doc.element(h.search.results_panel()).children().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_click_hides_without_clearing() {
        let mut h = harness(MockClient::default(), SearchSettings::default());
        h.search.on_input(&mut h.doc, "jazz");
        let completion = h.rx.recv().await.unwrap();
        h.search.apply(&mut h.doc, completion);

        let panel = h.search.results_panel();
        let entry = h.doc.element(panel).children()[0];
        h.search.on_document_click(&mut h.doc, entry);
        assert!(h.doc.has_class(panel, ACTIVE_CLASS));

        let input = h.search.input();
        h.search.on_document_click(&mut h.doc, input);
        assert!(h.doc.has_class(panel, ACTIVE_CLASS));

        let body = h.doc.body();
        let elsewhere = h.doc.append_element(body, Element::new("p"));
        h.search.on_document_click(&mut h.doc, elsewhere);
        assert!(!h.doc.has_class(panel, ACTIVE_CLASS));
        assert_eq!(panel_titles(&h), vec!["jazz".to_string()]);
    }

    /// "slow" is sent first and answers last.
    async fn race(h: &mut Harness) -> Vec<CompletionStatus> {
        h.search.on_input(&mut h.doc, "slow");
        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        h.search.on_input(&mut h.doc, "fast");

        let mut statuses = Vec::new();
        for _ in 0..2 {
            let completion = h.rx.recv().await.unwrap();
            statuses.push(h.search.apply(&mut h.doc, completion));
        }
        statuses
    }

    fn discarding() -> SearchSettings {
        SearchSettings {
            discard_stale: true,
            ..SearchSettings::default()
        }
    }

    #[test]
    fn test_stale_results_rendered_by_default() {
        assert!(!SearchSettings::default().discard_stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        let client = MockClient::with_latency(&[("slow", 500), ("fast", 10)]);
        let mut h = harness(client, discarding());

        let statuses = race(&mut h).await;

        assert_eq!(
            statuses,
            vec![CompletionStatus::Rendered(1), CompletionStatus::Stale]
        );
        assert_eq!(panel_titles(&h), vec!["fast".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_rendered_when_policy_off() {
        let client = MockClient::with_latency(&[("slow", 500), ("fast", 10)]);
        let settings = SearchSettings {
            discard_stale: false,
            ..SearchSettings::default()
        };
        let mut h = harness(client, settings);

        let statuses = race(&mut h).await;

        // Last response wins, even though it answers an older query.
        assert_eq!(
            statuses,
            vec![CompletionStatus::Rendered(1), CompletionStatus::Rendered(1)]
        );
        assert_eq!(panel_titles(&h), vec!["slow".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_invalidates_in_flight_response() {
        let client = MockClient::with_latency(&[("slow", 500)]);
        let mut h = harness(client, discarding());

        h.search.on_input(&mut h.doc, "slow");
        tokio::time::advance(Duration::from_millis(400)).await;
        settle().await;
        h.search.on_input(&mut h.doc, "");

        let completion = h.rx.recv().await.unwrap();
        assert_eq!(h.search.apply(&mut h.doc, completion), CompletionStatus::Stale);
        assert!(h.doc.element(h.search.results_panel()).children().is_empty());
    }
}
