//! A loaded page with every behaviour attached.
//!
//! [`Page::load`] is the equivalent of the document-ready handler: it
//! captures the elements each behaviour needs, applies the stored theme and
//! wires live search to a completion channel. Events are then fed through
//! [`Page::dispatch`]; finished search requests come back through
//! [`Page::next_search_completion`] or [`Page::drain_search_completions`].

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::actions::{self, ActionError, SaveOutcome, ShareOutcome};
use crate::config::{Config, Messages};
use crate::dom::{Document, ElementId, EventOutcome, IntersectionEntry, PageEvent};
use crate::platform::Platform;
use crate::search::{CompletionStatus, LiveSearch, SearchClient, SearchCompletion, SearchSettings};
use crate::storage::KeyValueStore;
use crate::theme::{Theme, ThemeController};
use crate::ui::{FormValidation, InfiniteScroll, LazyImageLoader, MobileMenu, SmoothScroll};

/// Capacity of the search completion channel.
const SEARCH_CHANNEL_CAPACITY: usize = 32;

pub struct Page<S, C, P> {
    document: Document,
    store: S,
    platform: P,
    messages: Messages,
    theme: ThemeController,
    search: Option<LiveSearch<C>>,
    search_rx: mpsc::Receiver<SearchCompletion>,
    lazy_images: Option<LazyImageLoader>,
    menu: Option<MobileMenu>,
    infinite_scroll: Option<InfiniteScroll>,
    smooth_scroll: SmoothScroll,
    forms: FormValidation,
}

impl<S, C, P> Page<S, C, P>
where
    S: KeyValueStore,
    C: SearchClient,
    P: Platform,
{
    /// Attach every behaviour to `document`.
    ///
    /// Behaviours whose elements are missing stay inert; the rest still
    /// attach.
    pub async fn load(mut document: Document, store: S, client: C, platform: P, config: &Config) -> Self {
        let theme = ThemeController::init(&mut document, &store, &config.messages).await;

        let (search_tx, search_rx) = mpsc::channel(SEARCH_CHANNEL_CAPACITY);
        let search = LiveSearch::attach(
            &document,
            Arc::new(client),
            SearchSettings::from_config(config),
            search_tx,
        );
        if search.is_none() {
            tracing::debug!("No live search box on this page");
        }

        let capabilities = platform.capabilities();
        let lazy_images = LazyImageLoader::attach(&document, capabilities);
        let menu = MobileMenu::attach(&document);
        let infinite_scroll = InfiniteScroll::attach(&document, capabilities, config.infinite_scroll);
        let smooth_scroll = SmoothScroll::attach(&document);
        let forms = FormValidation::attach(&document);

        tracing::info!(
            location = %document.location(),
            search = search.is_some(),
            menu = menu.is_some(),
            anchors = smooth_scroll.anchor_count(),
            forms = forms.form_count(),
            "Page loaded"
        );

        Self {
            document,
            store,
            platform,
            messages: config.messages.clone(),
            theme,
            search,
            search_rx,
            lazy_images,
            menu,
            infinite_scroll,
            smooth_scroll,
            forms,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direct document access, for content changes made after load.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn theme(&self) -> Theme {
        ThemeController::current(&self.document)
    }

    pub fn search(&self) -> Option<&LiveSearch<C>> {
        self.search.as_ref()
    }

    pub fn menu(&self) -> Option<&MobileMenu> {
        self.menu.as_ref()
    }

    pub fn lazy_images(&self) -> Option<&LazyImageLoader> {
        self.lazy_images.as_ref()
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Route an event to every behaviour listening for it.
    pub async fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        match event {
            PageEvent::Click { target } => self.on_click(target).await,
            PageEvent::Input { target, value } => {
                self.on_input(target, &value);
                EventOutcome::default()
            }
            PageEvent::Submit { form } => self.forms.on_submit(&mut self.document, form),
            PageEvent::Intersection(entries) => {
                self.on_intersection(&entries);
                EventOutcome::default()
            }
        }
    }

    pub async fn click(&mut self, target: ElementId) -> EventOutcome {
        self.dispatch(PageEvent::Click { target }).await
    }

    pub async fn input(&mut self, target: ElementId, value: &str) -> EventOutcome {
        self.dispatch(PageEvent::Input {
            target,
            value: value.to_string(),
        })
        .await
    }

    pub async fn submit(&mut self, form: ElementId) -> EventOutcome {
        self.dispatch(PageEvent::Submit { form }).await
    }

    pub async fn intersect(&mut self, entries: Vec<IntersectionEntry>) -> EventOutcome {
        self.dispatch(PageEvent::Intersection(entries)).await
    }

    async fn on_click(&mut self, target: ElementId) -> EventOutcome {
        let mut outcome = EventOutcome::default();

        if self.theme.handles_click(&self.document, target) {
            self.theme.toggle(&mut self.document, &self.store).await;
        }
        if let Some(menu) = self.menu.filter(|m| m.handles_click(&self.document, target)) {
            menu.toggle(&mut self.document);
        }
        outcome.merge(self.smooth_scroll.on_click(&self.document, &self.platform, target));

        // Document-level listener, sees every click
        if let Some(search) = &self.search {
            search.on_document_click(&mut self.document, target);
        }
        outcome
    }

    fn on_input(&mut self, target: ElementId, value: &str) {
        self.document.set_attribute(target, "value", value);
        if let Some(search) = self.search.as_mut().filter(|s| s.input() == target) {
            search.on_input(&mut self.document, value);
        }
    }

    fn on_intersection(&mut self, entries: &[IntersectionEntry]) {
        if let Some(loader) = &mut self.lazy_images {
            let loaded = loader.on_intersection(&mut self.document, entries);
            if loaded > 0 {
                tracing::debug!(loaded, remaining = loader.pending(), "Lazy images loaded");
            }
        }
        if let Some(scroll) = &self.infinite_scroll {
            scroll.on_intersection(&self.document, &self.platform, entries);
        }
    }

    // ========================================================================
    // Search completions
    // ========================================================================

    /// Wait for the next finished search request and render it.
    ///
    /// Returns `None` when the page has no live search. Waits indefinitely
    /// if no request is pending or in flight.
    pub async fn next_search_completion(&mut self) -> Option<CompletionStatus> {
        let search = self.search.as_mut()?;
        let completion = self.search_rx.recv().await?;
        Some(search.apply(&mut self.document, completion))
    }

    /// Render every search request that has already finished.
    pub fn drain_search_completions(&mut self) -> Vec<CompletionStatus> {
        let mut statuses = Vec::new();
        let Some(search) = self.search.as_mut() else {
            return statuses;
        };
        while let Ok(completion) = self.search_rx.try_recv() {
            statuses.push(search.apply(&mut self.document, completion));
        }
        statuses
    }

    // ========================================================================
    // Article actions
    // ========================================================================

    pub fn share_article(&self) -> ShareOutcome {
        actions::share_article(&self.document, &self.platform, &self.messages)
    }

    pub async fn save_article(&self) -> Result<SaveOutcome, ActionError> {
        actions::save_article(&self.document, &self.store, &self.platform, &self.messages).await
    }

    pub async fn saved_articles(&self) -> Result<Vec<String>, ActionError> {
        actions::saved_articles(&self.store).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::platform::{Capabilities, HeadlessPlatform, PlatformEffect};
    use crate::search::{SearchError, SearchResult, ACTIVE_CLASS, SEARCH_INPUT_ID};
    use crate::storage::MemoryStore;
    use crate::theme::{THEME_STORAGE_KEY, THEME_TOGGLE_ID};
    use crate::ui::{DEFERRED_SRC_ATTRIBUTE, MENU_TOGGLE_ID, OPEN_CLASS, VALIDATED_CLASS};
    use std::time::Duration;

    struct EchoClient;

    impl SearchClient for EchoClient {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            Ok(vec![SearchResult {
                url: format!("/articles/{query}/"),
                title: query.to_string(),
                short_description: String::new(),
                category: None,
            }])
        }
    }

    type TestPage = Page<MemoryStore, EchoClient, HeadlessPlatform>;

    async fn load(doc: Document, store: MemoryStore) -> TestPage {
        Page::load(
            doc,
            store,
            EchoClient,
            HeadlessPlatform::new(Capabilities::default()),
            &Config::default(),
        )
        .await
    }

    fn skeleton() -> Document {
        Document::site_skeleton("Home", "https://example.com/")
    }

    #[tokio::test]
    async fn test_theme_toggle_click_persists() {
        let mut page = load(skeleton(), MemoryStore::new()).await;
        let toggle = page.document().get_element_by_id(THEME_TOGGLE_ID).unwrap();

        page.click(toggle).await;

        assert_eq!(page.theme(), Theme::Dark);
        assert_eq!(
            page.store().get_item(THEME_STORAGE_KEY).await.unwrap().as_deref(),
            Some("dark")
        );
    }

    #[tokio::test]
    async fn test_menu_click_opens_and_hides_search_panel() {
        let mut page = load(skeleton(), MemoryStore::new()).await;
        let panel = page.search().unwrap().results_panel();
        page.document_mut().add_class(panel, ACTIVE_CLASS);
        let button = page.document().get_element_by_id(MENU_TOGGLE_ID).unwrap();

        page.click(button).await;

        assert!(page.menu().unwrap().is_open(page.document()));
        assert!(page.document().has_class(button, OPEN_CLASS));
        // The menu button is outside the search box
        assert!(!page.document().has_class(panel, ACTIVE_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_input_renders_completion() {
        let mut page = load(skeleton(), MemoryStore::new()).await;
        let input = page.document().get_element_by_id(SEARCH_INPUT_ID).unwrap();

        page.input(input, "jazz").await;
        assert_eq!(page.document().attribute(input, "value"), Some("jazz"));

        let status = page.next_search_completion().await;
        assert_eq!(status, Some(CompletionStatus::Rendered(1)));
        let panel = page.search().unwrap().results_panel();
        assert!(page.document().has_class(panel, ACTIVE_CLASS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_applies_finished_requests_only() {
        let mut page = load(skeleton(), MemoryStore::new()).await;
        let input = page.document().get_element_by_id(SEARCH_INPUT_ID).unwrap();

        page.input(input, "jazz").await;
        assert!(page.drain_search_completions().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(
            page.drain_search_completions(),
            vec![CompletionStatus::Rendered(1)]
        );
    }

    #[tokio::test]
    async fn test_input_on_other_field_does_not_search() {
        let mut doc = skeleton();
        let body = doc.body();
        let other = doc.append_element(body, Element::new("input"));
        let mut page = load(doc, MemoryStore::new()).await;

        page.input(other, "jazz").await;

        assert!(!page.search().unwrap().is_pending());
        assert_eq!(page.document().attribute(other, "value"), Some("jazz"));
    }

    #[tokio::test]
    async fn test_page_without_search_has_no_completions() {
        let mut page = load(Document::new("Bare", "https://example.com/"), MemoryStore::new()).await;
        assert!(page.search().is_none());
        assert_eq!(page.next_search_completion().await, None);
        assert!(page.drain_search_completions().is_empty());
    }

    #[tokio::test]
    async fn test_submit_blocked_until_valid() {
        let mut doc = skeleton();
        let body = doc.body();
        let form = doc.append_element(body, Element::new("form"));
        let field = doc.append_element(form, Element::new("input").with_attr("required", ""));
        let mut page = load(doc, MemoryStore::new()).await;

        assert!(page.submit(form).await.default_prevented);
        assert!(page.document().has_class(form, VALIDATED_CLASS));

        page.input(field, "hello").await;
        assert!(!page.submit(form).await.default_prevented);
    }

    #[tokio::test]
    async fn test_intersection_loads_images() {
        let mut doc = skeleton();
        let body = doc.body();
        let img = doc.append_element(
            body,
            Element::new("img").with_attr(DEFERRED_SRC_ATTRIBUTE, "/media/a.jpg"),
        );
        let mut page = load(doc, MemoryStore::new()).await;

        page.intersect(vec![IntersectionEntry::new(img, 0.5)]).await;

        assert_eq!(page.document().attribute(img, "src"), Some("/media/a.jpg"));
        assert_eq!(page.lazy_images().unwrap().pending(), 0);
    }

    #[tokio::test]
    async fn test_anchor_click_scrolls() {
        let mut doc = skeleton();
        let body = doc.body();
        let link = doc.append_element(body, Element::new("a").with_attr("href", "#top"));
        let top = doc.append_element(body, Element::new("div").with_id("top"));
        let mut page = load(doc, MemoryStore::new()).await;

        let outcome = page.click(link).await;

        assert!(outcome.default_prevented);
        assert!(matches!(
            page.platform().effects().as_slice(),
            [PlatformEffect::ScrolledIntoView { target, .. }] if *target == top
        ));
    }

    #[tokio::test]
    async fn test_save_and_share_use_location() {
        let page = load(
            Document::new("Blue Train", "https://example.com/a/"),
            MemoryStore::new(),
        )
        .await;

        assert_eq!(page.save_article().await.unwrap(), SaveOutcome::Saved);
        assert_eq!(
            page.saved_articles().await.unwrap(),
            vec!["https://example.com/a/".to_string()]
        );
        assert_eq!(page.share_article(), ShareOutcome::CopiedToClipboard);
    }
}
