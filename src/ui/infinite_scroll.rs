use crate::dom::{Document, ElementId, IntersectionEntry};
use crate::platform::{Capabilities, Platform};

use super::observer::IntersectionObserver;

pub const PAGINATION_CLASS: &str = "pagination";
pub const PAGINATION_LINK_CLASS: &str = "pagination-link";

/// Jumps to the next listing page once the pagination block is visible.
///
/// This is a full page navigation, not an incremental fetch. Off unless
/// the `infinite_scroll` setting enables it.
#[derive(Debug, Clone)]
pub struct InfiniteScroll {
    observer: IntersectionObserver,
    next_link: ElementId,
}

impl InfiniteScroll {
    pub fn attach(doc: &Document, capabilities: Capabilities, enabled: bool) -> Option<Self> {
        if !enabled || !capabilities.intersection_observer {
            return None;
        }
        let pagination = doc.select_first(|el| el.has_class(PAGINATION_CLASS))?;
        let next_link = doc.descendants(pagination).into_iter().find(|id| {
            doc.has_class(*id, PAGINATION_LINK_CLASS) && doc.is_last_child(*id)
        })?;

        let mut observer = IntersectionObserver::new();
        observer.observe(pagination);
        tracing::debug!("Infinite scroll attached");
        Some(Self {
            observer,
            next_link,
        })
    }

    /// Navigate when the pagination block intersects. Returns the URL
    /// navigated to, if any.
    pub fn on_intersection<P: Platform>(
        &self,
        doc: &Document,
        platform: &P,
        entries: &[IntersectionEntry],
    ) -> Option<String> {
        if self.observer.intersecting(entries).is_empty() {
            return None;
        }
        let href = doc.attribute(self.next_link, "href")?.to_string();
        tracing::debug!(href = %href, "Pagination visible, loading next page");
        platform.navigate(&href);
        Some(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::platform::{HeadlessPlatform, PlatformEffect};

    fn listing() -> (Document, ElementId) {
        let mut doc = Document::new("Articles", "https://example.com/articles/");
        let body = doc.body();
        let pagination = doc.append_element(body, Element::new("nav").with_class(PAGINATION_CLASS));
        doc.append_element(
            pagination,
            Element::new("a")
                .with_class(PAGINATION_LINK_CLASS)
                .with_attr("href", "?page=1"),
        );
        doc.append_element(
            pagination,
            Element::new("a")
                .with_class(PAGINATION_LINK_CLASS)
                .with_attr("href", "?page=3"),
        );
        (doc, pagination)
    }

    #[test]
    fn test_disabled_by_default_flag() {
        let (doc, _) = listing();
        assert!(InfiniteScroll::attach(&doc, Capabilities::default(), false).is_none());
    }

    #[test]
    fn test_requires_intersection_support() {
        let (doc, _) = listing();
        assert!(InfiniteScroll::attach(&doc, Capabilities::minimal(), true).is_none());
    }

    #[test]
    fn test_navigates_to_last_link() {
        let (doc, pagination) = listing();
        let platform = HeadlessPlatform::new(Capabilities::default());
        let scroll = InfiniteScroll::attach(&doc, Capabilities::default(), true).unwrap();

        let href = scroll.on_intersection(&doc, &platform, &[IntersectionEntry::new(pagination, 0.2)]);

        assert_eq!(href.as_deref(), Some("?page=3"));
        assert_eq!(
            platform.effects(),
            vec![PlatformEffect::Navigated("?page=3".to_string())]
        );
    }

    #[test]
    fn test_ignores_other_targets() {
        let (mut doc, _) = listing();
        let body = doc.body();
        let other = doc.append_element(body, Element::new("footer"));
        let platform = HeadlessPlatform::new(Capabilities::default());
        let scroll = InfiniteScroll::attach(&doc, Capabilities::default(), true).unwrap();

        assert_eq!(
            scroll.on_intersection(&doc, &platform, &[IntersectionEntry::new(other, 1.0)]),
            None
        );
        assert!(platform.effects().is_empty());
    }

    #[test]
    fn test_no_pagination_block() {
        let doc = Document::new("Article", "https://example.com/a/");
        assert!(InfiniteScroll::attach(&doc, Capabilities::default(), true).is_none());
    }
}
