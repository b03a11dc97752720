use crate::dom::{Document, ElementId, EventOutcome};
use crate::platform::{Platform, ScrollOptions};

/// Animated scrolling for same-page `#fragment` links.
#[derive(Debug, Clone, Default)]
pub struct SmoothScroll {
    anchors: Vec<ElementId>,
}

impl SmoothScroll {
    /// Capture every `a[href^="#"]` present now.
    pub fn attach(doc: &Document) -> Self {
        let anchors = doc.select(|el| {
            el.tag() == "a" && el.attribute("href").is_some_and(|href| href.starts_with('#'))
        });
        Self { anchors }
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Intercept a click inside one of the captured anchors.
    ///
    /// The jump is always suppressed; scrolling only happens when the
    /// fragment names an element.
    pub fn on_click<P: Platform>(
        &self,
        doc: &Document,
        platform: &P,
        target: ElementId,
    ) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        let Some(anchor) = doc.closest(target, |id, _| self.anchors.contains(&id)) else {
            return outcome;
        };
        outcome.prevent_default();

        let fragment = doc
            .attribute(anchor, "href")
            .and_then(|href| href.strip_prefix('#'))
            .unwrap_or_default();
        if fragment.is_empty() {
            return outcome;
        }
        match doc.get_element_by_id(fragment) {
            Some(destination) => {
                platform.scroll_into_view(destination, ScrollOptions::smooth_to_start());
            }
            None => {
                tracing::trace!(fragment = %fragment, "Anchor target not found");
            }
        }
        outcome
    }
}
