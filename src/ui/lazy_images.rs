use crate::dom::{Document, IntersectionEntry};
use crate::platform::Capabilities;

use super::observer::IntersectionObserver;

/// Attribute holding the image URL until the image nears the viewport.
pub const DEFERRED_SRC_ATTRIBUTE: &str = "data-src";
pub const LOADED_CLASS: &str = "loaded";

/// Swaps `data-src` into `src` the first time each image intersects.
///
/// Only images present at attach time are watched.
#[derive(Debug, Clone)]
pub struct LazyImageLoader {
    observer: IntersectionObserver,
}

impl LazyImageLoader {
    /// `None` when the platform cannot observe intersections; deferred
    /// images then never load.
    pub fn attach(doc: &Document, capabilities: Capabilities) -> Option<Self> {
        if !capabilities.intersection_observer {
            tracing::debug!("Intersection observation unsupported, lazy images disabled");
            return None;
        }
        let mut observer = IntersectionObserver::new();
        for image in doc.select(|el| el.tag() == "img" && el.has_attribute(DEFERRED_SRC_ATTRIBUTE)) {
            observer.observe(image);
        }
        tracing::debug!(images = observer.len(), "Lazy image loader attached");
        Some(Self { observer })
    }

    /// Number of images still waiting to load.
    pub fn pending(&self) -> usize {
        self.observer.len()
    }

    /// Load every observed image in `entries`. Returns how many loaded.
    pub fn on_intersection(&mut self, doc: &mut Document, entries: &[IntersectionEntry]) -> usize {
        let mut loaded = 0;
        for image in self.observer.intersecting(entries) {
            let Some(src) = doc.attribute(image, DEFERRED_SRC_ATTRIBUTE).map(str::to_string) else {
                continue;
            };
            doc.set_attribute(image, "src", &src);
            doc.remove_attribute(image, DEFERRED_SRC_ATTRIBUTE);
            doc.add_class(image, LOADED_CLASS);
            self.observer.unobserve(image);
            loaded += 1;
        }
        loaded
    }
}
