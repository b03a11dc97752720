use crate::dom::{Document, Element, ElementId};

use super::client::SearchResult;

/// Class on every entry in the results panel, including the empty state.
pub const RESULT_CLASS: &str = "live-search-result";
pub const DESCRIPTION_CLASS: &str = "live-search-description";
pub const CATEGORY_CLASS: &str = "live-search-category";

/// Replace the contents of `container` with `results`.
///
/// No results renders a single empty-state entry carrying `no_results`.
/// Result text is set as text content, never parsed as markup.
pub fn render_results(
    doc: &mut Document,
    container: ElementId,
    results: &[SearchResult],
    no_results: &str,
) {
    doc.clear_children(container);

    if results.is_empty() {
        doc.append_element(
            container,
            Element::new("div")
                .with_class(RESULT_CLASS)
                .with_text(no_results),
        );
        return;
    }

    for result in results {
        let entry = doc.append_element(
            container,
            Element::new("a")
                .with_class(RESULT_CLASS)
                .with_attr("href", &result.url),
        );
        doc.append_element(entry, Element::new("strong").with_text(&result.title));
        doc.append_element(
            entry,
            Element::new("div")
                .with_class(DESCRIPTION_CLASS)
                .with_text(&result.short_description),
        );
        if let Some(category) = result.category_tag() {
            doc.append_element(
                entry,
                Element::new("span")
                    .with_class(CATEGORY_CLASS)
                    .with_text(category),
            );
        }
    }
}
