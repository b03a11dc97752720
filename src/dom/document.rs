use std::collections::BTreeMap;

// ============================================================================
// Element
// ============================================================================

/// Handle to an element owned by a [`Document`].
///
/// Handles are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// A single element node: tag, attributes, class list and text.
///
/// `class` is kept as an ordered list rather than an attribute so that
/// `classList`-style operations stay cheap and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    /// Create a detached element. Tag names are stored lowercase.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The element's `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

// ============================================================================
// Document
// ============================================================================

/// In-memory element tree standing in for the browser DOM.
///
/// Elements live in an arena and are addressed by [`ElementId`]. Removing
/// children detaches them from the tree; detached elements are unreachable
/// from the root and therefore invisible to every query.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: ElementId,
    body: ElementId,
    title: String,
    location: String,
}

impl Document {
    /// Create an empty document with `<html>` and `<body>`.
    pub fn new(title: &str, location: &str) -> Self {
        let mut doc = Self {
            nodes: vec![Element::new("html")],
            root: ElementId(0),
            body: ElementId(0),
            title: title.to_string(),
            location: location.to_string(),
        };
        doc.body = doc.append_element(doc.root, Element::new("body"));
        doc
    }

    /// Build the page layout every site template shares: header controls,
    /// the live search box and the mobile navigation.
    pub fn site_skeleton(title: &str, location: &str) -> Self {
        let mut doc = Self::new(title, location);
        let body = doc.body();
        let header = doc.append_element(body, Element::new("header"));
        doc.append_element(
            header,
            Element::new("button")
                .with_id("themeToggle")
                .with_attr("type", "button"),
        );
        doc.append_element(
            header,
            Element::new("input")
                .with_id("liveSearchInput")
                .with_attr("type", "search"),
        );
        doc.append_element(
            header,
            Element::new("div")
                .with_id("liveSearchResults")
                .with_class("live-search-results"),
        );
        doc.append_element(
            header,
            Element::new("button")
                .with_id("mobileMenuToggle")
                .with_attr("aria-expanded", "false"),
        );
        let nav = doc.append_element(header, Element::new("nav"));
        doc.append_element(nav, Element::new("ul").with_id("navList"));
        doc.append_element(body, Element::new("main"));
        doc
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The page's current URL.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    /// The `<html>` element.
    pub fn document_element(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this document.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.nodes[id.0]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0]
    }

    // ========================================================================
    // Tree mutation
    // ========================================================================

    /// Insert `element` as the last child of `parent`.
    pub fn append_element(&mut self, parent: ElementId, mut element: Element) -> ElementId {
        let id = ElementId(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        self.element_mut(parent).children.push(id);
        id
    }

    /// Detach every child of `id` (the `innerHTML = ''` operation).
    pub fn clear_children(&mut self, id: ElementId) {
        let children = std::mem::take(&mut self.element_mut(id).children);
        for child in children {
            self.element_mut(child).parent = None;
        }
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        self.element_mut(id)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        self.element_mut(id).attributes.remove(name);
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).attribute(name)
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).has_class(class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let el = self.element_mut(id);
        if !el.has_class(class) {
            el.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.element_mut(id).classes.retain(|c| c != class);
    }

    /// Flip `class` on `id`, returning whether it is now present.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        self.element_mut(id).text = text.to_string();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All elements reachable from `id` (exclusive), in document order.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.element(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.element(next).children.iter().rev().copied());
        }
        out
    }

    /// Every attached element matching `predicate`, in document order.
    pub fn select<F>(&self, predicate: F) -> Vec<ElementId>
    where
        F: Fn(&Element) -> bool,
    {
        let mut all = vec![self.root];
        all.extend(self.descendants(self.root));
        all.into_iter()
            .filter(|id| predicate(self.element(*id)))
            .collect()
    }

    pub fn select_first<F>(&self, predicate: F) -> Option<ElementId>
    where
        F: Fn(&Element) -> bool,
    {
        self.select(predicate).into_iter().next()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.select_first(|el| el.id() == Some(id))
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<ElementId> {
        self.select(|el| el.tag == tag)
    }

    /// Node-inclusive containment: an element contains itself.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.element(id).parent;
        }
        false
    }

    /// Nearest inclusive ancestor of `node` satisfying `predicate`.
    pub fn closest<F>(&self, node: ElementId, predicate: F) -> Option<ElementId>
    where
        F: Fn(ElementId, &Element) -> bool,
    {
        let mut current = Some(node);
        while let Some(id) = current {
            if predicate(id, self.element(id)) {
                return Some(id);
            }
            current = self.element(id).parent;
        }
        None
    }

    /// Whether `id` is the last child of its parent (`:last-child`).
    pub fn is_last_child(&self, id: ElementId) -> bool {
        self.element(id)
            .parent
            .and_then(|p| self.element(p).children.last().copied())
            == Some(id)
    }

    /// Whether `id` is still reachable from the document root.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.contains(self.root, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new("Home", "https://example.com/");
        assert_eq!(doc.element(doc.body()).tag(), "body");
        assert_eq!(doc.element(doc.body()).parent(), Some(doc.document_element()));
    }

    #[test]
    #[should_panic]
    fn test_foreign_id_panics() {
        let skeleton = Document::site_skeleton("Home", "https://example.com/");
        let foreign = skeleton.get_element_by_id("navList").unwrap();
        let bare = Document::new("Bare", "https://example.com/");
        bare.element(foreign);
    }

    #[test]
    fn test_skeleton_has_expected_controls() {
        let doc = Document::site_skeleton("Home", "https://example.com/");
        for id in [
            "themeToggle",
            "liveSearchInput",
            "liveSearchResults",
            "mobileMenuToggle",
            "navList",
        ] {
            assert!(doc.get_element_by_id(id).is_some(), "missing #{id}");
        }
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();
        let a = doc.append_element(body, Element::new("div").with_id("a"));
        let b = doc.append_element(a, Element::new("span").with_id("b"));
        let c = doc.append_element(body, Element::new("p").with_id("c"));

        assert_eq!(doc.descendants(body), vec![a, b, c]);
    }

    #[test]
    fn test_clear_children_detaches_subtree() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();
        let list = doc.append_element(body, Element::new("ul"));
        let item = doc.append_element(list, Element::new("li").with_id("item"));

        doc.clear_children(list);

        assert!(doc.element(list).children().is_empty());
        assert!(!doc.is_attached(item));
        assert_eq!(doc.get_element_by_id("item"), None);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();
        let outer = doc.append_element(body, Element::new("div"));
        let inner = doc.append_element(outer, Element::new("span"));
        let other = doc.append_element(body, Element::new("p"));

        assert!(doc.contains(outer, outer));
        assert!(doc.contains(outer, inner));
        assert!(!doc.contains(outer, other));
        assert!(!doc.contains(inner, outer));
    }

    #[test]
    fn test_toggle_class_reports_state() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();

        assert!(doc.toggle_class(body, "is-open"));
        assert!(doc.has_class(body, "is-open"));
        assert!(!doc.toggle_class(body, "is-open"));
        assert!(!doc.has_class(body, "is-open"));
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();
        doc.add_class(body, "loaded");
        doc.add_class(body, "loaded");
        assert_eq!(doc.element(body).classes(), &["loaded".to_string()]);
    }

    #[test]
    fn test_is_last_child() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();
        let first = doc.append_element(body, Element::new("a"));
        let last = doc.append_element(body, Element::new("a"));

        assert!(!doc.is_last_child(first));
        assert!(doc.is_last_child(last));
        assert!(!doc.is_last_child(doc.document_element()));
    }

    #[test]
    fn test_closest_walks_ancestors() {
        let mut doc = Document::new("t", "https://example.com/");
        let body = doc.body();
        let link = doc.append_element(body, Element::new("a").with_attr("href", "#top"));
        let icon = doc.append_element(link, Element::new("svg"));

        let found = doc.closest(icon, |_, el| el.tag() == "a");
        assert_eq!(found, Some(link));
        assert_eq!(doc.closest(body, |_, el| el.tag() == "a"), None);
    }
}
