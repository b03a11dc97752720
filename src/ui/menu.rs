use crate::dom::{Document, ElementId};

pub const MENU_TOGGLE_ID: &str = "mobileMenuToggle";
pub const NAV_LIST_ID: &str = "navList";
pub const OPEN_CLASS: &str = "is-open";

/// Hamburger button that opens and closes the navigation on small screens.
#[derive(Debug, Clone, Copy)]
pub struct MobileMenu {
    toggle: ElementId,
    nav: ElementId,
}

impl MobileMenu {
    /// `None` unless both the button and the nav list exist.
    pub fn attach(doc: &Document) -> Option<Self> {
        Some(Self {
            toggle: doc.get_element_by_id(MENU_TOGGLE_ID)?,
            nav: doc.get_element_by_id(NAV_LIST_ID)?,
        })
    }

    pub fn handles_click(&self, doc: &Document, target: ElementId) -> bool {
        doc.contains(self.toggle, target)
    }

    /// Flip the open state. Returns whether the menu is now open.
    pub fn toggle(&self, doc: &mut Document) -> bool {
        let open = doc.toggle_class(self.nav, OPEN_CLASS);
        doc.toggle_class(self.toggle, OPEN_CLASS);
        doc.set_attribute(self.toggle, "aria-expanded", if open { "true" } else { "false" });
        tracing::trace!(open, "Mobile menu toggled");
        open
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        doc.has_class(self.nav, OPEN_CLASS)
    }
}
