//! Theme persistence and the header theme toggle.
//!
//! The active theme lives in the `data-theme` attribute of the document
//! element. The store only remembers it between page loads: toggling reads
//! the attribute, so a store that disagrees with the page cannot make the
//! toggle skip a state.

use crate::config::Messages;
use crate::dom::{Document, ElementId};
use crate::storage::KeyValueStore;

/// Storage key holding `"light"` or `"dark"`.
pub const THEME_STORAGE_KEY: &str = "theme";
/// Document-element attribute stylesheets key off.
pub const THEME_ATTRIBUTE: &str = "data-theme";
pub const THEME_TOGGLE_ID: &str = "themeToggle";

// ============================================================================
// Theme
// ============================================================================

/// Available themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse a theme name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The other theme: Light → Dark → Light.
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Value written to storage and to `data-theme`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

// ============================================================================
// ThemeController
// ============================================================================

/// Applies the stored theme on load and flips it on toggle activation.
#[derive(Debug, Clone)]
pub struct ThemeController {
    toggle: Option<ElementId>,
    switch_to_dark: String,
    switch_to_light: String,
}

impl ThemeController {
    /// Resolve the stored theme, apply it and label the toggle.
    ///
    /// The theme is applied even when the page has no toggle control.
    pub async fn init<S: KeyValueStore>(doc: &mut Document, store: &S, messages: &Messages) -> Self {
        let controller = Self {
            toggle: doc.get_element_by_id(THEME_TOGGLE_ID),
            switch_to_dark: messages.switch_to_dark.clone(),
            switch_to_light: messages.switch_to_light.clone(),
        };

        let theme = match store.get_item(THEME_STORAGE_KEY).await {
            Ok(Some(value)) => Theme::from_str_name(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unrecognised stored theme, using light");
                Theme::Light
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored theme, using light");
                Theme::default()
            }
        };

        controller.apply(doc, theme);
        tracing::debug!(theme = theme.as_str(), "Theme initialised");
        controller
    }

    /// The theme currently applied to the document.
    pub fn current(doc: &Document) -> Theme {
        match doc.attribute(doc.document_element(), THEME_ATTRIBUTE) {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Whether a click on `target` activates the toggle.
    pub fn handles_click(&self, doc: &Document, target: ElementId) -> bool {
        self.toggle.is_some_and(|toggle| doc.contains(toggle, target))
    }

    /// Switch to the opposite of the applied theme and persist it.
    ///
    /// A failed write is logged; the page still switches.
    pub async fn toggle<S: KeyValueStore>(&self, doc: &mut Document, store: &S) -> Theme {
        let theme = Self::current(doc).next();
        self.apply(doc, theme);

        if let Err(e) = store.set_item(THEME_STORAGE_KEY, theme.as_str()).await {
            tracing::warn!(error = %e, theme = theme.as_str(), "Failed to persist theme");
        }
        tracing::debug!(theme = theme.as_str(), "Theme toggled");
        theme
    }

    /// Label describing what activating the toggle will do.
    pub fn label_for(&self, active: Theme) -> &str {
        match active {
            Theme::Light => &self.switch_to_dark,
            Theme::Dark => &self.switch_to_light,
        }
    }

    fn apply(&self, doc: &mut Document, theme: Theme) {
        let root = doc.document_element();
        doc.set_attribute(root, THEME_ATTRIBUTE, theme.as_str());
        if let Some(toggle) = self.toggle {
            let label = self.label_for(theme).to_string();
            doc.set_attribute(toggle, "aria-label", &label);
        }
    }
}
