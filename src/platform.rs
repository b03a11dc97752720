//! Host capabilities and side effects outside the document.
//!
//! Behaviours never inspect the environment themselves: feature detection
//! goes through [`Platform::capabilities`], and every effect that a browser
//! would perform (sharing, clipboard, dialogs, navigation, scrolling) is a
//! call on the injected [`Platform`].

use std::sync::Mutex;

use thiserror::Error;

use crate::clipboard::ClipboardProvider;
use crate::dom::ElementId;

/// Optional host features, detected once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Viewport intersection observation.
    pub intersection_observer: bool,
    /// A native share sheet.
    pub native_share: bool,
}

impl Capabilities {
    /// Everything a current mobile browser offers.
    pub fn full() -> Self {
        Self {
            intersection_observer: true,
            native_share: true,
        }
    }

    /// A bare environment with no optional features.
    pub fn minimal() -> Self {
        Self {
            intersection_observer: false,
            native_share: false,
        }
    }
}

impl Default for Capabilities {
    /// Desktop browsers: intersection observation, no share sheet.
    fn default() -> Self {
        Self {
            intersection_observer: true,
            native_share: false,
        }
    }
}

/// Payload handed to the native share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    pub fn smooth_to_start() -> Self {
        Self {
            behavior: ScrollBehavior::Smooth,
            block: ScrollBlock::Start,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// The reader dismissed the share sheet.
    #[error("Share was cancelled")]
    ShareCancelled,

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}

/// The environment a page runs in.
pub trait Platform {
    fn capabilities(&self) -> Capabilities;

    /// Open the native share sheet.
    fn share(&self, data: &ShareData) -> Result<(), PlatformError>;

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError>;

    /// Show a blocking confirmation dialog.
    fn alert(&self, message: &str);

    /// Replace the current page with `url`.
    fn navigate(&self, url: &str);

    fn scroll_into_view(&self, target: ElementId, options: ScrollOptions);
}

impl<P: Platform + ?Sized> Platform for &P {
    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn share(&self, data: &ShareData) -> Result<(), PlatformError> {
        (**self).share(data)
    }

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        (**self).write_clipboard(text)
    }

    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }

    fn scroll_into_view(&self, target: ElementId, options: ScrollOptions) {
        (**self).scroll_into_view(target, options)
    }
}

// ============================================================================
// HeadlessPlatform
// ============================================================================

/// A side effect recorded by [`HeadlessPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEffect {
    Shared(ShareData),
    ClipboardWrite(String),
    Alert(String),
    Navigated(String),
    ScrolledIntoView {
        target: ElementId,
        options: ScrollOptions,
    },
}

/// Platform that records effects instead of performing them.
///
/// Used by tests and wrapped by [`TerminalPlatform`]; capabilities are
/// fixed at construction.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    capabilities: Capabilities,
    share_error: Option<PlatformError>,
    clipboard_error: Option<PlatformError>,
    effects: Mutex<Vec<PlatformEffect>>,
}

impl HeadlessPlatform {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Make every share attempt fail with `error`.
    pub fn with_share_error(mut self, error: PlatformError) -> Self {
        self.share_error = Some(error);
        self
    }

    /// Make every clipboard write fail with `error`.
    pub fn with_clipboard_error(mut self, error: PlatformError) -> Self {
        self.clipboard_error = Some(error);
        self
    }

    /// Effects recorded so far, oldest first.
    pub fn effects(&self) -> Vec<PlatformEffect> {
        self.lock().clone()
    }

    /// Drain recorded effects.
    pub fn take_effects(&self) -> Vec<PlatformEffect> {
        std::mem::take(&mut *self.lock())
    }

    /// Messages passed to [`Platform::alert`], oldest first.
    pub fn alerts(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|effect| match effect {
                PlatformEffect::Alert(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, effect: PlatformEffect) {
        self.lock().push(effect);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PlatformEffect>> {
        self.effects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Platform for HeadlessPlatform {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn share(&self, data: &ShareData) -> Result<(), PlatformError> {
        if !self.capabilities.native_share {
            return Err(PlatformError::Unsupported("Native share"));
        }
        if let Some(err) = &self.share_error {
            return Err(err.clone());
        }
        self.record(PlatformEffect::Shared(data.clone()));
        Ok(())
    }

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        if let Some(err) = &self.clipboard_error {
            return Err(err.clone());
        }
        self.record(PlatformEffect::ClipboardWrite(text.to_string()));
        Ok(())
    }

    fn alert(&self, message: &str) {
        self.record(PlatformEffect::Alert(message.to_string()));
    }

    fn navigate(&self, url: &str) {
        self.record(PlatformEffect::Navigated(url.to_string()));
    }

    fn scroll_into_view(&self, target: ElementId, options: ScrollOptions) {
        self.record(PlatformEffect::ScrolledIntoView { target, options });
    }
}

// ============================================================================
// TerminalPlatform
// ============================================================================

/// Platform for the CLI: clipboard writes reach the system clipboard,
/// everything else is recorded like [`HeadlessPlatform`].
///
/// A [`PlatformEffect::ClipboardWrite`] is recorded only once the copy
/// utility has succeeded.
#[derive(Debug)]
pub struct TerminalPlatform {
    recorder: HeadlessPlatform,
    clipboard: ClipboardProvider,
}

impl TerminalPlatform {
    pub fn new(capabilities: Capabilities, clipboard: ClipboardProvider) -> Self {
        Self {
            recorder: HeadlessPlatform::new(capabilities),
            clipboard,
        }
    }

    pub fn clipboard(&self) -> &ClipboardProvider {
        &self.clipboard
    }

    /// Drain recorded effects.
    pub fn take_effects(&self) -> Vec<PlatformEffect> {
        self.recorder.take_effects()
    }
}

impl Platform for TerminalPlatform {
    fn capabilities(&self) -> Capabilities {
        self.recorder.capabilities()
    }

    fn share(&self, data: &ShareData) -> Result<(), PlatformError> {
        self.recorder.share(data)
    }

    fn write_clipboard(&self, text: &str) -> Result<(), PlatformError> {
        self.clipboard
            .set_contents(text)
            .map_err(|e| PlatformError::Clipboard(e.to_string()))?;
        self.recorder.write_clipboard(text)
    }

    fn alert(&self, message: &str) {
        self.recorder.alert(message)
    }

    fn navigate(&self, url: &str) {
        self.recorder.navigate(url)
    }

    fn scroll_into_view(&self, target: ElementId, options: ScrollOptions) {
        self.recorder.scroll_into_view(target, options)
    }
}
