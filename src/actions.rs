//! Article actions invoked from the article toolbar: share and save.
//!
//! Saved articles are a JSON array of URLs under one store key. The list
//! keeps insertion order and holds each URL at most once.

use thiserror::Error;

use crate::config::Messages;
use crate::dom::Document;
use crate::platform::{Platform, ShareData};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the JSON array of saved article URLs.
pub const SAVED_ARTICLES_KEY: &str = "savedArticles";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored saved-articles value is not a JSON array of strings.
    #[error("Stored saved-articles list is malformed: {0}")]
    MalformedSavedList(#[from] serde_json::Error),
}

/// Which way a save toggle went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Removed,
}

/// How a share request was fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed to the native share sheet.
    Shared,
    /// The share sheet rejected or was dismissed; logged only.
    ShareFailed,
    /// No share sheet: the URL went to the clipboard.
    CopiedToClipboard,
}

// ============================================================================
// Share
// ============================================================================

/// Share the current page, falling back to the clipboard.
pub fn share_article<P: Platform>(doc: &Document, platform: &P, messages: &Messages) -> ShareOutcome {
    let url = doc.location();

    if platform.capabilities().native_share {
        let data = ShareData {
            title: doc.title().to_string(),
            url: url.to_string(),
        };
        return match platform.share(&data) {
            Ok(()) => ShareOutcome::Shared,
            Err(e) => {
                tracing::info!(error = %e, "Error sharing");
                ShareOutcome::ShareFailed
            }
        };
    }

    if let Err(e) = platform.write_clipboard(url) {
        tracing::warn!(error = %e, "Failed to copy article link");
    }
    platform.alert(&messages.link_copied);
    ShareOutcome::CopiedToClipboard
}

// ============================================================================
// Save
// ============================================================================

/// Add `url` if absent, remove it if present.
pub fn toggle_saved(saved: &mut Vec<String>, url: &str) -> SaveOutcome {
    match saved.iter().position(|u| u == url) {
        Some(index) => {
            saved.remove(index);
            SaveOutcome::Removed
        }
        None => {
            saved.push(url.to_string());
            SaveOutcome::Saved
        }
    }
}

/// The saved-articles list, oldest first. Absent means empty.
pub async fn saved_articles<S: KeyValueStore>(store: &S) -> Result<Vec<String>, ActionError> {
    match store.get_item(SAVED_ARTICLES_KEY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Toggle the current page in the saved list and confirm with a dialog.
///
/// A malformed stored list is returned as an error and left untouched.
pub async fn save_article<S, P>(
    doc: &Document,
    store: &S,
    platform: &P,
    messages: &Messages,
) -> Result<SaveOutcome, ActionError>
where
    S: KeyValueStore,
    P: Platform,
{
    let mut saved = saved_articles(store).await?;
    let url = doc.location();
    let outcome = toggle_saved(&mut saved, url);

    let message = match outcome {
        SaveOutcome::Saved => &messages.article_saved,
        SaveOutcome::Removed => &messages.article_removed,
    };
    platform.alert(message);

    let raw = serde_json::to_string(&saved)?;
    store.set_item(SAVED_ARTICLES_KEY, &raw).await?;

    tracing::debug!(url = %url, ?outcome, count = saved.len(), "Saved articles updated");
    Ok(outcome)
}
