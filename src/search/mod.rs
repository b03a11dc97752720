//! Live search: the debounced header search box and its remote lookup.
//!
//! - **client**: `SearchClient` trait and the reqwest-backed `HttpSearchClient`
//! - **debounce**: single-slot timer with a cancel handle
//! - **render**: result list markup
//! - **widget**: `LiveSearch`, wiring input, debounce, requests and rendering

mod client;
mod debounce;
mod render;
mod widget;

pub use client::{HttpSearchClient, SearchClient, SearchError, SearchResult};
pub use debounce::Debouncer;
pub use render::{render_results, CATEGORY_CLASS, DESCRIPTION_CLASS, RESULT_CLASS};
pub use widget::{
    CompletionStatus, LiveSearch, SearchCompletion, SearchSettings, ACTIVE_CLASS, SEARCH_INPUT_ID,
    SEARCH_RESULTS_ID,
};
