//! Headless page behaviours for a content site.
//!
//! A [`page::Page`] owns a [`dom::Document`] and attaches the site's
//! behaviours to it: theme persistence, debounced live search, lazy
//! images, the mobile menu, optional infinite scroll, smooth anchor
//! scrolling, form validation and the share/save article actions.
//!
//! The environment is injected: persistence through
//! [`storage::KeyValueStore`], remote search through
//! [`search::SearchClient`] and browser effects through
//! [`platform::Platform`].

pub mod actions;
pub mod clipboard;
pub mod config;
pub mod dom;
pub mod page;
pub mod platform;
pub mod search;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
