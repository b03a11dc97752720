//! Standalone page behaviours.
//!
//! Each behaviour captures the elements it needs when attached and ignores
//! anything added afterwards. A missing element disables only that
//! behaviour.
//!
//! # Module Structure
//!
//! - `observer` - Viewport intersection bookkeeping
//! - `lazy_images` - Deferred `data-src` image loading
//! - `menu` - Mobile navigation toggle
//! - `infinite_scroll` - Next-page navigation from the pagination block
//! - `smooth_scroll` - Same-page anchor scrolling
//! - `forms` - Constraint validation gate on submit

mod forms;
mod infinite_scroll;
mod lazy_images;
mod menu;
mod observer;
mod smooth_scroll;

pub use forms::{FormValidation, VALIDATED_CLASS};
pub use infinite_scroll::{InfiniteScroll, PAGINATION_CLASS, PAGINATION_LINK_CLASS};
pub use lazy_images::{LazyImageLoader, DEFERRED_SRC_ATTRIBUTE, LOADED_CLASS};
pub use menu::{MobileMenu, MENU_TOGGLE_ID, NAV_LIST_ID, OPEN_CLASS};
pub use observer::IntersectionObserver;
pub use smooth_scroll::SmoothScroll;
