//! Headless document model.
//!
//! - **document**: arena-backed element tree with id/class/attribute queries
//! - **event**: page events and their default-action outcome
//! - **validity**: constraint validation for form controls

mod document;
mod event;
mod validity;

pub use document::{Document, Element, ElementId};
pub use event::{EventOutcome, IntersectionEntry, PageEvent};
pub use validity::Validity;
