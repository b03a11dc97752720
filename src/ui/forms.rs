use std::collections::BTreeSet;

use crate::dom::{Document, ElementId, EventOutcome};

/// Class that switches form styling to show validation state.
pub const VALIDATED_CLASS: &str = "was-validated";

/// Blocks submission of forms that fail constraint validation.
#[derive(Debug, Clone, Default)]
pub struct FormValidation {
    forms: BTreeSet<ElementId>,
}

impl FormValidation {
    /// Capture every form present now.
    pub fn attach(doc: &Document) -> Self {
        Self {
            forms: doc.elements_by_tag("form").into_iter().collect(),
        }
    }

    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Gate a submit. The validated marker is applied either way.
    pub fn on_submit(&self, doc: &mut Document, form: ElementId) -> EventOutcome {
        let mut outcome = EventOutcome::default();
        if !self.forms.contains(&form) {
            return outcome;
        }
        if !doc.check_validity(form) {
            tracing::debug!("Form submission blocked by constraint validation");
            outcome.prevent_default();
            outcome.stop_propagation();
        }
        doc.add_class(form, VALIDATED_CLASS);
        outcome
    }
}
