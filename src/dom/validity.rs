//! Constraint validation for form controls.
//!
//! Mirrors the subset of browser-native validation the site's templates
//! rely on: `required`, `minlength`/`maxlength`, and the `email`/`url`
//! input types. Disabled controls and non-submittable input types are
//! barred from validation.

use super::document::{Document, ElementId};

/// Outcome of validating a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    ValueMissing,
    TooShort,
    TooLong,
    TypeMismatch,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

const CONTROL_TAGS: &[&str] = &["input", "textarea", "select"];
const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "button", "reset", "image"];

impl Document {
    /// Whether `id` takes part in constraint validation.
    pub fn is_validatable(&self, id: ElementId) -> bool {
        let el = self.element(id);
        if !CONTROL_TAGS.contains(&el.tag()) || el.has_attribute("disabled") {
            return false;
        }
        let input_type = el.attribute("type").unwrap_or("text");
        !(el.tag() == "input" && EXEMPT_INPUT_TYPES.contains(&input_type))
    }

    /// Validate one control against its declared constraints.
    pub fn validity(&self, id: ElementId) -> Validity {
        if !self.is_validatable(id) {
            return Validity::Valid;
        }
        let el = self.element(id);
        let input_type = el.attribute("type").unwrap_or("text");

        if matches!(input_type, "checkbox" | "radio") {
            if el.has_attribute("required") && !el.has_attribute("checked") {
                return Validity::ValueMissing;
            }
            return Validity::Valid;
        }

        let value = match el.attribute("value") {
            Some(v) => v,
            None if el.tag() == "textarea" => el.text(),
            None => "",
        };

        if value.is_empty() {
            return if el.has_attribute("required") {
                Validity::ValueMissing
            } else {
                Validity::Valid
            };
        }

        let len = value.chars().count();
        if let Some(min) = el.attribute("minlength").and_then(|v| v.parse::<usize>().ok()) {
            if len < min {
                return Validity::TooShort;
            }
        }
        if let Some(max) = el.attribute("maxlength").and_then(|v| v.parse::<usize>().ok()) {
            if len > max {
                return Validity::TooLong;
            }
        }

        let type_ok = match input_type {
            "email" => is_valid_email(value),
            "url" => url::Url::parse(value).is_ok(),
            _ => true,
        };
        if !type_ok {
            return Validity::TypeMismatch;
        }

        Validity::Valid
    }

    /// `form.checkValidity()`: true when every validatable descendant is valid.
    pub fn check_validity(&self, form: ElementId) -> bool {
        self.descendants(form)
            .into_iter()
            .all(|id| self.validity(id).is_valid())
    }
}

/// Loose `local@domain` shape check, matching what browsers accept for
/// `type=email` closely enough for gating submissions.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
}
