use super::document::ElementId;

/// A discrete user or browser event routed to the page's behaviours.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Activation of `target` (mouse click, Enter/Space on a control).
    Click { target: ElementId },
    /// The text control `target` now holds `value`.
    Input { target: ElementId, value: String },
    /// Submission of `form`.
    Submit { form: ElementId },
    /// A batch of viewport intersection changes.
    Intersection(Vec<IntersectionEntry>),
}

/// One element's intersection with the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target: ElementId, intersection_ratio: f64) -> Self {
        Self {
            target,
            intersection_ratio,
        }
    }

    /// Any visible portion counts.
    pub fn is_intersecting(&self) -> bool {
        self.intersection_ratio > 0.0
    }
}

/// What the handlers did to the event's default action and propagation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl EventOutcome {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Fold another handler's outcome into this one.
    pub fn merge(&mut self, other: EventOutcome) {
        self.default_prevented |= other.default_prevented;
        self.propagation_stopped |= other.propagation_stopped;
    }
}
