//! Measurement validation.
//!
//! Every field must be non-empty, parse as a finite number, and respect the
//! numeric constraints of the form: spherical and cylindrical powers move in
//! steps of 0.25 diopters, axis is an integer number of degrees in 0..=180.

use std::fmt;

use crate::model::{Component, MeasurementSet, Slot};

/// Increment for spherical and cylindrical powers, in diopters.
pub const POWER_STEP: f64 = 0.25;
/// Largest valid axis, in degrees.
pub const AXIS_MAX: f64 = 180.0;

const STEP_TOLERANCE: f64 = 1e-9;

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    Empty,
    NotANumber,
    OffStep,
    AxisNotInteger,
    AxisOutOfRange,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Empty => write!(f, "is empty"),
            FieldIssue::NotANumber => write!(f, "is not a number"),
            FieldIssue::OffStep => write!(f, "must be a multiple of {POWER_STEP}"),
            FieldIssue::AxisNotInteger => write!(f, "must be a whole number of degrees"),
            FieldIssue::AxisOutOfRange => write!(f, "must be between 0 and {AXIS_MAX}"),
        }
    }
}

/// A rejected field and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub slot: Slot,
    pub component: Component,
    pub issue: FieldIssue,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.slot, self.component, self.issue)
    }
}

/// Outcome of validating a [`MeasurementSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub invalid: Vec<InvalidField>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Whether a specific field was rejected.
    pub fn is_invalid(&self, slot: Slot, component: Component) -> bool {
        self.invalid
            .iter()
            .any(|f| f.slot == slot && f.component == component)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.invalid.is_empty() {
            return write!(f, "all fields valid");
        }
        let parts: Vec<String> = self.invalid.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// `true` when all twelve fields are non-empty.
pub fn is_complete(set: &MeasurementSet) -> bool {
    set.iter()
        .all(|(_, m)| Component::ALL.iter().all(|&c| !m.field(c).is_empty()))
}

/// Check a single field's text.
pub fn check_field(component: Component, text: &str) -> Option<FieldIssue> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(FieldIssue::Empty);
    }
    let value = match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Some(FieldIssue::NotANumber),
    };
    match component {
        Component::Spherical | Component::Cylindrical => {
            let steps = value / POWER_STEP;
            if !steps.is_finite() || (steps - steps.round()).abs() > STEP_TOLERANCE {
                Some(FieldIssue::OffStep)
            } else {
                None
            }
        }
        Component::Axis => {
            if value.fract() != 0.0 {
                Some(FieldIssue::AxisNotInteger)
            } else if !(0.0..=AXIS_MAX).contains(&value) {
                Some(FieldIssue::AxisOutOfRange)
            } else {
                None
            }
        }
    }
}

/// Validate every field, reporting all problems in form order.
pub fn validate(set: &MeasurementSet) -> ValidationReport {
    let invalid = set
        .iter()
        .flat_map(|(slot, m)| {
            Component::ALL.into_iter().filter_map(move |component| {
                check_field(component, m.field(component)).map(|issue| InvalidField {
                    slot,
                    component,
                    issue,
                })
            })
        })
        .collect();
    ValidationReport { invalid }
}
