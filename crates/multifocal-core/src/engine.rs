//! Addition calculation.
//!
//! The addition of one eye is the absolute difference between its near and
//! far spherical power; the reported value is the mean over both eyes.
//! The engine does not validate: unparsable text becomes `NaN` and
//! propagates into the result.

use crate::model::{MeasurementSet, Slot};

/// Per-eye additions and their mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditionBreakdown {
    /// `|near-right − far-right|`
    pub right: f64,
    /// `|near-left − far-left|`
    pub left: f64,
    /// `(right + left) / 2`
    pub value: f64,
}

/// Parse measurement text as a decimal number; anything unparsable is `NaN`.
pub fn parse_decimal(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

fn spherical(set: &MeasurementSet, slot: Slot) -> f64 {
    parse_decimal(&set.get(slot).spherical)
}

/// Compute both per-eye additions and their mean.
pub fn breakdown(set: &MeasurementSet) -> AdditionBreakdown {
    let right = (spherical(set, Slot::NearRight) - spherical(set, Slot::FarRight)).abs();
    let left = (spherical(set, Slot::NearLeft) - spherical(set, Slot::FarLeft)).abs();
    AdditionBreakdown {
        right,
        left,
        value: (right + left) / 2.0,
    }
}

/// The addition value for a measurement set, at full precision.
pub fn addition(set: &MeasurementSet) -> f64 {
    breakdown(set).value
}

/// Round to two decimals, halves away from zero.
///
/// Values too large to scale are returned unchanged.
pub fn round_addition(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Format an addition for display with two decimals, halves away from zero.
///
/// `1.125` renders as `"1.13"`.
pub fn format_addition(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = round_addition(value);
    // avoid "-0.00"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.2}")
}
