//! Core data model types for multifocal.
//!
//! Measurements are kept as the text the user typed so that formatting such
//! as `"+0.25"` survives a round trip through the history. Parsing to `f64`
//! happens only in [`validation`](crate::validation) and
//! [`engine`](crate::engine).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text every field starts with, and returns to on reset.
pub const DEFAULT_FIELD: &str = "0";

/// One eye's refraction: spherical power, cylindrical power and axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Spherical power in diopters.
    pub spherical: String,
    /// Cylindrical power in diopters.
    pub cylindrical: String,
    /// Cylinder axis in degrees, 0 to 180.
    pub axis: String,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            spherical: DEFAULT_FIELD.to_string(),
            cylindrical: DEFAULT_FIELD.to_string(),
            axis: DEFAULT_FIELD.to_string(),
        }
    }
}

impl Measurement {
    pub fn new(
        spherical: impl Into<String>,
        cylindrical: impl Into<String>,
        axis: impl Into<String>,
    ) -> Self {
        Self {
            spherical: spherical.into(),
            cylindrical: cylindrical.into(),
            axis: axis.into(),
        }
    }

    /// Text of a single component.
    pub fn field(&self, component: Component) -> &str {
        match component {
            Component::Spherical => &self.spherical,
            Component::Cylindrical => &self.cylindrical,
            Component::Axis => &self.axis,
        }
    }

    /// Mutable text of a single component.
    pub fn field_mut(&mut self, component: Component) -> &mut String {
        match component {
            Component::Spherical => &mut self.spherical,
            Component::Cylindrical => &mut self.cylindrical,
            Component::Axis => &mut self.axis,
        }
    }
}

/// Which of the four measurement groups a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    FarRight,
    FarLeft,
    NearRight,
    NearLeft,
}

impl Slot {
    /// All slots in form order.
    pub const ALL: [Slot; 4] = [Slot::FarRight, Slot::FarLeft, Slot::NearRight, Slot::NearLeft];

    /// Human-readable label using the OD/OE abbreviations.
    pub fn label(self) -> &'static str {
        match self {
            Slot::FarRight => "Far OD (right eye)",
            Slot::FarLeft => "Far OE (left eye)",
            Slot::NearRight => "Near OD (right eye)",
            Slot::NearLeft => "Near OE (left eye)",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::FarRight => write!(f, "far-right"),
            Slot::FarLeft => write!(f, "far-left"),
            Slot::NearRight => write!(f, "near-right"),
            Slot::NearLeft => write!(f, "near-left"),
        }
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "far-right" | "far-od" => Ok(Slot::FarRight),
            "far-left" | "far-oe" => Ok(Slot::FarLeft),
            "near-right" | "near-od" => Ok(Slot::NearRight),
            "near-left" | "near-oe" => Ok(Slot::NearLeft),
            other => Err(format!("unknown measurement slot: {other}")),
        }
    }
}

/// One of the three fields of a [`Measurement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Spherical,
    Cylindrical,
    Axis,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Spherical, Component::Cylindrical, Component::Axis];
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Spherical => write!(f, "sph"),
            Component::Cylindrical => write!(f, "cyl"),
            Component::Axis => write!(f, "axis"),
        }
    }
}

impl FromStr for Component {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sph" | "spherical" => Ok(Component::Spherical),
            "cyl" | "cylindrical" | "cylinder" => Ok(Component::Cylindrical),
            "axis" => Ok(Component::Axis),
            other => Err(format!("unknown measurement component: {other}")),
        }
    }
}

/// The four measurement groups collected by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementSet {
    pub far_right: Measurement,
    pub far_left: Measurement,
    pub near_right: Measurement,
    pub near_left: Measurement,
}

impl MeasurementSet {
    pub fn get(&self, slot: Slot) -> &Measurement {
        match slot {
            Slot::FarRight => &self.far_right,
            Slot::FarLeft => &self.far_left,
            Slot::NearRight => &self.near_right,
            Slot::NearLeft => &self.near_left,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut Measurement {
        match slot {
            Slot::FarRight => &mut self.far_right,
            Slot::FarLeft => &mut self.far_left,
            Slot::NearRight => &mut self.near_right,
            Slot::NearLeft => &mut self.near_left,
        }
    }

    /// Replace the text of one field.
    pub fn set(&mut self, slot: Slot, component: Component, value: impl Into<String>) {
        *self.get_mut(slot).field_mut(component) = value.into();
    }

    /// Iterate the measurements in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Measurement)> + '_ {
        Slot::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}

/// A saved calculation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    /// Creation timestamp in epoch milliseconds, as text.
    pub id: String,
    /// Optional display name; empty when not given.
    #[serde(default)]
    pub name: String,
    /// Optional prescription image as a data URL; empty when not given.
    #[serde(default)]
    pub image: String,
    /// Display date, e.g. `18/10/2026`.
    pub date: String,
    /// Display time, e.g. `14:03:59`.
    pub time: String,
    /// Full creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// The measurements the result was computed from.
    pub measurements: MeasurementSet,
    /// Addition value at full precision.
    pub result: f64,
}

impl CalculationRecord {
    /// Name for display, falling back to a placeholder.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(unnamed)"
        } else {
            &self.name
        }
    }

    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_display_and_parse() {
        assert_eq!(Slot::FarRight.to_string(), "far-right");
        assert_eq!(Slot::NearLeft.to_string(), "near-left");
        assert_eq!("far-right".parse::<Slot>().unwrap(), Slot::FarRight);
        assert_eq!("NEAR_LEFT".parse::<Slot>().unwrap(), Slot::NearLeft);
        assert_eq!("far-oe".parse::<Slot>().unwrap(), Slot::FarLeft);
        assert_eq!("near-od".parse::<Slot>().unwrap(), Slot::NearRight);
        assert!("middle".parse::<Slot>().is_err());
    }

    #[test]
    fn component_display_and_parse() {
        assert_eq!(Component::Spherical.to_string(), "sph");
        assert_eq!("cylinder".parse::<Component>().unwrap(), Component::Cylindrical);
        assert_eq!("AXIS".parse::<Component>().unwrap(), Component::Axis);
        assert!("prism".parse::<Component>().is_err());
    }

    #[test]
    fn measurement_set_defaults_to_zero() {
        let set = MeasurementSet::default();
        for (_, m) in set.iter() {
            for component in Component::ALL {
                assert_eq!(m.field(component), "0");
            }
        }
    }

    #[test]
    fn set_updates_only_one_field() {
        let mut set = MeasurementSet::default();
        set.set(Slot::NearLeft, Component::Axis, "90");
        assert_eq!(set.near_left.axis, "90");
        assert_eq!(set.near_left.spherical, "0");
        assert_eq!(set.far_left.axis, "0");
    }

    #[test]
    fn iter_is_in_form_order() {
        let set = MeasurementSet::default();
        let slots: Vec<Slot> = set.iter().map(|(s, _)| s).collect();
        assert_eq!(slots, Slot::ALL.to_vec());
    }

    #[test]
    fn record_serde_keeps_typed_text() {
        let mut measurements = MeasurementSet::default();
        measurements.set(Slot::FarRight, Component::Spherical, "+0.25");
        let record = CalculationRecord {
            id: "1700000000000".into(),
            name: String::new(),
            image: String::new(),
            date: "14/11/2023".into(),
            time: "22:13:20".into(),
            created_at: None,
            measurements,
            result: 0.125,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"+0.25\""));
        let back: CalculationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.display_name(), "(unnamed)");
    }
}
