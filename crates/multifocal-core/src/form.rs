//! The measurement form.
//!
//! Holds the twelve text fields plus the optional name and image, decides
//! whether a calculation may run, and turns a submission into a saved
//! [`CalculationRecord`].

use std::time::Instant;

use crate::engine;
use crate::error::FormError;
use crate::history::History;
use crate::model::{CalculationRecord, Component, MeasurementSet, Slot};
use crate::notice::{Moment, TransientFlag, SUBMIT_HIGHLIGHT};
use crate::storage::KeyValueStore;
use crate::validation::{self, ValidationReport};

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone)]
pub struct MeasurementForm {
    fields: MeasurementSet,
    name: String,
    image: String,
    date_format: String,
    time_format: String,
    last_result: Option<f64>,
    submitted: TransientFlag,
}

impl Default for MeasurementForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasurementForm {
    pub fn new() -> Self {
        Self::with_formats(DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT)
    }

    /// A form that stamps records with the given `strftime` formats.
    pub fn with_formats(date_format: &str, time_format: &str) -> Self {
        Self {
            fields: MeasurementSet::default(),
            name: String::new(),
            image: String::new(),
            date_format: date_format.to_string(),
            time_format: time_format.to_string(),
            last_result: None,
            submitted: TransientFlag::default(),
        }
    }

    pub fn fields(&self) -> &MeasurementSet {
        &self.fields
    }

    pub fn set_field(&mut self, slot: Slot, component: Component, value: impl Into<String>) {
        self.fields.set(slot, component, value);
    }

    /// Replace every field at once.
    pub fn set_fields(&mut self, fields: MeasurementSet) {
        self.fields = fields;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Attach a prescription image, as a data URL.
    pub fn set_image(&mut self, data_url: impl Into<String>) {
        self.image = data_url.into();
    }

    pub fn validity(&self) -> ValidationReport {
        validation::validate(&self.fields)
    }

    pub fn can_submit(&self) -> bool {
        validation::is_complete(&self.fields) && self.validity().is_ok()
    }

    /// Result of the last successful submission.
    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    /// Whether the submit control is still in its "success" state.
    pub fn submit_highlighted(&self, now: Instant) -> bool {
        self.submitted.is_raised(now)
    }

    /// Calculate from the current fields and save the record to `history`.
    ///
    /// Fields are left as they are so the user can adjust and resubmit.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        history: &mut History<S>,
        at: Moment,
    ) -> Result<CalculationRecord, FormError> {
        let report = self.validity();
        if !report.is_ok() {
            return Err(FormError::Invalid(report));
        }

        let measurements = self.fields.clone();
        let result = engine::addition(&measurements);

        let record = CalculationRecord {
            id: history.next_id(at.wall.timestamp_millis()),
            name: self.name.clone(),
            image: self.image.clone(),
            date: at.wall.format(&self.date_format).to_string(),
            time: at.wall.format(&self.time_format).to_string(),
            created_at: Some(at.wall),
            measurements,
            result,
        };
        history.append(record.clone())?;

        self.last_result = Some(result);
        self.submitted.raise(at.instant, SUBMIT_HIGHLIGHT);
        Ok(record)
    }

    /// Restore every field to `"0"` and drop the name and image.
    pub fn reset(&mut self) {
        self.fields = MeasurementSet::default();
        self.name.clear();
        self.image.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{FixedOffset, TimeZone};
    use std::time::Duration;

    fn at(h: u32, m: u32, s: u32) -> Moment {
        let wall = FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 18, h, m, s)
            .unwrap();
        Moment::new(wall, Instant::now())
    }

    fn reference_form() -> MeasurementForm {
        let mut form = MeasurementForm::new();
        form.set_field(Slot::FarRight, Component::Spherical, "-2.00");
        form.set_field(Slot::NearRight, Component::Spherical, "-1.00");
        form.set_field(Slot::FarLeft, Component::Spherical, "-2.25");
        form.set_field(Slot::NearLeft, Component::Spherical, "-1.00");
        form
    }

    #[test]
    fn submit_saves_record() {
        let mut history = History::load(MemoryStore::new()).unwrap();
        let mut form = reference_form();
        form.set_name("Ana");

        let now = at(9, 5, 7);
        let record = form.submit(&mut history, now).unwrap();
        assert_eq!(record.result, 1.125);
        assert_eq!(record.name, "Ana");
        assert_eq!(record.date, "18/10/2026");
        assert_eq!(record.time, "09:05:07");
        assert_eq!(record.id, now.wall.timestamp_millis().to_string());
        assert_eq!(record.measurements.far_left.spherical, "-2.25");
        assert_eq!(history.records(), &[record]);
        assert_eq!(form.last_result(), Some(1.125));
        assert!(form.submit_highlighted(now.instant));
        assert!(form.submit_highlighted(now.instant + Duration::from_millis(1999)));
        assert!(!form.submit_highlighted(now.instant + SUBMIT_HIGHLIGHT));
        // fields survive submission
        assert_eq!(form.fields().far_right.spherical, "-2.00");
    }

    #[test]
    fn invalid_form_is_rejected_without_saving() {
        let mut history = History::load(MemoryStore::new()).unwrap();
        let mut form = reference_form();
        form.set_field(Slot::NearLeft, Component::Spherical, "abc");
        assert!(!form.can_submit());

        let err = form.submit(&mut history, at(9, 0, 0)).unwrap_err();
        match err {
            FormError::Invalid(report) => {
                assert!(report.is_invalid(Slot::NearLeft, Component::Spherical))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(history.is_empty());
        assert_eq!(form.last_result(), None);
    }

    #[test]
    fn empty_field_blocks_submit() {
        let mut form = reference_form();
        assert!(form.can_submit());
        form.set_field(Slot::FarLeft, Component::Axis, "");
        assert!(!form.can_submit());
    }

    #[test]
    fn same_instant_submissions_get_distinct_ids() {
        let mut history = History::load(MemoryStore::new()).unwrap();
        let mut form = reference_form();
        let a = form.submit(&mut history, at(9, 0, 0)).unwrap();
        let b = form.submit(&mut history, at(9, 0, 0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(history.records()[0].id, b.id);
    }

    #[test]
    fn reset_restores_defaults_and_keeps_history() {
        let mut history = History::load(MemoryStore::new()).unwrap();
        let mut form = reference_form();
        form.set_name("Ana");
        form.set_image("data:image/png;base64,AAAA");
        form.submit(&mut history, at(9, 0, 0)).unwrap();

        form.reset();
        assert_eq!(form.fields(), &MeasurementSet::default());
        assert_eq!(form.name(), "");
        assert_eq!(form.image(), "");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn custom_display_formats() {
        let mut history = History::load(MemoryStore::new()).unwrap();
        let mut form = MeasurementForm::with_formats("%Y-%m-%d", "%H:%M");
        let record = form.submit(&mut history, at(14, 30, 59)).unwrap();
        assert_eq!(record.date, "2026-10-18");
        assert_eq!(record.time, "14:30");
        assert_eq!(record.result, 0.0);
    }
}
