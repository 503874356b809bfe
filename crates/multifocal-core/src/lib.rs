//! multifocal-core — addition calculation and prescription history.
//!
//! This crate holds the measurement model, the addition engine, form
//! validation and the persisted calculation history that the `multifocal`
//! command line builds on.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod form;
pub mod history;
pub mod image;
pub mod model;
pub mod notice;
pub mod pagination;
pub mod session;
pub mod storage;
pub mod validation;

pub use config::{load_config, load_config_from, MultifocalConfig};
pub use error::{FormError, HistoryError, StorageError};
pub use form::MeasurementForm;
pub use history::{History, HISTORY_KEY};
pub use model::{CalculationRecord, Component, Measurement, MeasurementSet, Slot};
pub use notice::Moment;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
