//! Intent dispatcher tying the form, history and pager together.
//!
//! A presentation layer feeds [`Intent`]s into [`Session::dispatch`] one at a
//! time and renders [`Session::view`]. Each intent runs to completion,
//! including its storage write, before `dispatch` returns.

use std::time::Instant;

use crate::engine::format_addition;
use crate::error::{FormError, HistoryError};
use crate::export::{self, ExportFormat};
use crate::form::MeasurementForm;
use crate::history::History;
use crate::model::{CalculationRecord, Component, Slot};
use crate::notice::{Moment, TransientFlag, COPIED_TTL};
use crate::pagination::{Page, Pager};
use crate::storage::KeyValueStore;
use crate::validation::ValidationReport;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    EditField {
        slot: Slot,
        component: Component,
        value: String,
    },
    SetName(String),
    SetImage(String),
    Submit,
    Reset,
    DeleteOne(String),
    RequestClear,
    ConfirmClear,
    CancelClear,
    PagePrev,
    PageNext,
    /// Jump to a 1-based page; out-of-range numbers leave the pager put.
    GoToPage(usize),
    ToggleHistory,
    Export(ExportFormat),
}

/// What a dispatched intent did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Form state changed; nothing was saved.
    Edited,
    Calculated(CalculationRecord),
    /// Submission refused; the report names the offending fields.
    Invalid(ValidationReport),
    Reset,
    Deleted { found: bool },
    ClearRequested,
    ClearCancelled,
    Cleared { removed: usize },
    /// The pager moved, or stayed put at a boundary.
    Page { number: usize, moved: bool },
    HistoryVisible(bool),
    Exported(String),
}

/// Everything a presentation layer needs to draw the screen.
#[derive(Debug)]
pub struct View<'a> {
    pub validity: ValidationReport,
    /// Last result, rounded for display.
    pub result: Option<String>,
    pub submit_highlighted: bool,
    pub notice: Option<&'a str>,
    pub clear_pending: bool,
    pub history_visible: bool,
    pub copied: bool,
    /// Current history page; `None` when hidden or empty.
    pub page: Option<Page<'a, CalculationRecord>>,
}

pub struct Session<S: KeyValueStore> {
    form: MeasurementForm,
    history: History<S>,
    pager: Pager,
    history_visible: bool,
    copied: TransientFlag,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(form: MeasurementForm, history: History<S>) -> Self {
        let pager = Pager::new(history.page_size());
        Self {
            form,
            history,
            pager,
            history_visible: true,
            copied: TransientFlag::default(),
        }
    }

    pub fn form(&self) -> &MeasurementForm {
        &self.form
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn dispatch(
        &mut self,
        intent: Intent,
        at: Moment,
    ) -> Result<Outcome, HistoryError> {
        tracing::trace!(?intent, "dispatch");
        let outcome = match intent {
            Intent::EditField {
                slot,
                component,
                value,
            } => {
                self.form.set_field(slot, component, value);
                Outcome::Edited
            }
            Intent::SetName(name) => {
                self.form.set_name(name);
                Outcome::Edited
            }
            Intent::SetImage(url) => {
                self.form.set_image(url);
                Outcome::Edited
            }
            Intent::Submit => match self.form.submit(&mut self.history, at) {
                Ok(record) => Outcome::Calculated(record),
                Err(FormError::Invalid(report)) => Outcome::Invalid(report),
                Err(FormError::History(e)) => return Err(e),
            },
            Intent::Reset => {
                self.form.reset();
                Outcome::Reset
            }
            Intent::DeleteOne(id) => {
                let found = self.history.delete(&id, at.instant)?;
                self.pager.clamp(self.history.len());
                Outcome::Deleted { found }
            }
            Intent::RequestClear => {
                self.history.request_clear();
                Outcome::ClearRequested
            }
            Intent::CancelClear => {
                self.history.cancel_clear();
                Outcome::ClearCancelled
            }
            Intent::ConfirmClear => {
                let removed = self.history.confirm_clear(at.instant)?;
                self.pager.clamp(0);
                Outcome::Cleared { removed }
            }
            Intent::PagePrev => {
                let moved = self.pager.prev();
                Outcome::Page {
                    number: self.pager.current(),
                    moved,
                }
            }
            Intent::PageNext => {
                let moved = self.pager.next(self.history.len());
                Outcome::Page {
                    number: self.pager.current(),
                    moved,
                }
            }
            Intent::GoToPage(number) => {
                let moved = self.pager.go_to(number, self.history.len());
                Outcome::Page {
                    number: self.pager.current(),
                    moved,
                }
            }
            Intent::ToggleHistory => {
                self.history_visible = !self.history_visible;
                Outcome::HistoryVisible(self.history_visible)
            }
            Intent::Export(format) => {
                let text = export::export(self.history.records(), format)?;
                self.copied.raise(at.instant, COPIED_TTL);
                Outcome::Exported(text)
            }
        };
        Ok(outcome)
    }

    pub fn view(&self, now: Instant) -> View<'_> {
        let page = if self.history_visible && !self.history.is_empty() {
            self.history.page(self.pager.current()).ok()
        } else {
            None
        };
        View {
            validity: self.form.validity(),
            result: self.form.last_result().map(format_addition),
            submit_highlighted: self.form.submit_highlighted(now),
            notice: self.history.notice(now),
            clear_pending: self.history.clear_pending(),
            history_visible: self.history_visible,
            copied: self.copied.is_raised(now),
            page,
        }
    }
}
