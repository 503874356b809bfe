//! The `multifocal shell` command.
//!
//! A line-oriented front end for [`Session`]: each line becomes one intent,
//! which is dispatched and rendered before the next line is read.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use multifocal_core::engine::format_addition;
use multifocal_core::export::ExportFormat;
use multifocal_core::image::image_to_data_url;
use multifocal_core::session::{Intent, Outcome, Session};
use multifocal_core::{Component, KeyValueStore, MeasurementForm, Slot};

use super::common::{load_config, now, open_history, page_table};

const HELP: &str = "\
Commands:
  set <slot> <sph|cyl|axis> <value>   edit a field (slots: far-right, far-left, near-right, near-left)
  name <text>                         name for the next calculation
  image <path>                        attach a prescription image
  show                                print the current fields
  calc                                calculate and save
  reset                               restore all fields to 0
  list | next | prev | page <n>       browse the history
  delete <id>                         delete one calculation
  clear, then confirm | cancel        delete the whole history
  export [text|speech|json]           print the history
  toggle                              show or hide the history
  help | quit";

/// A parsed shell line.
#[derive(Debug, PartialEq)]
pub enum Command {
    Intent(Intent),
    AttachImage(PathBuf),
    ShowFields,
    List,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (head.to_lowercase().as_str(), rest.as_slice()) {
        ("set", [slot, component, value]) => Command::Intent(Intent::EditField {
            slot: slot.parse::<Slot>().map_err(|e| anyhow::anyhow!(e))?,
            component: component.parse::<Component>().map_err(|e| anyhow::anyhow!(e))?,
            value: value.to_string(),
        }),
        // an empty value clears the field
        ("set", [slot, component]) => Command::Intent(Intent::EditField {
            slot: slot.parse::<Slot>().map_err(|e| anyhow::anyhow!(e))?,
            component: component.parse::<Component>().map_err(|e| anyhow::anyhow!(e))?,
            value: String::new(),
        }),
        ("set", _) => anyhow::bail!("usage: set <slot> <sph|cyl|axis> <value>"),
        ("name", words) => Command::Intent(Intent::SetName(words.join(" "))),
        ("image", [path]) => Command::AttachImage(PathBuf::from(path)),
        ("image", _) => anyhow::bail!("usage: image <path>"),
        ("show", []) => Command::ShowFields,
        ("calc" | "calculate", []) => Command::Intent(Intent::Submit),
        ("reset", []) => Command::Intent(Intent::Reset),
        ("list", []) => Command::List,
        ("next", []) => Command::Intent(Intent::PageNext),
        ("prev", []) => Command::Intent(Intent::PagePrev),
        ("page", [number]) => Command::Intent(Intent::GoToPage(
            number
                .parse()
                .with_context(|| format!("not a page number: {number}"))?,
        )),
        ("page", _) => anyhow::bail!("usage: page <n>"),
        ("delete", [id]) => Command::Intent(Intent::DeleteOne(id.to_string())),
        ("delete", _) => anyhow::bail!("usage: delete <id>"),
        ("clear", []) => Command::Intent(Intent::RequestClear),
        ("confirm", []) => Command::Intent(Intent::ConfirmClear),
        ("cancel", []) => Command::Intent(Intent::CancelClear),
        ("export", []) => Command::Intent(Intent::Export(ExportFormat::Text)),
        ("export", [format]) => Command::Intent(Intent::Export(
            format.parse::<ExportFormat>().map_err(|e| anyhow::anyhow!(e))?,
        )),
        ("toggle", []) => Command::Intent(Intent::ToggleHistory),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        (other, _) => anyhow::bail!("unknown command '{other}', try 'help'"),
    };
    Ok(Some(command))
}

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let history = open_history(&config)?;
    let form = MeasurementForm::with_formats(&config.date_format, &config.time_format);
    let mut session = Session::new(form, history);

    let stdin = io::stdin();
    run(&mut session, stdin.lock(), io::stdout())
}

/// Read commands from `input` until `quit` or end of input.
pub fn run<S: KeyValueStore>(
    session: &mut Session<S>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    writeln!(out, "multifocal shell, type 'help' for commands")?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        let intent = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::ShowFields => {
                write_fields(session, &mut out)?;
                continue;
            }
            Command::List => {
                write_history(session, Instant::now(), &mut out)?;
                continue;
            }
            Command::AttachImage(path) => match image_to_data_url(&path) {
                Ok(url) => Intent::SetImage(url),
                Err(e) => {
                    writeln!(out, "{e:#}")?;
                    continue;
                }
            },
            Command::Intent(intent) => intent,
        };

        let at = now();
        match session.dispatch(intent, at) {
            Ok(outcome) => render(session, outcome, at.instant, &mut out)?,
            Err(e) if e.is_rejection() => {
                tracing::debug!("rejected: {e}");
                writeln!(out, "{e}")?
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn render<S: KeyValueStore>(
    session: &Session<S>,
    outcome: Outcome,
    at: Instant,
    out: &mut impl Write,
) -> Result<()> {
    let view = session.view(at);
    match outcome {
        Outcome::Edited | Outcome::Reset => {
            if !view.validity.is_ok() {
                writeln!(out, "Calculation disabled: {}", view.validity)?;
            }
        }
        Outcome::Calculated(record) => {
            writeln!(out, "Addition: {}", format_addition(record.result))?;
            writeln!(out, "Saved as {}", record.id)?;
        }
        Outcome::Invalid(report) => {
            for field in &report.invalid {
                writeln!(out, "  {field}")?;
            }
            writeln!(out, "Nothing saved.")?;
        }
        Outcome::Deleted { found: false } => writeln!(out, "No calculation with that id.")?,
        Outcome::Deleted { found: true } | Outcome::Cleared { .. } => {
            if let Some(message) = view.notice {
                writeln!(out, "{message}")?;
            }
        }
        Outcome::ClearRequested => writeln!(
            out,
            "Delete the whole history? This cannot be undone. Type 'confirm' or 'cancel'."
        )?,
        Outcome::ClearCancelled => writeln!(out, "Cancelled, history untouched.")?,
        Outcome::Page { moved: false, .. } => writeln!(out, "No more pages.")?,
        Outcome::Page { moved: true, .. } => write_history(session, at, out)?,
        Outcome::HistoryVisible(visible) => {
            writeln!(out, "History {}", if visible { "shown" } else { "hidden" })?
        }
        Outcome::Exported(text) => writeln!(out, "{text}")?,
    }
    Ok(())
}

fn write_fields<S: KeyValueStore>(session: &Session<S>, out: &mut impl Write) -> Result<()> {
    let form = session.form();
    for (slot, m) in form.fields().iter() {
        writeln!(
            out,
            "  {:<10} sph {:>6}  cyl {:>6}  axis {:>3}",
            slot.to_string(),
            m.spherical,
            m.cylindrical,
            m.axis
        )?;
    }
    if !form.name().is_empty() {
        writeln!(out, "  name: {}", form.name())?;
    }
    Ok(())
}

fn write_history<S: KeyValueStore>(
    session: &Session<S>,
    at: Instant,
    out: &mut impl Write,
) -> Result<()> {
    let view = session.view(at);
    if !view.history_visible {
        writeln!(out, "History hidden, type 'toggle' to show it.")?;
        return Ok(());
    }
    match view.page {
        Some(page) => {
            writeln!(out, "{}", page_table(&page))?;
            writeln!(out, "Page {} of {}", page.number, page.count)?;
        }
        None => writeln!(out, "No calculations saved yet.")?,
    }
    Ok(())
}
