//! The `multifocal history` subcommands.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};

use multifocal_core::export::{export as render, ExportFormat};

use super::common::{load_config, open_history, print_page, print_record};

pub fn list(page: usize, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let history = open_history(&config)?;

    let page = history.page(page)?;
    print_page(&page);
    Ok(())
}

pub fn show(id: &str, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let history = open_history(&config)?;

    let record = history
        .get(id)
        .with_context(|| format!("no calculation with id {id}"))?;
    print_record(record);
    Ok(())
}

pub fn delete(id: &str, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut history = open_history(&config)?;

    let now = Instant::now();
    if history.delete(id, now)? {
        if let Some(message) = history.notice(now) {
            println!("{message}");
        }
    } else {
        println!("No calculation with id {id}, nothing deleted.");
    }
    Ok(())
}

pub fn clear(yes: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut history = open_history(&config)?;

    if history.is_empty() {
        println!("History is already empty.");
        return Ok(());
    }

    history.request_clear();
    let confirmed = yes
        || confirm(
            &format!(
                "Delete all {} calculation(s)? This cannot be undone. [y/N] ",
                history.len()
            ),
            io::stdin().lock(),
            io::stdout(),
        )?;

    if !confirmed {
        history.cancel_clear();
        println!("Cancelled, history untouched.");
        return Ok(());
    }

    let now = Instant::now();
    let removed = history.confirm_clear(now)?;
    if let Some(message) = history.notice(now) {
        println!("{message}");
    }
    println!("{removed} calculation(s) removed.");
    Ok(())
}

pub fn export(format: &str, output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let config = load_config(config_path)?;
    let history = open_history(&config)?;

    let text = render(history.records(), format)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            eprintln!("Exported {} calculation(s) to {}", history.len(), path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Ask a yes/no question; anything but `y` or `yes` is a no.
pub fn confirm(prompt: &str, mut input: impl BufRead, mut output: impl Write) -> Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_accepts_yes() {
        let mut out = Vec::new();
        assert!(confirm("sure? ", "y\n".as_bytes(), &mut out).unwrap());
        assert!(confirm("sure? ", "YES\n".as_bytes(), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "sure? sure? ");
    }

    #[test]
    fn confirm_defaults_to_no() {
        assert!(!confirm("", "\n".as_bytes(), Vec::new()).unwrap());
        assert!(!confirm("", "nope\n".as_bytes(), Vec::new()).unwrap());
        assert!(!confirm("", "".as_bytes(), Vec::new()).unwrap());
    }
}
