//! Helpers shared by the subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use multifocal_core::config::load_config_from;
use multifocal_core::engine::format_addition;
use multifocal_core::image::decode_data_url;
use multifocal_core::pagination::Page;
use multifocal_core::{CalculationRecord, History, JsonFileStore, Moment, MultifocalConfig};

pub fn load_config(path: Option<PathBuf>) -> Result<MultifocalConfig> {
    load_config_from(path.as_deref())
}

/// Open the on-disk history described by `config`.
pub fn open_history(config: &MultifocalConfig) -> Result<History<JsonFileStore>> {
    tracing::debug!(data_dir = %config.data_dir.display(), "opening history");
    let store = JsonFileStore::new(&config.data_dir);
    History::open(store, &config.history_key, config.page_size).with_context(|| {
        format!(
            "failed to load history from {}",
            config.data_dir.display()
        )
    })
}

pub fn now() -> Moment {
    Moment::now()
}

pub fn page_table(page: &Page<'_, CalculationRecord>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Id", "Name", "Date", "Far OD / OE", "Near OD / OE", "Addition"]);

    for record in page.items {
        let m = &record.measurements;
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(&record.name),
            Cell::new(format!("{} {}", record.date, record.time)),
            Cell::new(format!("{} / {}", m.far_right.spherical, m.far_left.spherical)),
            Cell::new(format!("{} / {}", m.near_right.spherical, m.near_left.spherical)),
            Cell::new(format_addition(record.result)),
        ]);
    }

    table
}

/// Print one page, or a hint when the history is empty.
pub fn print_page(page: &Page<'_, CalculationRecord>) {
    if page.items.is_empty() {
        println!("No calculations saved yet.");
        return;
    }
    println!("{}", page_table(page));
    println!("Page {} of {}", page.number, page.count);
}

pub fn print_record(record: &CalculationRecord) {
    println!("Id:     {}", record.id);
    println!("Name:   {}", record.display_name());
    println!("Date:   {} at {}", record.date, record.time);
    if record.has_image() {
        match decode_data_url(&record.image) {
            Ok((mime, bytes)) => println!("Image:  {mime}, {} bytes", bytes.len()),
            Err(e) => println!("Image:  attached but unreadable ({e})"),
        }
    }

    let m = &record.measurements;
    println!();
    println!("Far vision");
    print_measurement("OD", &m.far_right);
    print_measurement("OE", &m.far_left);
    println!("Near vision");
    print_measurement("OD", &m.near_right);
    print_measurement("OE", &m.near_left);
    println!();
    println!("Addition: {}", format_addition(record.result));
}

fn print_measurement(eye: &str, m: &multifocal_core::Measurement) {
    println!(
        "  {eye}: Sph {} | Cyl {} | Axis {}°",
        m.spherical, m.cylindrical, m.axis
    );
}
