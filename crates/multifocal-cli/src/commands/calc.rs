//! The `multifocal calc` command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use multifocal_core::engine::{breakdown, format_addition};
use multifocal_core::image::image_to_data_url;
use multifocal_core::{FormError, MeasurementForm, MeasurementSet, Measurement};

use super::common::{load_config, now, open_history};

#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Far vision, right eye: spherical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub far_right_sph: String,
    /// Far vision, right eye: cylindrical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub far_right_cyl: String,
    /// Far vision, right eye: axis
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub far_right_axis: String,

    /// Far vision, left eye: spherical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub far_left_sph: String,
    /// Far vision, left eye: cylindrical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub far_left_cyl: String,
    /// Far vision, left eye: axis
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub far_left_axis: String,

    /// Near vision, right eye: spherical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub near_right_sph: String,
    /// Near vision, right eye: cylindrical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub near_right_cyl: String,
    /// Near vision, right eye: axis
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub near_right_axis: String,

    /// Near vision, left eye: spherical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub near_left_sph: String,
    /// Near vision, left eye: cylindrical
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub near_left_cyl: String,
    /// Near vision, left eye: axis
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub near_left_axis: String,

    /// Name to save the calculation under
    #[arg(long)]
    pub name: Option<String>,

    /// Prescription image to attach
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl CalcArgs {
    fn measurements(&self) -> MeasurementSet {
        MeasurementSet {
            far_right: Measurement::new(&self.far_right_sph, &self.far_right_cyl, &self.far_right_axis),
            far_left: Measurement::new(&self.far_left_sph, &self.far_left_cyl, &self.far_left_axis),
            near_right: Measurement::new(
                &self.near_right_sph,
                &self.near_right_cyl,
                &self.near_right_axis,
            ),
            near_left: Measurement::new(&self.near_left_sph, &self.near_left_cyl, &self.near_left_axis),
        }
    }
}

pub fn execute(args: CalcArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;

    let mut form = MeasurementForm::with_formats(&config.date_format, &config.time_format);
    form.set_fields(args.measurements());
    if let Some(name) = &args.name {
        form.set_name(name.as_str());
    }
    if let Some(path) = &args.image {
        form.set_image(image_to_data_url(path)?);
    }

    // validate before touching the data directory
    let report = form.validity();
    if !report.is_ok() {
        for field in &report.invalid {
            eprintln!("  {field}");
        }
        anyhow::bail!("{} invalid field(s), nothing saved", report.invalid.len());
    }

    let mut history = open_history(&config)?;
    let record = match form.submit(&mut history, now()) {
        Ok(record) => record,
        Err(FormError::Invalid(report)) => anyhow::bail!("invalid measurements: {report}"),
        Err(FormError::History(e)) => return Err(e.into()),
    };

    let parts = breakdown(&record.measurements);
    println!("Addition: {}", format_addition(record.result));
    println!(
        "  OD {}  OE {}",
        format_addition(parts.right),
        format_addition(parts.left)
    );
    eprintln!("Saved as {} ({} in history)", record.id, history.len());

    Ok(())
}
