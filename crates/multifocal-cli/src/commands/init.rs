//! The `multifocal init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("multifocal.toml").exists() {
        println!("multifocal.toml already exists, skipping.");
    } else {
        std::fs::write("multifocal.toml", SAMPLE_CONFIG)?;
        println!("Created multifocal.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit multifocal.toml if you want the history somewhere else");
    println!("  2. Run: multifocal calc --far-right-sph -2.00 --near-right-sph -1.00");
    println!("  3. Run: multifocal history list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# multifocal configuration

# Where the history is stored. MULTIFOCAL_DATA_DIR overrides this.
# data_dir = "/home/me/.local/share/multifocal"

page_size = 3
history_key = "calculation-history"
date_format = "%d/%m/%Y"
time_format = "%H:%M:%S"
"#;
