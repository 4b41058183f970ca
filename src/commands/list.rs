//! Listing and summary commands

use super::format_size;
use mtdinfo_legacy::{LegacyMtd, System};
use std::io::Write;

/// Print the device population summary
pub fn print_summary<S: System>(
    mtd: &LegacyMtd<S>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = mtd.population_summary()?;

    writeln!(out, "Count of MTD devices:           {}", summary.count)?;
    match summary.range() {
        Some(range) => {
            writeln!(
                out,
                "Present MTD devices:            mtd{} .. mtd{}",
                range.start(),
                range.end()
            )?;
        }
        None => writeln!(out, "Present MTD devices:            none")?,
    }
    Ok(())
}

/// Print one line per device in the listing
pub fn list_devices<S: System>(
    mtd: &LegacyMtd<S>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = mtd.list_devices()?;

    writeln!(out, "{:<8} {:>12} {:>12}  Name", "Device", "Size", "Erase size")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for entry in &entries {
        writeln!(
            out,
            "{:<8} {:>12} {:>12}  {}",
            format!("mtd{}", entry.mtd_num),
            format_size(entry.size),
            format_size(u64::from(entry.eb_size)),
            entry.name
        )?;
    }
    Ok(())
}
