//! mtdinfo - MTD device information on legacy kernels
//!
//! Reports MTD device information on kernels that predate the MTD sysfs
//! interface, by combining `/proc/mtd` with ioctls on the `/dev/mtdN`
//! character devices.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use mtdinfo_legacy::{LegacyMtd, LegacyMtdConfig};
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default());
    if std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_none() {
        logger.filter_level(verbosity_filter(cli.verbose));
    }
    logger.init();

    let config = LegacyMtdConfig::new()
        .with_proc_file(&cli.proc_file)
        .with_dev_dir(&cli.dev_dir);
    let mtd = LegacyMtd::new(&config);

    log::debug!(
        "Using listing {} and device nodes in {}",
        config.proc_file.display(),
        config.dev_dir.display()
    );

    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Supported => {
            if mtd.is_legacy_mode_available() {
                writeln!(
                    out,
                    "Legacy MTD interface is available ({})",
                    config.proc_file.display()
                )?;
                Ok(())
            } else {
                writeln!(out, "Legacy MTD interface is not available")?;
                out.flush()?;
                std::process::exit(1);
            }
        }
        Commands::Summary => commands::print_summary(&mtd, &mut out),
        Commands::Exists { mtd_num } => {
            if mtd.device_exists(mtd_num)? {
                writeln!(out, "mtd{} exists", mtd_num)?;
                Ok(())
            } else {
                writeln!(out, "mtd{} does not exist", mtd_num)?;
                out.flush()?;
                std::process::exit(1);
            }
        }
        Commands::List => commands::list_devices(&mtd, &mut out),
        Commands::Info { target } => commands::info::run_info(&mtd, &target, &mut out),
    }
}

/// Log level selected by the number of `-v` flags
fn verbosity_filter(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_enables_debug_records() {
        assert_eq!(verbosity_filter(0), log::LevelFilter::Info);
        assert_eq!(verbosity_filter(1), log::LevelFilter::Debug);
        assert_eq!(verbosity_filter(5), log::LevelFilter::Trace);

        let logger = env_logger::Builder::new()
            .filter_level(verbosity_filter(1))
            .build();
        let debug = log::Metadata::builder()
            .level(log::Level::Debug)
            .target("mtdinfo")
            .build();
        let trace = log::Metadata::builder()
            .level(log::Level::Trace)
            .target("mtdinfo")
            .build();
        assert!(log::Log::enabled(&logger, &debug));
        assert!(!log::Log::enabled(&logger, &trace));
    }
}
