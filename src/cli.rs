//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mtdinfo")]
#[command(
    author,
    version,
    about = "MTD device information for kernels without MTD sysfs support",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// MTD listing to parse
    #[arg(long, global = true, default_value = "/proc/mtd")]
    pub proc_file: PathBuf,

    /// Directory holding the mtdN character devices
    #[arg(long, global = true, default_value = "/dev")]
    pub dev_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which device(s) to describe
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct InfoTarget {
    /// MTD device number
    pub mtd_num: Option<u32>,

    /// MTD character device node (e.g., /dev/mtd0)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// MTD device name as shown in the listing
    #[arg(short, long)]
    pub name: Option<String>,

    /// Describe every device in the listing
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether the legacy MTD interface is available
    Supported,

    /// Show the number of MTD devices and their number range
    Summary,

    /// Check whether an MTD device exists
    Exists {
        /// MTD device number
        mtd_num: u32,
    },

    /// List the devices in the MTD listing
    List,

    /// Show detailed device information
    Info {
        #[command(flatten)]
        target: InfoTarget,
    },
}
