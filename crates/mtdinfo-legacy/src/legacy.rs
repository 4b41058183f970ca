//! Entry point for legacy MTD queries

use crate::sys::{LinuxSystem, System};
use log::error;
use std::io;
use std::path::{Path, PathBuf};

/// Default location of the MTD listing
pub const MTD_PROC_FILE: &str = "/proc/mtd";

/// Default directory holding MTD character devices
pub const DEV_ROOT: &str = "/dev";

/// Configuration for legacy MTD queries
#[derive(Debug, Clone)]
pub struct LegacyMtdConfig {
    /// Path of the MTD listing (`/proc/mtd`)
    pub proc_file: PathBuf,
    /// Directory holding `mtdN` character devices (`/dev`)
    pub dev_dir: PathBuf,
}

impl Default for LegacyMtdConfig {
    fn default() -> Self {
        Self {
            proc_file: PathBuf::from(MTD_PROC_FILE),
            dev_dir: PathBuf::from(DEV_ROOT),
        }
    }
}

impl LegacyMtdConfig {
    /// Create a configuration with the default paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the listing from `path`
    pub fn with_proc_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_file = path.into();
        self
    }

    /// Look for device nodes in `dir`
    pub fn with_dev_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dev_dir = dir.into();
        self
    }
}

/// Legacy MTD information source
///
/// Every query reads the listing and the device nodes afresh; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct LegacyMtd<S = LinuxSystem> {
    pub(crate) system: S,
    dev_dir: PathBuf,
}

impl LegacyMtd<LinuxSystem> {
    /// Query the running kernel
    pub fn new(config: &LegacyMtdConfig) -> Self {
        Self::with_system(LinuxSystem::new(&config.proc_file), &config.dev_dir)
    }
}

impl<S: System> LegacyMtd<S> {
    /// Query an arbitrary system
    pub fn with_system(system: S, dev_dir: impl Into<PathBuf>) -> Self {
        Self {
            system,
            dev_dir: dev_dir.into(),
        }
    }

    /// Path of the listing
    pub fn proc_file(&self) -> &Path {
        self.system.listing_path()
    }

    /// Conventional node path of device `mtd_num`
    pub fn node_path(&self, mtd_num: u32) -> PathBuf {
        self.dev_dir.join(format!("mtd{}", mtd_num))
    }

    /// Check whether the legacy interface can be used at all
    ///
    /// A missing listing just means "no legacy MTD support" and is not
    /// reported; any other access failure is logged.
    pub fn is_legacy_mode_available(&self) -> bool {
        match self.system.check_listing() {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                error!("cannot read \"{}\": {}", self.proc_file().display(), e);
                false
            }
        }
    }
}
