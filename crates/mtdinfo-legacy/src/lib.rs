//! mtdinfo-legacy - MTD device information for pre-sysfs kernels
//!
//! Kernels older than 2.6.30 have no `/sys/class/mtd`, so nothing describes
//! an MTD device in one place. This crate rebuilds a full description from
//! the two partial sources those kernels do offer:
//!
//! - `/proc/mtd`, one line per device with its number, size, eraseblock size
//!   and name
//! - ioctls on the `/dev/mtdN` character device (MEMGETINFO,
//!   MEMGETBADBLOCK, ECCGETLAYOUT), which give the geometry and type but not
//!   the name
//!
//! # Example
//!
//! ```ignore
//! use mtdinfo_legacy::{LegacyMtd, LegacyMtdConfig};
//!
//! let mtd = LegacyMtd::new(&LegacyMtdConfig::default());
//! if !mtd.is_legacy_mode_available() {
//!     return Ok(());
//! }
//!
//! let summary = mtd.population_summary()?;
//! println!("{} MTD devices", summary.count);
//!
//! let desc = mtd.descriptor_by_number(0)?;
//! println!("mtd0 is \"{}\", {} eraseblocks", desc.name, desc.geometry.eb_cnt);
//! ```
//!
//! # Listing format
//!
//! ```text
//! dev:    size   erasesize  name
//! mtd0: 00100000 00020000 "rootfs"
//! ```
//!
//! The listing is read once per query, at most 4096 bytes, and must match
//! this format exactly; see [`proc`].
//!
//! # Device nodes
//!
//! MTD nodes are character devices with major 90. Device N owns minors 2N
//! (read-write) and 2N+1 (read-only). Legacy kernels do not create nodes
//! dynamically, so `/dev/mtdN` must already exist.

pub mod device;
#[cfg(any(test, feature = "dummy"))]
pub mod dummy;
pub mod enumerate;
pub mod error;
pub mod legacy;
pub mod probe;
pub mod proc;
pub mod sys;
pub mod types;

#[cfg(test)]
mod proptest;

// Re-exports
pub use enumerate::ListingEntry;
pub use error::{ErrorKind, LegacyMtdError, Result};
pub use legacy::{LegacyMtd, LegacyMtdConfig};
pub use proc::{ProcScan, ScanRecord};
pub use sys::{ControlNode, LinuxSystem, System};
pub use types::{DeviceDescriptor, DeviceGeometry, DeviceSummary, MtdFlags, MtdName, MtdType};

