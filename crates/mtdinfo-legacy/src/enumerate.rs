//! Device population queries

use crate::error::Result;
use crate::legacy::LegacyMtd;
use crate::proc::ProcScan;
use crate::sys::System;
use crate::types::{DeviceSummary, MtdName};

/// Owned copy of one listing line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Device number
    pub mtd_num: u32,
    /// Device size in bytes
    pub size: u64,
    /// Eraseblock size in bytes
    pub eb_size: u32,
    /// Device name
    pub name: MtdName,
}

impl<S: System> LegacyMtd<S> {
    /// Whether the listing has a line for device `mtd_num`
    pub fn device_exists(&self, mtd_num: u32) -> Result<bool> {
        let mut scan = ProcScan::start(&self.system)?;
        while let Some(rec) = scan.next_record()? {
            if rec.mtd_num == mtd_num {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Count the devices and find the lowest and highest device numbers
    pub fn population_summary(&self) -> Result<DeviceSummary> {
        let mut scan = ProcScan::start(&self.system)?;
        let mut summary = DeviceSummary::default();
        while let Some(rec) = scan.next_record()? {
            summary.add(rec.mtd_num);
        }
        Ok(summary)
    }

    /// Copy out every line of the listing
    pub fn list_devices(&self) -> Result<Vec<ListingEntry>> {
        let mut scan = ProcScan::start(&self.system)?;
        let mut entries = Vec::new();
        while let Some(rec) = scan.next_record()? {
            entries.push(ListingEntry {
                mtd_num: rec.mtd_num,
                size: rec.size,
                eb_size: rec.eb_size,
                name: rec.to_name(),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummySystem;
    use crate::error::{ErrorKind, LegacyMtdError};
    use crate::proc::PROC_MTD_FIRST;

    fn mtd(body: &str) -> LegacyMtd<DummySystem> {
        LegacyMtd::with_system(DummySystem::new(format!("{PROC_MTD_FIRST}{body}")), "/dev")
    }

    #[test]
    fn test_single_device() {
        let mtd = mtd("mtd0: 00100000 00020000 \"rootfs\"\n");

        let summary = mtd.population_summary().unwrap();
        assert_eq!(
            summary,
            DeviceSummary {
                count: 1,
                lowest: 0,
                highest: 0
            }
        );
        assert!(mtd.device_exists(0).unwrap());
        assert!(!mtd.device_exists(1).unwrap());
    }

    #[test]
    fn test_empty_listing() {
        let mtd = mtd("");
        let summary = mtd.population_summary().unwrap();
        assert_eq!(summary.count, 0);
        assert!(summary.is_empty());
        assert!(!mtd.device_exists(0).unwrap());
        assert!(mtd.list_devices().unwrap().is_empty());
    }

    #[test]
    fn test_sparse_numbers() {
        let mtd = mtd(
            "mtd4: 00100000 00020000 \"a\"\n\
             mtd2: 00100000 00020000 \"b\"\n\
             mtd9: 00100000 00020000 \"c\"\n",
        );

        let summary = mtd.population_summary().unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.lowest, 2);
        assert_eq!(summary.highest, 9);

        for num in 0..12 {
            assert_eq!(mtd.device_exists(num).unwrap(), [2, 4, 9].contains(&num));
        }
    }

    #[test]
    fn test_list_devices() {
        let mtd = mtd(
            "mtd0: 00040000 00010000 \"u-boot\"\n\
             mtd1: 00fc0000 00010000 \"rootfs\"\n",
        );
        let entries = mtd.list_devices().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].mtd_num, 1);
        assert_eq!(entries[1].size, 0xfc0000);
        assert_eq!(entries[1].eb_size, 0x10000);
        assert_eq!(entries[1].name.as_str(), "rootfs");
    }

    #[test]
    fn test_errors_propagate() {
        let mtd = mtd(
            "mtd0: 00100000 00020000 \"ok\"\n\
             mtd1: 00100000 00020000 \"broken\n",
        );
        assert_eq!(mtd.population_summary().unwrap_err().kind(), ErrorKind::Malformed);
        // The match comes before the broken line
        assert!(mtd.device_exists(0).unwrap());
        assert!(matches!(
            mtd.device_exists(5),
            Err(LegacyMtdError::MissingCloseQuote { mtd_num: 1 })
        ));

        let none = LegacyMtd::with_system(DummySystem::without_listing(), "/dev");
        assert_eq!(none.device_exists(0).unwrap_err().kind(), ErrorKind::Unavailable);
    }
}
