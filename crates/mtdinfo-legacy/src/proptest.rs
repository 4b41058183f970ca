//! Property-based tests for listing scans
//!
//! Random well-formed listings are rendered in the kernel's format and fed
//! through the enumeration queries.
//!
//! # Properties
//!
//! 1. **Summary**: count, lowest and highest match a fold over the lines
//! 2. **Existence**: `device_exists(n)` holds exactly for numbers in the listing
//! 3. **Name bound**: names over 63 bytes are rejected, never truncated

#![cfg(test)]

use proptest::prelude::*;

use crate::dummy::DummySystem;
use crate::error::LegacyMtdError;
use crate::legacy::LegacyMtd;
use crate::proc::{ProcScan, PROC_MTD_FIRST};
use crate::types::{MTD_NAME_MAX, MTD_NUM_MAX};

/// One listing line: number, size, eraseblock size, name
type Line = (u32, u64, u32, String);

fn line_strategy() -> impl Strategy<Value = Line> {
    (
        0..=MTD_NUM_MAX,
        any::<u64>(),
        any::<u32>(),
        "[a-zA-Z0-9_. -]{0,63}",
    )
}

/// Up to 20 lines stays well under the 4096-byte read limit
fn listing_strategy() -> impl Strategy<Value = Vec<Line>> {
    prop::collection::vec(line_strategy(), 0..20)
}

fn render(lines: &[Line]) -> String {
    let mut out = String::from(PROC_MTD_FIRST);
    for (num, size, eb_size, name) in lines {
        out.push_str(&format!("mtd{num}: {size:08x} {eb_size:08x} \"{name}\"\n"));
    }
    out
}

fn mtd(lines: &[Line]) -> LegacyMtd<DummySystem> {
    LegacyMtd::with_system(DummySystem::new(render(lines)), "/dev")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_summary_matches_fold(lines in listing_strategy()) {
        let summary = mtd(&lines).population_summary().unwrap();

        prop_assert_eq!(summary.count as usize, lines.len());
        let nums = lines.iter().map(|l| l.0);
        prop_assert_eq!(summary.lowest, nums.clone().min().unwrap_or(u32::MAX));
        prop_assert_eq!(summary.highest, nums.max().unwrap_or(0));
    }

    #[test]
    fn prop_exists_iff_listed(lines in listing_strategy(), other in 0..=MTD_NUM_MAX) {
        let mtd = mtd(&lines);

        for line in &lines {
            prop_assert!(mtd.device_exists(line.0).unwrap());
        }
        let listed = lines.iter().any(|l| l.0 == other);
        prop_assert_eq!(mtd.device_exists(other).unwrap(), listed);
    }

    #[test]
    fn prop_records_match_lines(lines in listing_strategy()) {
        let entries = mtd(&lines).list_devices().unwrap();

        prop_assert_eq!(entries.len(), lines.len());
        for (entry, (num, size, eb_size, name)) in entries.iter().zip(&lines) {
            prop_assert_eq!(entry.mtd_num, *num);
            prop_assert_eq!(entry.size, *size);
            prop_assert_eq!(entry.eb_size, *eb_size);
            prop_assert_eq!(entry.name.as_str(), name.as_str());
        }
    }

    #[test]
    fn prop_long_name_rejected(
        before in prop::collection::vec(line_strategy(), 0..5),
        num in 0..=MTD_NUM_MAX,
        name in "[a-z]{64,200}",
    ) {
        let mut lines = before.clone();
        lines.push((num, 0x100000, 0x20000, name.clone()));
        let mut scan =
            ProcScan::from_contents("/proc/mtd", render(&lines).into_bytes()).unwrap();

        for _ in &before {
            prop_assert!(scan.next_record().unwrap().is_some());
        }
        match scan.next_record() {
            Err(LegacyMtdError::NameTooLong { mtd_num, len }) => {
                prop_assert_eq!(mtd_num, num);
                prop_assert_eq!(len, name.len());
                prop_assert!(len > MTD_NAME_MAX);
            }
            other => prop_assert!(false, "expected NameTooLong, got {:?}", other),
        }
    }
}
