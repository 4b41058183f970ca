//! Device information command

use super::format_size;
use crate::cli::InfoTarget;
use mtdinfo_legacy::{DeviceDescriptor, LegacyMtd, System};
use std::io::Write;

/// Describe the device(s) selected by `target`
pub fn run_info<S: System>(
    mtd: &LegacyMtd<S>,
    target: &InfoTarget,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    if target.all {
        return run_info_all(mtd, out);
    }

    let desc = if let Some(path) = &target.path {
        mtd.descriptor_by_path(path)?
    } else if let Some(name) = &target.name {
        mtd.descriptor_by_name(name)?
    } else if let Some(mtd_num) = target.mtd_num {
        mtd.descriptor_by_number(mtd_num)?
    } else {
        return Err("No device specified (use a number, --path, --name or --all)".into());
    };

    print_descriptor(&desc, out)?;
    Ok(())
}

/// Describe every device in the listing
fn run_info_all<S: System>(
    mtd: &LegacyMtd<S>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = mtd.list_devices()?;
    if entries.is_empty() {
        writeln!(out, "No MTD devices present")?;
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let desc = mtd.descriptor_by_number(entry.mtd_num)?;
        print_descriptor(&desc, out)?;
    }
    Ok(())
}

/// Print a device description
pub fn print_descriptor(desc: &DeviceDescriptor, out: &mut impl Write) -> std::io::Result<()> {
    let geo = &desc.geometry;

    writeln!(out, "mtd{}", geo.mtd_num)?;
    writeln!(out, "Name:                           {}", desc.name)?;
    writeln!(out, "Type:                           {}", geo.mtd_type)?;
    writeln!(
        out,
        "Eraseblock size:                {} bytes, {}",
        geo.eb_size,
        format_size(u64::from(geo.eb_size))
    )?;
    writeln!(
        out,
        "Amount of eraseblocks:          {} ({} bytes, {})",
        geo.eb_cnt,
        geo.size,
        format_size(geo.size)
    )?;
    writeln!(out, "Minimum input/output unit size: {} bytes", geo.min_io_size)?;
    writeln!(out, "Sub-page size:                  {} bytes", geo.subpage_size)?;
    writeln!(out, "OOB size:                       {} bytes", geo.oob_size)?;
    writeln!(out, "OOB available:                  {} bytes", geo.oob_avail)?;
    writeln!(
        out,
        "Character device major/minor:   {}:{}",
        geo.major, geo.minor
    )?;
    writeln!(
        out,
        "Bad blocks are allowed:         {}",
        if geo.bb_allowed { "true" } else { "false" }
    )?;
    writeln!(
        out,
        "Device is writable:             {}",
        if geo.writable { "true" } else { "false" }
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtdinfo_legacy::dummy::{DummyNode, DummySystem};
    use mtdinfo_legacy::proc::PROC_MTD_FIRST;
    use mtdinfo_legacy::sys::NodeStat;

    fn mtd() -> LegacyMtd<DummySystem> {
        LegacyMtd::with_system(
            DummySystem::new(format!(
                "{PROC_MTD_FIRST}mtd0: 00100000 00020000 \"rootfs\"\n\
                 mtd2: 00800000 00020000 \"data\"\n"
            ))
            .with_node("/dev/mtd0", DummyNode::nand(0, 0x100000, 0x20000, 2048))
            .with_node("/dev/mtd2", DummyNode::nand(2, 0x800000, 0x20000, 2048)),
            "/dev",
        )
    }

    fn target() -> InfoTarget {
        InfoTarget {
            mtd_num: None,
            path: None,
            name: None,
            all: false,
        }
    }

    fn run(target: &InfoTarget) -> String {
        let mut out = Vec::new();
        run_info(&mtd(), target, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_info_by_number() {
        let out = run(&InfoTarget {
            mtd_num: Some(0),
            ..target()
        });
        assert!(out.starts_with("mtd0\n"));
        assert!(out.contains("Name:                           rootfs"));
        assert!(out.contains("Type:                           nand"));
        assert!(out.contains("Amount of eraseblocks:          8 (1048576 bytes, 1.0 MiB)"));
        assert!(out.contains("Character device major/minor:   90:0"));
    }

    #[test]
    fn test_info_by_name_and_path() {
        let by_name = run(&InfoTarget {
            name: Some("data".to_string()),
            ..target()
        });
        let by_path = run(&InfoTarget {
            path: Some("/dev/mtd2".into()),
            ..target()
        });
        assert_eq!(by_name, by_path);
        assert!(by_name.starts_with("mtd2\n"));
    }

    #[test]
    fn test_info_all_skips_missing_numbers() {
        let out = run(&InfoTarget {
            all: true,
            ..target()
        });
        assert!(out.contains("mtd0\n"));
        assert!(out.contains("mtd2\n"));
        assert!(!out.contains("mtd1\n"));
    }

    #[test]
    fn test_info_all_far_apart_numbers() {
        let mtd = LegacyMtd::with_system(
            DummySystem::new(format!(
                "{PROC_MTD_FIRST}mtd0: 00100000 00020000 \"low\"\n\
                 mtd2147483647: 00100000 00020000 \"high\"\n"
            ))
            .with_node("/dev/mtd0", DummyNode::nand(0, 0x100000, 0x20000, 2048))
            .with_node(
                "/dev/mtd2147483647",
                DummyNode::nand(0, 0x100000, 0x20000, 2048).with_stat(NodeStat {
                    is_char_device: true,
                    major: 90,
                    minor: 2 * 2147483647,
                }),
            ),
            "/dev",
        );
        let mut out = Vec::new();
        run_info(
            &mtd,
            &InfoTarget {
                all: true,
                ..target()
            },
            &mut out,
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Name:                           low"));
        assert!(out.contains("Name:                           high"));
        assert_eq!(out.matches("\nName:").count(), 2);
    }

    #[test]
    fn test_info_all_empty() {
        let mtd = LegacyMtd::with_system(DummySystem::new(PROC_MTD_FIRST), "/dev");
        let mut out = Vec::new();
        run_info(
            &mtd,
            &InfoTarget {
                all: true,
                ..target()
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No MTD devices present\n");
    }

    #[test]
    fn test_info_unknown_name() {
        let mut out = Vec::new();
        let err = run_info(
            &mtd(),
            &InfoTarget {
                name: Some("kernel".to_string()),
                ..target()
            },
            &mut out,
        )
        .unwrap_err();
        assert!(err.to_string().contains("kernel"));
    }
}
