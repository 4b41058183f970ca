//! OOB availability probe
//!
//! ECCGETLAYOUT is optional: NOR and RAM devices, and many NAND drivers,
//! simply do not implement it. "Not supported" is therefore an answer,
//! not a failure.

use crate::error::{LegacyMtdError, Result};
use crate::legacy::LegacyMtd;
use crate::sys::{is_unsupported, ControlNode, System};
use log::debug;
use std::path::Path;

impl<S: System> LegacyMtd<S> {
    /// Number of OOB bytes available to users on the device at `node`
    ///
    /// Returns `Ok(None)` if the device does not report an ECC layout.
    pub fn oob_avail(&self, node: &Path) -> Result<Option<u32>> {
        let dev = self
            .system
            .open_node(node)
            .map_err(|source| LegacyMtdError::OpenFailed {
                node: node.to_path_buf(),
                source,
            })?;

        let stat = dev.stat().map_err(|source| LegacyMtdError::StatFailed {
            node: node.to_path_buf(),
            source,
        })?;
        if !stat.is_char_device {
            return Err(LegacyMtdError::NotACharDevice {
                node: node.to_path_buf(),
            });
        }

        match dev.ecc_get_layout() {
            Ok(layout) => Ok(Some(layout.oobavail)),
            Err(errno) if is_unsupported(errno) => {
                debug!("{}: ECCGETLAYOUT not supported", node.display());
                Ok(None)
            }
            Err(source) => Err(LegacyMtdError::EccLayoutQueryFailed {
                node: node.to_path_buf(),
                source,
            }),
        }
    }

    /// [`oob_avail`](Self::oob_avail) for device number `mtd_num`
    pub fn oob_avail_by_number(&self, mtd_num: u32) -> Result<Option<u32>> {
        self.oob_avail(&self.node_path(mtd_num))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyNode, DummySystem};
    use crate::proc::PROC_MTD_FIRST;
    use crate::sys::{NandEccLayoutUser, NodeStat};
    use nix::errno::Errno;

    fn mtd_with(node: DummyNode) -> LegacyMtd<DummySystem> {
        LegacyMtd::with_system(
            DummySystem::new(PROC_MTD_FIRST).with_node("/dev/mtd0", node),
            "/dev",
        )
    }

    #[test]
    fn test_oob_avail() {
        let node = DummyNode::nand(0, 0x100000, 0x20000, 2048)
            .with_ecc_layout(Ok(NandEccLayoutUser::with_oobavail(24)));
        assert_eq!(mtd_with(node).oob_avail_by_number(0).unwrap(), Some(24));
    }

    #[test]
    fn test_unsupported_is_not_an_error() {
        let node = DummyNode::nand(0, 0x100000, 0x20000, 2048).with_ecc_layout(Err(Errno::EOPNOTSUPP));
        assert_eq!(mtd_with(node).oob_avail_by_number(0).unwrap(), None);
    }

    #[test]
    fn test_other_ioctl_failure() {
        let node = DummyNode::nand(0, 0x100000, 0x20000, 2048).with_ecc_layout(Err(Errno::EIO));
        assert!(matches!(
            mtd_with(node).oob_avail_by_number(0),
            Err(LegacyMtdError::EccLayoutQueryFailed {
                source: Errno::EIO,
                ..
            })
        ));
    }

    #[test]
    fn test_not_a_char_device() {
        let node = DummyNode::nand(0, 0x100000, 0x20000, 2048).with_stat(NodeStat {
            is_char_device: false,
            major: 0,
            minor: 0,
        });
        assert!(matches!(
            mtd_with(node).oob_avail(Path::new("/dev/mtd0")),
            Err(LegacyMtdError::NotACharDevice { .. })
        ));
    }

    #[test]
    fn test_missing_node() {
        let mtd = LegacyMtd::with_system(DummySystem::new(PROC_MTD_FIRST), "/dev");
        assert!(matches!(
            mtd.oob_avail_by_number(7),
            Err(LegacyMtdError::OpenFailed { .. })
        ));
    }
}
