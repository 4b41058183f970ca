//! Access to the kernel: the listing file and MTD character devices
//!
//! Everything the library needs from the operating system goes through the
//! [`System`] and [`ControlNode`] traits. [`LinuxSystem`] is the real
//! implementation; `dummy::DummySystem` stands in for it in tests.

use nix::errno::Errno;
use nix::unistd::AccessFlags;
use std::fs::File;
use std::io::{self, Read};
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// Result of stat'ing a device node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    /// Whether the node is a character device
    pub is_char_device: bool,
    /// Major number of the device the node refers to
    pub major: u64,
    /// Minor number of the device the node refers to
    pub minor: u64,
}

/// MEMGETINFO argument structure
/// Matches struct mtd_info_user from mtd/mtd-abi.h
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MtdInfoUser {
    /// Device type code
    pub type_: u8,
    /// `MTD_*` flags
    pub flags: u32,
    /// Total size of the device
    pub size: u32,
    /// Eraseblock size
    pub erasesize: u32,
    /// Minimum write unit
    pub writesize: u32,
    /// OOB bytes per page
    pub oobsize: u32,
    _padding: u64,
}

impl MtdInfoUser {
    /// Build a MEMGETINFO answer
    pub fn new(type_: u8, flags: u32, size: u32, erasesize: u32, writesize: u32, oobsize: u32) -> Self {
        Self {
            type_,
            flags,
            size,
            erasesize,
            writesize,
            oobsize,
            _padding: 0,
        }
    }
}

/// Free OOB region, struct nand_oobfree
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NandOobFree {
    /// Offset of the region
    pub offset: u32,
    /// Length of the region
    pub length: u32,
}

/// ECCGETLAYOUT argument structure
/// Matches struct nand_ecclayout_user from mtd/mtd-abi.h
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NandEccLayoutUser {
    /// Number of ECC bytes
    pub eccbytes: u32,
    /// ECC byte positions
    pub eccpos: [u32; 64],
    /// OOB bytes available to users
    pub oobavail: u32,
    /// Free OOB regions
    pub oobfree: [NandOobFree; 8],
}

impl Default for NandEccLayoutUser {
    fn default() -> Self {
        Self {
            eccbytes: 0,
            eccpos: [0; 64],
            oobavail: 0,
            oobfree: [NandOobFree::default(); 8],
        }
    }
}

impl NandEccLayoutUser {
    /// Layout reporting only the available OOB bytes
    pub fn with_oobavail(oobavail: u32) -> Self {
        Self {
            oobavail,
            ..Default::default()
        }
    }
}

/// An open MTD character device
///
/// The node is closed when the value is dropped.
pub trait ControlNode {
    /// Stat the open node
    fn stat(&self) -> io::Result<NodeStat>;

    /// MEMGETINFO
    fn mem_get_info(&self) -> nix::Result<MtdInfoUser>;

    /// MEMGETBADBLOCK at `offset`; returns whether the eraseblock is bad
    fn mem_get_bad_block(&self, offset: libc::loff_t) -> nix::Result<bool>;

    /// ECCGETLAYOUT
    fn ecc_get_layout(&self) -> nix::Result<NandEccLayoutUser>;
}

/// Source of the MTD listing and device nodes
pub trait System {
    /// Open device node type
    type Node: ControlNode;
    /// Open listing type
    type Listing: Read;

    /// Path of the listing, used in diagnostics
    fn listing_path(&self) -> &Path;

    /// Check that the listing exists and is readable
    fn check_listing(&self) -> io::Result<()>;

    /// Open the listing for reading
    fn open_listing(&self) -> io::Result<Self::Listing>;

    /// Open a device node read-only
    fn open_node(&self, path: &Path) -> io::Result<Self::Node>;
}

/// MTD ioctl definitions
mod ioctl {
    use super::{MtdInfoUser, NandEccLayoutUser};

    // MEMGETINFO = _IOR('M', 1, struct mtd_info_user)
    nix::ioctl_read!(memgetinfo, b'M', 1, MtdInfoUser);
    // MEMGETBADBLOCK = _IOW('M', 11, __kernel_loff_t)
    nix::ioctl_write_ptr!(memgetbadblock, b'M', 11, libc::loff_t);
    // ECCGETLAYOUT = _IOR('M', 17, struct nand_ecclayout_user)
    nix::ioctl_read!(eccgetlayout, b'M', 17, NandEccLayoutUser);
}

/// Real MTD device node
#[derive(Debug)]
pub struct LinuxNode {
    file: File,
}

impl ControlNode for LinuxNode {
    fn stat(&self) -> io::Result<NodeStat> {
        let meta = self.file.metadata()?;
        let rdev = meta.rdev();
        Ok(NodeStat {
            is_char_device: meta.file_type().is_char_device(),
            major: nix::sys::stat::major(rdev),
            minor: nix::sys::stat::minor(rdev),
        })
    }

    fn mem_get_info(&self) -> nix::Result<MtdInfoUser> {
        let mut info = MtdInfoUser::default();
        // SAFETY: valid open descriptor, `info` matches the kernel layout
        unsafe { ioctl::memgetinfo(self.file.as_raw_fd(), &mut info) }?;
        Ok(info)
    }

    fn mem_get_bad_block(&self, offset: libc::loff_t) -> nix::Result<bool> {
        // SAFETY: valid open descriptor, the kernel only reads `offset`
        let ret = unsafe { ioctl::memgetbadblock(self.file.as_raw_fd(), &offset) }?;
        Ok(ret > 0)
    }

    fn ecc_get_layout(&self) -> nix::Result<NandEccLayoutUser> {
        let mut layout = NandEccLayoutUser::default();
        // SAFETY: valid open descriptor, `layout` matches the kernel layout
        unsafe { ioctl::eccgetlayout(self.file.as_raw_fd(), &mut layout) }?;
        Ok(layout)
    }
}

/// The running kernel: `/proc/mtd` and `/dev/mtdN`
#[derive(Debug, Clone)]
pub struct LinuxSystem {
    proc_file: PathBuf,
}

impl LinuxSystem {
    /// Use the listing at `proc_file`
    pub fn new(proc_file: impl Into<PathBuf>) -> Self {
        Self {
            proc_file: proc_file.into(),
        }
    }
}

impl System for LinuxSystem {
    type Node = LinuxNode;
    type Listing = File;

    fn listing_path(&self) -> &Path {
        &self.proc_file
    }

    fn check_listing(&self) -> io::Result<()> {
        nix::unistd::access(&self.proc_file, AccessFlags::R_OK).map_err(io::Error::from)
    }

    fn open_listing(&self) -> io::Result<File> {
        File::open(&self.proc_file)
    }

    fn open_node(&self, path: &Path) -> io::Result<LinuxNode> {
        Ok(LinuxNode {
            file: File::open(path)?,
        })
    }
}

/// Whether a control-query error means "this device does not do that"
pub(crate) fn is_unsupported(errno: Errno) -> bool {
    errno == Errno::EOPNOTSUPP
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_abi_sizes() {
        assert_eq!(std::mem::size_of::<MtdInfoUser>(), 32);
        assert_eq!(std::mem::size_of::<NandEccLayoutUser>(), 328);
    }

    #[test]
    fn test_linux_listing_roundtrip() {
        let path = std::env::temp_dir().join(format!("mtdinfo-legacy-{}.txt", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(b"dev:    size   erasesize  name\n").unwrap();
        drop(file);

        let system = LinuxSystem::new(&path);
        assert!(system.check_listing().is_ok());
        let mut contents = String::new();
        system
            .open_listing()
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "dev:    size   erasesize  name\n");

        std::fs::remove_file(&path).unwrap();
        let err = system.check_listing().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_regular_file_is_not_char_device() {
        let path = std::env::temp_dir().join(format!("mtdinfo-node-{}", std::process::id()));
        File::create(&path).unwrap();

        let node = LinuxSystem::new("/proc/mtd").open_node(&path).unwrap();
        let stat = node.stat().unwrap();
        assert!(!stat.is_char_device);

        std::fs::remove_file(&path).unwrap();
    }
}
