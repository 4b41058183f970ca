//! In-memory MTD system for testing
//!
//! `DummySystem` serves a listing from memory and answers control queries
//! from per-node canned responses, so every code path of the library can be
//! driven without a kernel.

use crate::sys::{ControlNode, MtdInfoUser, NandEccLayoutUser, NodeStat, System};
use crate::types::{MtdFlags, MtdType, MTD_DEV_MAJOR};
use nix::errno::Errno;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

/// Canned answers for one device node
#[derive(Debug, Clone)]
pub struct DummyNode {
    /// Result of stat
    pub stat: NodeStat,
    /// Result of MEMGETINFO
    pub info: Result<MtdInfoUser, Errno>,
    /// Result of MEMGETBADBLOCK
    pub bad_block: Result<bool, Errno>,
    /// Result of ECCGETLAYOUT
    pub ecc_layout: Result<NandEccLayoutUser, Errno>,
}

impl DummyNode {
    /// A healthy writable NAND node for device `mtd_num`
    pub fn nand(mtd_num: u32, size: u32, erasesize: u32, writesize: u32) -> Self {
        Self {
            stat: NodeStat {
                is_char_device: true,
                major: MTD_DEV_MAJOR,
                minor: u64::from(mtd_num) * 2,
            },
            info: Ok(MtdInfoUser::new(
                MtdType::NandFlash.code(),
                MtdFlags::WRITEABLE.bits(),
                size,
                erasesize,
                writesize,
                64,
            )),
            bad_block: Ok(false),
            ecc_layout: Ok(NandEccLayoutUser::with_oobavail(38)),
        }
    }

    /// Replace the MEMGETINFO answer
    pub fn with_info(mut self, info: Result<MtdInfoUser, Errno>) -> Self {
        self.info = info;
        self
    }

    /// Replace the MEMGETBADBLOCK answer
    pub fn with_bad_block(mut self, bad_block: Result<bool, Errno>) -> Self {
        self.bad_block = bad_block;
        self
    }

    /// Replace the ECCGETLAYOUT answer
    pub fn with_ecc_layout(mut self, ecc_layout: Result<NandEccLayoutUser, Errno>) -> Self {
        self.ecc_layout = ecc_layout;
        self
    }

    /// Replace the stat answer
    pub fn with_stat(mut self, stat: NodeStat) -> Self {
        self.stat = stat;
        self
    }
}

impl ControlNode for DummyNode {
    fn stat(&self) -> io::Result<NodeStat> {
        Ok(self.stat)
    }

    fn mem_get_info(&self) -> nix::Result<MtdInfoUser> {
        self.info
    }

    fn mem_get_bad_block(&self, _offset: libc::loff_t) -> nix::Result<bool> {
        self.bad_block
    }

    fn ecc_get_layout(&self) -> nix::Result<NandEccLayoutUser> {
        self.ecc_layout
    }
}

/// In-memory listing plus a set of device nodes
#[derive(Debug, Clone, Default)]
pub struct DummySystem {
    listing_path: PathBuf,
    listing: Option<Vec<u8>>,
    listing_error: Option<io::ErrorKind>,
    nodes: HashMap<PathBuf, DummyNode>,
}

impl DummySystem {
    /// System whose listing has the given contents
    pub fn new(listing: impl Into<Vec<u8>>) -> Self {
        Self {
            listing_path: PathBuf::from("/proc/mtd"),
            listing: Some(listing.into()),
            listing_error: None,
            nodes: HashMap::new(),
        }
    }

    /// System without any listing
    pub fn without_listing() -> Self {
        Self {
            listing_path: PathBuf::from("/proc/mtd"),
            ..Default::default()
        }
    }

    /// Make every access to the listing fail with `kind`
    pub fn with_listing_error(mut self, kind: io::ErrorKind) -> Self {
        self.listing_error = Some(kind);
        self
    }

    /// Add a device node
    pub fn with_node(mut self, path: impl Into<PathBuf>, node: DummyNode) -> Self {
        self.nodes.insert(path.into(), node);
        self
    }
}

impl System for DummySystem {
    type Node = DummyNode;
    type Listing = Cursor<Vec<u8>>;

    fn listing_path(&self) -> &Path {
        &self.listing_path
    }

    fn check_listing(&self) -> io::Result<()> {
        if let Some(kind) = self.listing_error {
            return Err(kind.into());
        }
        match self.listing {
            Some(_) => Ok(()),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    fn open_listing(&self) -> io::Result<Self::Listing> {
        if let Some(kind) = self.listing_error {
            return Err(kind.into());
        }
        match &self.listing {
            Some(data) => Ok(Cursor::new(data.clone())),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    fn open_node(&self, path: &Path) -> io::Result<DummyNode> {
        self.nodes
            .get(path)
            .cloned()
            .ok_or_else(|| io::ErrorKind::NotFound.into())
    }
}
