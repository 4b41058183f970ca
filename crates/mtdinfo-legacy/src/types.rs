//! Device description types shared by the scanner and the assembler

use bitflags::bitflags;
use core::fmt;
use std::path::PathBuf;

/// Maximum MTD device name length, excluding the terminator
pub const MTD_NAME_MAX: usize = 63;

/// Character device major number of MTD nodes
pub const MTD_DEV_MAJOR: u64 = 90;

/// Largest device number the listing may carry
pub const MTD_NUM_MAX: u32 = i32::MAX as u32;

/// Bounded device name, as held by the kernel
pub type MtdName = heapless::String<MTD_NAME_MAX>;

/// Raw `type` codes reported by MEMGETINFO
mod type_codes {
    pub const MTD_ABSENT: u8 = 0;
    pub const MTD_RAM: u8 = 1;
    pub const MTD_ROM: u8 = 2;
    pub const MTD_NORFLASH: u8 = 3;
    pub const MTD_NANDFLASH: u8 = 4;
    pub const MTD_DATAFLASH: u8 = 6;
    pub const MTD_UBIVOLUME: u8 = 7;
    pub const MTD_MLCNANDFLASH: u8 = 8;
}

bitflags! {
    /// MTD device flags from `mtd-abi.h`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MtdFlags: u32 {
        /// Device is writable
        const WRITEABLE = 0x400;
    }
}

/// Kind of MTD device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MtdType {
    /// RAM-backed device
    Ram,
    /// Read-only memory
    Rom,
    /// NOR flash
    NorFlash,
    /// SLC NAND flash
    NandFlash,
    /// MLC NAND flash
    MlcNandFlash,
    /// Atmel DataFlash
    DataFlash,
    /// UBI volume emulating an MTD device
    UbiVolume,
}

/// Outcome of decoding a raw type code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// A device of a known kind
    Known(MtdType),
    /// Removable media that is not inserted
    Absent,
    /// Code outside the known set
    Unknown(u8),
}

impl MtdType {
    /// Decode a MEMGETINFO type code
    pub fn from_code(code: u8) -> TypeCode {
        use type_codes::*;
        match code {
            MTD_ABSENT => TypeCode::Absent,
            MTD_RAM => TypeCode::Known(Self::Ram),
            MTD_ROM => TypeCode::Known(Self::Rom),
            MTD_NORFLASH => TypeCode::Known(Self::NorFlash),
            MTD_NANDFLASH => TypeCode::Known(Self::NandFlash),
            MTD_MLCNANDFLASH => TypeCode::Known(Self::MlcNandFlash),
            MTD_DATAFLASH => TypeCode::Known(Self::DataFlash),
            MTD_UBIVOLUME => TypeCode::Known(Self::UbiVolume),
            other => TypeCode::Unknown(other),
        }
    }

    /// Raw type code of this kind
    pub fn code(self) -> u8 {
        use type_codes::*;
        match self {
            Self::Ram => MTD_RAM,
            Self::Rom => MTD_ROM,
            Self::NorFlash => MTD_NORFLASH,
            Self::NandFlash => MTD_NANDFLASH,
            Self::MlcNandFlash => MTD_MLCNANDFLASH,
            Self::DataFlash => MTD_DATAFLASH,
            Self::UbiVolume => MTD_UBIVOLUME,
        }
    }

    /// Canonical name, matching the sysfs `type` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ram => "ram",
            Self::Rom => "rom",
            Self::NorFlash => "nor",
            Self::NandFlash => "nand",
            Self::MlcNandFlash => "mlc-nand",
            Self::DataFlash => "dataflash",
            Self::UbiVolume => "ubi",
        }
    }
}

impl fmt::Display for MtdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Population of MTD devices in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSummary {
    /// Number of devices
    pub count: u32,
    /// Lowest device number, `u32::MAX` when there are no devices
    pub lowest: u32,
    /// Highest device number, 0 when there are no devices
    pub highest: u32,
}

impl Default for DeviceSummary {
    fn default() -> Self {
        Self {
            count: 0,
            lowest: u32::MAX,
            highest: 0,
        }
    }
}

impl DeviceSummary {
    /// Fold one more device number into the summary
    pub fn add(&mut self, mtd_num: u32) {
        self.count += 1;
        if mtd_num > self.highest {
            self.highest = mtd_num;
        }
        if mtd_num < self.lowest {
            self.lowest = mtd_num;
        }
    }

    /// Whether no device was seen
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Range of device numbers seen, if any
    pub fn range(&self) -> Option<core::ops::RangeInclusive<u32>> {
        (!self.is_empty()).then(|| self.lowest..=self.highest)
    }
}

/// Everything the control queries tell about a device
///
/// This is the first half of a [`DeviceDescriptor`]: it is built from the
/// device node alone and does not know the device name, which the legacy
/// interface only exposes through `/proc/mtd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceGeometry {
    /// Node the information was read from
    pub node: PathBuf,
    /// Major number of the node
    pub major: u64,
    /// Minor number of the node
    pub minor: u64,
    /// Device number (`minor / 2`)
    pub mtd_num: u32,
    /// Kind of device
    pub mtd_type: MtdType,
    /// Total size in bytes
    pub size: u64,
    /// Eraseblock size in bytes
    pub eb_size: u32,
    /// Number of eraseblocks
    pub eb_cnt: u32,
    /// Minimum input/output unit size
    pub min_io_size: u32,
    /// Sub-page size; the legacy interface does not export it, so this
    /// is always `min_io_size`
    pub subpage_size: u32,
    /// OOB area size per page
    pub oob_size: u32,
    /// OOB bytes available to users, 0 if unknown
    pub oob_avail: u32,
    /// Whether the device can be written
    pub writable: bool,
    /// Whether the device can report bad eraseblocks
    pub bb_allowed: bool,
}

/// Complete description of one MTD device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Information obtained from the device node
    pub geometry: DeviceGeometry,
    /// Device name from the listing
    pub name: MtdName,
}

impl DeviceDescriptor {
    /// Device number
    pub fn mtd_num(&self) -> u32 {
        self.geometry.mtd_num
    }

    /// Canonical type name
    pub fn type_str(&self) -> &'static str {
        self.geometry.mtd_type.as_str()
    }
}
