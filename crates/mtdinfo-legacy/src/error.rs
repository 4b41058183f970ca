//! Error types for legacy MTD operations

use nix::errno::Errno;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`LegacyMtdError`]
///
/// Callers usually only care about which of these buckets a failure falls
/// into. `Unavailable` in particular means "this system has no legacy MTD
/// interface" and is normally treated as a fallback signal, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The listing resource cannot be used at all
    Unavailable,
    /// The listing violates its fixed format
    Malformed,
    /// A device node or control query misbehaved
    DeviceFault,
    /// No record for the requested number or name
    NotFound,
    /// Several records share the requested name
    Ambiguous,
}

/// Legacy MTD errors
#[derive(Debug, Error)]
pub enum LegacyMtdError {
    /// The listing could not be opened
    #[error("cannot open \"{}\": {source}", .path.display())]
    ListingUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The listing was opened but reading it failed
    #[error("cannot read \"{}\": {source}", .path.display())]
    ListingRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The listing does not start with the fixed header line
    #[error("\"{}\" does not start with {:?}", .path.display(), crate::proc::PROC_MTD_FIRST)]
    MalformedHeader { path: PathBuf },

    /// A line does not start with `mtdN: <size> <erasesize>`
    #[error("\"mtd%d: %llx %x\" pattern not found at offset {offset}")]
    PatternMismatch { offset: usize },

    /// No opening quote before the end of the listing
    #[error("opening \" not found for mtd{mtd_num}")]
    MissingOpenQuote { mtd_num: u32 },

    /// No closing quote before the end of the listing
    #[error("closing \" not found for mtd{mtd_num}")]
    MissingCloseQuote { mtd_num: u32 },

    /// Quoted name longer than the maximum name length
    #[error("too long mtd{mtd_num} device name ({len} bytes, max {})", crate::types::MTD_NAME_MAX)]
    NameTooLong { mtd_num: u32, len: usize },

    /// Quoted name is not valid UTF-8
    #[error("mtd{mtd_num} device name is not valid UTF-8")]
    NameNotUtf8 { mtd_num: u32 },

    /// The closing quote is not followed by a newline
    #[error("newline after the name of mtd{mtd_num} not found")]
    MissingTerminator { mtd_num: u32 },

    /// The device node could not be opened
    #[error("cannot open \"{}\": {source}", .node.display())]
    OpenFailed {
        node: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The device node could not be stat'ed
    #[error("cannot stat \"{}\": {source}", .node.display())]
    StatFailed {
        node: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The device node is not a character device
    #[error("\"{}\" is not a character device", .node.display())]
    NotACharDevice { node: PathBuf },

    /// The device node belongs to another driver
    #[error(
        "\"{}\" has major number {major}, MTD devices have major {}",
        .node.display(),
        crate::types::MTD_DEV_MAJOR
    )]
    WrongDeviceClass { node: PathBuf, major: u64 },

    /// MEMGETINFO failed
    #[error("MEMGETINFO ioctl request failed on \"{}\": {source}", .node.display())]
    GeometryQueryFailed {
        node: PathBuf,
        #[source]
        source: Errno,
    },

    /// MEMGETBADBLOCK failed with something other than "not supported"
    #[error("MEMGETBADBLOCK ioctl failed on \"{}\": {source}", .node.display())]
    BadBlockQueryFailed {
        node: PathBuf,
        #[source]
        source: Errno,
    },

    /// ECCGETLAYOUT failed with something other than "not supported"
    #[error("ECCGETLAYOUT ioctl request failed on \"{}\": {source}", .node.display())]
    EccLayoutQueryFailed {
        node: PathBuf,
        #[source]
        source: Errno,
    },

    /// Minimum I/O unit size is zero
    #[error("mtd{mtd_num} ({}) has insane min. I/O unit size {value}", .node.display())]
    InsaneMinIoSize {
        mtd_num: u32,
        node: PathBuf,
        value: u32,
    },

    /// Eraseblock size is zero or smaller than the minimum I/O unit
    #[error("mtd{mtd_num} ({}) has insane eraseblock size {value}", .node.display())]
    InsaneEraseblockSize {
        mtd_num: u32,
        node: PathBuf,
        value: u32,
    },

    /// Device size is zero or smaller than one eraseblock
    #[error("mtd{mtd_num} ({}) has insane size {value}", .node.display())]
    InsaneSize {
        mtd_num: u32,
        node: PathBuf,
        value: u64,
    },

    /// Removable media that is not currently inserted
    #[error("mtd{mtd_num} ({}) is removable and is not present", .node.display())]
    DeviceAbsent { mtd_num: u32, node: PathBuf },

    /// Type code outside the known set
    #[error("mtd{mtd_num} ({}) has unknown device type {code}", .node.display())]
    UnknownDeviceType {
        mtd_num: u32,
        node: PathBuf,
        code: u8,
    },

    /// The device answered control queries but has no listing entry
    #[error("mtd{mtd_num} not found in \"{}\"", .path.display())]
    NameNotFound { mtd_num: u32, path: PathBuf },

    /// No listing entry with the requested name
    #[error("no MTD device named \"{0}\"")]
    DeviceNotFound(String),

    /// Several listing entries with the requested name
    #[error("multiple MTD devices found matching name \"{0}\"")]
    AmbiguousName(String),
}

impl LegacyMtdError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ListingUnavailable { .. } | Self::ListingRead { .. } => ErrorKind::Unavailable,
            Self::MalformedHeader { .. }
            | Self::PatternMismatch { .. }
            | Self::MissingOpenQuote { .. }
            | Self::MissingCloseQuote { .. }
            | Self::NameTooLong { .. }
            | Self::NameNotUtf8 { .. }
            | Self::MissingTerminator { .. } => ErrorKind::Malformed,
            Self::OpenFailed { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            Self::OpenFailed { .. }
            | Self::StatFailed { .. }
            | Self::NotACharDevice { .. }
            | Self::WrongDeviceClass { .. }
            | Self::GeometryQueryFailed { .. }
            | Self::BadBlockQueryFailed { .. }
            | Self::EccLayoutQueryFailed { .. }
            | Self::InsaneMinIoSize { .. }
            | Self::InsaneEraseblockSize { .. }
            | Self::InsaneSize { .. }
            | Self::DeviceAbsent { .. }
            | Self::UnknownDeviceType { .. } => ErrorKind::DeviceFault,
            Self::NameNotFound { .. } | Self::DeviceNotFound(_) => ErrorKind::NotFound,
            Self::AmbiguousName(_) => ErrorKind::Ambiguous,
        }
    }
}

/// Result type for legacy MTD operations
pub type Result<T> = std::result::Result<T, LegacyMtdError>;
