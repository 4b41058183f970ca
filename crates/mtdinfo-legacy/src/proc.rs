//! `/proc/mtd` scanner
//!
//! The listing looks like this:
//!
//! ```text
//! dev:    size   erasesize  name
//! mtd0: 00100000 00020000 "rootfs"
//! mtd1: 00400000 00020000 "data"
//! ```
//!
//! It is read once, in a single `read`, into a bounded buffer and then parsed
//! line by line. Every line must match exactly; there is no attempt to skip
//! over garbage and resynchronize, so the first bad line ends the scan.
//! All offsets are checked against the number of bytes actually read.

use crate::error::{LegacyMtdError, Result};
use crate::sys::System;
use crate::types::{MtdName, MTD_NAME_MAX, MTD_NUM_MAX};
use log::trace;
use std::io::{ErrorKind, Read};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// First line of `/proc/mtd`
pub const PROC_MTD_FIRST: &str = "dev:    size   erasesize  name\n";

/// Maximum number of bytes read from `/proc/mtd`
pub const PROC_MTD_MAX_LEN: usize = 4096;

/// One device line of the listing
///
/// The name borrows from the scan buffer, so a record cannot outlive the
/// scan that produced it. Copy what you need to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRecord<'a> {
    /// Device number
    pub mtd_num: u32,
    /// Device size in bytes
    pub size: u64,
    /// Eraseblock size in bytes
    pub eb_size: u32,
    /// Device name, at most [`MTD_NAME_MAX`] bytes
    pub name: &'a str,
}

impl ScanRecord<'_> {
    /// Copy the name out of the scan buffer
    pub fn to_name(&self) -> MtdName {
        let mut name = MtdName::new();
        // Names are checked against MTD_NAME_MAX while parsing
        let _ = name.push_str(self.name);
        name
    }
}

/// A validated line, expressed as offsets into the scan buffer
struct Line {
    mtd_num: u32,
    size: u64,
    eb_size: u32,
    name: Range<usize>,
    next: usize,
}

/// An in-progress scan of the listing
#[derive(Debug)]
pub struct ProcScan {
    path: PathBuf,
    /// Listing contents; `None` once the scan has ended
    buf: Option<Vec<u8>>,
    /// Offset of the next unparsed byte
    next: usize,
}

impl ProcScan {
    /// Open the listing of `system` and check its header
    pub fn start<S: System>(system: &S) -> Result<Self> {
        let path = system.listing_path().to_path_buf();
        let mut listing = system
            .open_listing()
            .map_err(|source| LegacyMtdError::ListingUnavailable {
                path: path.clone(),
                source,
            })?;

        let mut buf = vec![0u8; PROC_MTD_MAX_LEN];
        let len = loop {
            match listing.read(&mut buf) {
                Ok(len) => break len,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(LegacyMtdError::ListingRead { path, source }),
            }
        };
        buf.truncate(len);

        Self::from_contents(path, buf)
    }

    /// Start a scan over listing contents that were already read
    ///
    /// Anything past [`PROC_MTD_MAX_LEN`] bytes is ignored, as it would be
    /// when reading the listing.
    pub fn from_contents(path: impl Into<PathBuf>, mut contents: Vec<u8>) -> Result<Self> {
        let path = path.into();
        contents.truncate(PROC_MTD_MAX_LEN);
        if !contents.starts_with(PROC_MTD_FIRST.as_bytes()) {
            return Err(LegacyMtdError::MalformedHeader { path });
        }

        Ok(Self {
            path,
            buf: Some(contents),
            next: PROC_MTD_FIRST.len(),
        })
    }

    /// Path of the listing being scanned
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the next device line
    ///
    /// Returns `Ok(None)` at the end of the listing. After the end, or after
    /// an error, the buffer is released and the scan yields nothing more.
    pub fn next_record(&mut self) -> Result<Option<ScanRecord<'_>>> {
        let data_len = match &self.buf {
            Some(buf) => buf.len(),
            None => return Ok(None),
        };
        if self.next >= data_len {
            self.buf = None;
            return Ok(None);
        }

        let parsed = parse_line(self.buf.as_deref().unwrap_or_default(), self.next);
        let line = match parsed {
            Ok(line) => line,
            Err(e) => {
                self.buf = None;
                return Err(e);
            }
        };
        self.next = line.next;

        let buf = self.buf.as_deref().unwrap_or_default();
        // `parse_line` already checked the name is UTF-8
        let name = std::str::from_utf8(&buf[line.name]).unwrap_or_default();
        Ok(Some(ScanRecord {
            mtd_num: line.mtd_num,
            size: line.size,
            eb_size: line.eb_size,
            name,
        }))
    }
}

/// Validate the line starting at `pos`
fn parse_line(buf: &[u8], pos: usize) -> Result<Line> {
    let (mtd_num, size, eb_size) =
        scan_fields(&buf[pos..]).ok_or(LegacyMtdError::PatternMismatch { offset: pos })?;

    // The search starts at the beginning of the line, not after the fields
    let open = find_quote(buf, pos).ok_or(LegacyMtdError::MissingOpenQuote { mtd_num })?;
    let start = open + 1;
    if start >= buf.len() {
        return Err(LegacyMtdError::MissingOpenQuote { mtd_num });
    }

    let close = find_quote(buf, start).ok_or(LegacyMtdError::MissingCloseQuote { mtd_num })?;

    let len = close - start;
    if len > MTD_NAME_MAX {
        return Err(LegacyMtdError::NameTooLong { mtd_num, len });
    }
    if std::str::from_utf8(&buf[start..close]).is_err() {
        return Err(LegacyMtdError::NameNotUtf8 { mtd_num });
    }

    if buf.get(close + 1) != Some(&b'\n') {
        return Err(LegacyMtdError::MissingTerminator { mtd_num });
    }

    trace!("mtd{}: size {:#x}, eraseblock {:#x}", mtd_num, size, eb_size);

    Ok(Line {
        mtd_num,
        size,
        eb_size,
        name: start..close,
        next: close + 2,
    })
}

/// Offset of the first `"` at or after `from`
fn find_quote(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .iter()
        .position(|&b| b == b'"')
        .map(|i| from + i)
}

/// Match `mtd%d: %llx %x` at the start of `input`
///
/// Follows scanf rules: numeric conversions skip leading whitespace, a
/// space in the pattern matches any amount of whitespace, and hex fields
/// may carry a `0x` prefix.
fn scan_fields(input: &[u8]) -> Option<(u32, u64, u32)> {
    let mut fields = Fields { input, pos: 0 };

    fields.literal(b"mtd")?;
    let mtd_num = fields.decimal()?;
    if mtd_num > u64::from(MTD_NUM_MAX) {
        return None;
    }
    fields.literal(b":")?;
    fields.skip_whitespace();
    let size = fields.hex()?;
    fields.skip_whitespace();
    let eb_size = u32::try_from(fields.hex()?).ok()?;

    Some((mtd_num as u32, size, eb_size))
}

/// Cursor over the start of a listing line
struct Fields<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Fields<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn literal(&mut self, lit: &[u8]) -> Option<()> {
        let end = self.pos.checked_add(lit.len())?;
        if self.input.get(self.pos..end)? != lit {
            return None;
        }
        self.pos = end;
        Some(())
    }

    fn skip_whitespace(&mut self) {
        // C isspace(): space, \t, \n, \v, \f, \r
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')) {
            self.pos += 1;
        }
    }

    fn decimal(&mut self) -> Option<u64> {
        self.skip_whitespace();
        self.digits(10)
    }

    fn hex(&mut self) -> Option<u64> {
        self.skip_whitespace();
        let save = self.pos;
        if self.literal(b"0x").is_some() || self.literal(b"0X").is_some() {
            if let Some(value) = self.digits(16) {
                return Some(value);
            }
            // "0x" with no digits after it: the leading 0 is the number
            self.pos = save;
        }
        self.digits(16)
    }

    fn digits(&mut self, radix: u32) -> Option<u64> {
        let start = self.pos;
        let mut value: u64 = 0;
        while let Some(digit) = self.peek().and_then(|b| (b as char).to_digit(radix)) {
            value = value
                .checked_mul(u64::from(radix))?
                .checked_add(u64::from(digit))?;
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }
}
