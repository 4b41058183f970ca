//! MTD device description without sysfs
//!
//! Old kernels (before 2.6.30) have no `/sys/class/mtd`. The geometry of a
//! device is available from MEMGETINFO on its character device, but its name
//! is only published in `/proc/mtd`. A description is therefore built in two
//! steps: [`LegacyMtd::geometry`] talks to the node, then the listing is
//! scanned for the matching line to recover the name.

use crate::error::{LegacyMtdError, Result};
use crate::legacy::LegacyMtd;
use crate::proc::ProcScan;
use crate::sys::{is_unsupported, ControlNode, System};
use crate::types::{
    DeviceDescriptor, DeviceGeometry, MtdFlags, MtdType, TypeCode, MTD_DEV_MAJOR,
};
use log::{debug, warn};
use std::io;
use std::path::Path;

impl<S: System> LegacyMtd<S> {
    /// Describe the device behind `node`
    pub fn descriptor_by_path(&self, node: &Path) -> Result<DeviceDescriptor> {
        let geometry = self.geometry(node)?;
        self.resolve_name(geometry)
    }

    /// Describe device `mtd_num`, using its conventional node path
    pub fn descriptor_by_number(&self, mtd_num: u32) -> Result<DeviceDescriptor> {
        self.descriptor_by_path(&self.node_path(mtd_num))
    }

    /// Describe the device called `name`
    ///
    /// The name has to be unique in the listing; legacy naming offers no way
    /// to tell two devices with the same name apart.
    pub fn descriptor_by_name(&self, name: &str) -> Result<DeviceDescriptor> {
        let mut scan = ProcScan::start(&self.system)?;
        let mut found = None;
        while let Some(rec) = scan.next_record()? {
            if rec.name != name {
                continue;
            }
            if found.is_some() {
                return Err(LegacyMtdError::AmbiguousName(name.to_string()));
            }
            found = Some(rec.mtd_num);
        }

        let mtd_num = found.ok_or_else(|| LegacyMtdError::DeviceNotFound(name.to_string()))?;
        debug!("\"{}\" is mtd{}", name, mtd_num);
        self.descriptor_by_number(mtd_num)
    }

    /// Read everything the device node can tell about the device
    ///
    /// The node is opened, queried and closed again before this returns,
    /// on success and on every error path.
    pub fn geometry(&self, node: &Path) -> Result<DeviceGeometry> {
        let mut geometry = {
            let dev = self.system.open_node(node).map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    warn!(
                        "MTD subsystem is old and does not support sysfs, \
                         so MTD character device nodes have to exist"
                    );
                }
                LegacyMtdError::OpenFailed {
                    node: node.to_path_buf(),
                    source,
                }
            })?;
            query_node(&dev, node)?
        };

        // Secondary information: failures only cost the OOB figure
        geometry.oob_avail = match self.oob_avail(node) {
            Ok(avail) => avail.unwrap_or(0),
            Err(e) => {
                debug!("mtd{}: no OOB layout: {}", geometry.mtd_num, e);
                0
            }
        };

        Ok(geometry)
    }

    /// Attach the listing name to `geometry`
    ///
    /// This rescans the whole listing; it is the only place the name exists.
    pub fn resolve_name(&self, geometry: DeviceGeometry) -> Result<DeviceDescriptor> {
        let mut scan = ProcScan::start(&self.system)?;
        while let Some(rec) = scan.next_record()? {
            if rec.mtd_num == geometry.mtd_num {
                let name = rec.to_name();
                return Ok(DeviceDescriptor { geometry, name });
            }
        }

        Err(LegacyMtdError::NameNotFound {
            mtd_num: geometry.mtd_num,
            path: self.proc_file().to_path_buf(),
        })
    }
}

/// Query and validate an open device node
fn query_node<N: ControlNode>(dev: &N, node: &Path) -> Result<DeviceGeometry> {
    let stat = dev.stat().map_err(|source| LegacyMtdError::StatFailed {
        node: node.to_path_buf(),
        source,
    })?;
    if !stat.is_char_device {
        return Err(LegacyMtdError::NotACharDevice {
            node: node.to_path_buf(),
        });
    }
    if stat.major != MTD_DEV_MAJOR {
        return Err(LegacyMtdError::WrongDeviceClass {
            node: node.to_path_buf(),
            major: stat.major,
        });
    }

    // Each MTD device has two nodes: mtdN (minor 2N) and mtdNro (minor 2N+1)
    let mtd_num = u32::try_from(stat.minor / 2).unwrap_or(u32::MAX);

    let ui = dev
        .mem_get_info()
        .map_err(|source| LegacyMtdError::GeometryQueryFailed {
            node: node.to_path_buf(),
            source,
        })?;

    let bb_allowed = match dev.mem_get_bad_block(0) {
        Ok(_) => true,
        Err(errno) if is_unsupported(errno) => false,
        Err(source) => {
            return Err(LegacyMtdError::BadBlockQueryFailed {
                node: node.to_path_buf(),
                source,
            })
        }
    };

    let size = u64::from(ui.size);
    let eb_size = ui.erasesize;
    let min_io_size = ui.writesize;

    if min_io_size == 0 {
        return Err(LegacyMtdError::InsaneMinIoSize {
            mtd_num,
            node: node.to_path_buf(),
            value: min_io_size,
        });
    }
    if eb_size == 0 || eb_size < min_io_size {
        return Err(LegacyMtdError::InsaneEraseblockSize {
            mtd_num,
            node: node.to_path_buf(),
            value: eb_size,
        });
    }
    if size == 0 || size < u64::from(eb_size) {
        return Err(LegacyMtdError::InsaneSize {
            mtd_num,
            node: node.to_path_buf(),
            value: size,
        });
    }

    if size % u64::from(eb_size) != 0 {
        warn!(
            "mtd{}: size {} is not a multiple of eraseblock size {}",
            mtd_num, size, eb_size
        );
    }
    let eb_cnt = (size / u64::from(eb_size)) as u32;

    let mtd_type = match MtdType::from_code(ui.type_) {
        TypeCode::Known(ty) => ty,
        TypeCode::Absent => {
            return Err(LegacyMtdError::DeviceAbsent {
                mtd_num,
                node: node.to_path_buf(),
            })
        }
        TypeCode::Unknown(code) => {
            return Err(LegacyMtdError::UnknownDeviceType {
                mtd_num,
                node: node.to_path_buf(),
                code,
            })
        }
    };

    let writable = MtdFlags::from_bits_retain(ui.flags).contains(MtdFlags::WRITEABLE);

    debug!(
        "mtd{} ({}): type={}, size={}, eb_size={}, min_io_size={}, writable={}, bb_allowed={}",
        mtd_num,
        node.display(),
        mtd_type,
        size,
        eb_size,
        min_io_size,
        writable,
        bb_allowed
    );

    Ok(DeviceGeometry {
        node: node.to_path_buf(),
        major: stat.major,
        minor: stat.minor,
        mtd_num,
        mtd_type,
        size,
        eb_size,
        eb_cnt,
        min_io_size,
        subpage_size: min_io_size,
        oob_size: ui.oobsize,
        oob_avail: 0,
        writable,
        bb_allowed,
    })
}
