// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{fmt, path::Path, str::FromStr};

use nix::libc::{dev_t, major, minor};
use nix::sys::stat::{self, SFlag};

use crate::{errors::DmError, result::DmResult};

/// A struct containing the device's major and minor numbers
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Device {
    /// Device major number
    pub major: u32,
    /// Device minor number
    pub minor: u32,
}

/// Display format is the device number in "<major>:<minor>" format
impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.major, self.minor)
    }
}

impl FromStr for Device {
    type Err = DmError;

    fn from_str(s: &str) -> Result<Device, DmError> {
        let vals = s.split(':').collect::<Vec<_>>();
        if vals.len() != 2 {
            let err_msg = format!("value \"{s}\" split into wrong number of fields");
            return Err(DmError::InvalidArgument(err_msg));
        }
        let major = vals[0].trim().parse::<u32>().map_err(|_| {
            DmError::InvalidArgument(format!(
                "could not parse \"{}\" to obtain major number",
                vals[0]
            ))
        })?;
        let minor = vals[1].trim().parse::<u32>().map_err(|_| {
            DmError::InvalidArgument(format!(
                "could not parse \"{}\" to obtain minor number",
                vals[1]
            ))
        })?;
        Ok(Device { major, minor })
    }
}

impl From<dev_t> for Device {
    fn from(val: dev_t) -> Device {
        #[allow(unused_unsafe)] // No longer unsafe in libc 0.2.133.
        let major = unsafe { major(val) };
        #[allow(unused_unsafe)] // No longer unsafe in libc 0.2.133.
        let minor = unsafe { minor(val) };

        Device { major, minor }
    }
}

impl Device {
    /// The kernel node name for this device, e.g. "dm-0". Devicemapper
    /// nodes are named for their minor number alone.
    pub fn dm_node(&self) -> String {
        format!("dm-{}", self.minor)
    }
}

/// Get a device number from a device node.
/// Return None if the device is not a block device; devicemapper is not
/// interested in other sorts of devices. Return None if the device appears
/// not to exist.
pub fn devnode_to_devno(path: &Path) -> DmResult<Option<u64>> {
    match stat::stat(path) {
        Ok(metadata) => Ok(
            if metadata.st_mode & SFlag::S_IFMT.bits() == SFlag::S_IFBLK.bits() {
                Some(metadata.st_rdev)
            } else {
                None
            },
        ),
        Err(nix::Error::ENOENT) => Ok(None),
        Err(err) => Err(DmError::ToolFailure(format!(
            "failed to stat metadata for device at {}: {}",
            path.display(),
            err
        ))),
    }
}
