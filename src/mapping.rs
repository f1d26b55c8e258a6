// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use log::debug;

use crate::{
    core::{Device, DmName, DmUuid, TargetLine, DM},
    errors::DmError,
    result::DmResult,
    units::Sectors,
};

/// Construct a single-segment linear mapping over `backing_device` and
/// activate it under `name`.
///
/// The table maps the full requested length onto the backing device
/// starting at sector 0. Fails with `NameConflict` if a mapping with
/// that name already exists, `InvalidArgument` if the length is zero or
/// the backing device cannot be opened, and `ToolFailure` wrapping the
/// utility's diagnostics for any other activation failure.
pub fn create_linear(
    dm: &DM,
    name: &DmName,
    backing_device: &Path,
    length: Sectors,
    uuid: Option<&DmUuid>,
) -> DmResult<()> {
    if length == Sectors(0) {
        return Err(DmError::InvalidArgument(format!(
            "requested length of mapping {name} is zero"
        )));
    }
    match dm.blkdev_devno(backing_device)? {
        Some(devno) => debug!(
            "backing device {} is {}",
            backing_device.display(),
            Device::from(devno)
        ),
        None => {
            return Err(DmError::InvalidArgument(format!(
                "backing device {} is not an accessible block device",
                backing_device.display()
            )))
        }
    }

    // The kernel would refuse a duplicate name anyway; resolving it
    // first keeps the conflict report independent of the utility's
    // wording. A create racing another create of the same name is
    // still caught below and classified the same way.
    match dm.info(name) {
        Ok(_) => return Err(DmError::NameConflict(name.to_string())),
        Err(DmError::MapNotFound(_)) => {}
        Err(err) => return Err(err),
    }

    let table = vec![linear_table_line(backing_device, length)];
    dm.create_device(name, uuid, &table)
}

// One table line: <logical start sec> <length> "linear" <dev> <offset>
fn linear_table_line(backing_device: &Path, length: Sectors) -> TargetLine {
    let line = (
        Sectors(0),
        length,
        "linear".to_owned(),
        format!("{} 0", backing_device.display()),
    );
    debug!("dmtable line : {:?}", line);
    line
}

/// Deactivate and delete the table for `name`.
///
/// Fails with `MapNotFound` if no such mapping exists and `DeviceBusy`
/// if the mapping is currently held open by another consumer. Callers
/// performing cleanup should treat `MapNotFound` as an
/// already-satisfied condition rather than a failure.
pub fn remove(dm: &DM, name: &DmName) -> DmResult<()> {
    // Resolve non-existence up front so a missing map reports the same
    // way on every utility version; a map removed between the two
    // calls still classifies as MapNotFound from the remove itself.
    dm.info(name)?;
    dm.remove_device(name)
}
