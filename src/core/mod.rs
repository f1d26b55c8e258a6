// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Modules that support invoking the devicemapper control utility and
//! parsing what it reports.

mod device;
mod deviceinfo;
mod dm;
mod exec;
mod types;

pub use self::{
    device::{devnode_to_devno, Device},
    deviceinfo::{MapInfo, MapState},
    dm::{DmVersion, DM},
    exec::{DmExec, PathExec, ToolOutput},
    types::{DmName, DmNameBuf, DmUuid, DmUuidBuf, TargetLine},
};
