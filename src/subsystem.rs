// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use crate::{
    core::{DmName, DM},
    result::DmResult,
};

/// The higher-level subsystem that owns a mapping.
///
/// Derived from the mapping's live table metadata on every query,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    /// The mapping belongs to the LVM volume manager.
    Lvm,
    /// The mapping belongs to a disk-encryption layer (dm-crypt).
    Crypt,
    /// Some other or unidentifiable owner.
    Unknown,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::Lvm => write!(f, "LVM"),
            Subsystem::Crypt => write!(f, "CRYPT"),
            Subsystem::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Determine which subsystem owns the mapping named `name`.
///
/// Works for mappings created entirely by external tooling: both LVM
/// and cryptsetup stamp their tag into the map's uuid ("LVM-…",
/// "CRYPT-…"), and a crypt target activated without a uuid is still
/// recognized from its table. Fails with `MapNotFound` if the name has
/// no active mapping at query time; losing that race to a concurrent
/// removal is surfaced as the error, never as a misclassification.
pub fn subsystem_from_name(dm: &DM, name: &DmName) -> DmResult<Subsystem> {
    let info = dm.info(name)?;

    if let Some(uuid) = info.uuid() {
        match uuid.as_str().split('-').next() {
            Some("LVM") => return Ok(Subsystem::Lvm),
            Some("CRYPT") => return Ok(Subsystem::Crypt),
            _ => {}
        }
    }

    if dm
        .table(name)?
        .iter()
        .any(|(_, _, target_type, _)| target_type == "crypt")
    {
        return Ok(Subsystem::Crypt);
    }

    Ok(Subsystem::Unknown)
}
