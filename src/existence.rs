// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bitflags::bitflags;

use crate::{
    core::{DmName, MapState, DM},
    errors::DmError,
    result::DmResult,
};

bitflags! {
    /// Policy governing which device-table states count as "exists".
    ///
    /// The empty set means "physically present in the table, whatever
    /// its state"; each flag narrows the answer. The four combinations
    /// cover the full policy matrix, explicit at every call site.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ExistsFlags: u32 {
        /// Exclude maps that do not have a live table loaded yet, i.e.
        /// created but never fully activated.
        const LIVE_TABLE_ONLY = 0b01;
        /// Exclude maps that are currently suspended.
        const SKIP_SUSPENDED  = 0b10;
    }
}

/// Check whether a mapping named `name` currently exists in the
/// kernel's device table.
///
/// A suspended mapping is still physically present; `flags` chooses
/// between "present" and "present and operable" semantics. Absence of
/// the map, whether never created or already removed, is a normal
/// `false` result regardless of flags, never an error.
pub fn map_exists(dm: &DM, name: &DmName, flags: ExistsFlags) -> DmResult<bool> {
    let info = match dm.info(name) {
        Ok(info) => info,
        Err(DmError::MapNotFound(_)) => return Ok(false),
        Err(err) => return Err(err),
    };

    if flags.contains(ExistsFlags::LIVE_TABLE_ONLY) && !info.live_table() {
        return Ok(false);
    }
    if flags.contains(ExistsFlags::SKIP_SUSPENDED) && info.state() == MapState::Suspended {
        return Ok(false);
    }
    Ok(true)
}
