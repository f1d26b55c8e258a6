// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bitflags::bitflags;
use log::debug;
use once_cell::sync::Lazy;
use semver::Version;

use crate::{core::DM, errors::DmError, result::DmResult};

/// Technologies whose availability can be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmTech {
    /// Basic mapping support: create, remove, query.
    Map,
}

bitflags! {
    /// Modes of operation a caller intends to use a technology in.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct TechMode: u32 {
        /// Creating and activating new mappings.
        const CREATE_ACTIVATE = 0b001;
        /// Removing existing mappings.
        const REMOVE          = 0b010;
        /// Querying mapping state.
        const QUERY           = 0b100;
    }
}

/// The oldest dmsetup known to support every operation in this crate.
static DMSETUP_MIN_VERSION: Lazy<Version> = Lazy::new(|| Version::new(1, 2, 93));

/// Check whether the given technology is usable in the given modes.
///
/// Fails with `ToolMissing` when the control utility cannot be located
/// on the search path, and with `ToolTooOld` when the located utility
/// reports a version below the technology's minimum. Returns false,
/// with no error, when the utility is usable but the kernel
/// devicemapper driver is not loaded. No side effects.
pub fn is_tech_avail(tech: DmTech, mode: TechMode) -> DmResult<bool> {
    let dm = DM::new()?;
    tech_avail(&dm, tech, mode)
}

pub(crate) fn tech_avail(dm: &DM, tech: DmTech, mode: TechMode) -> DmResult<bool> {
    debug!("technology availability query: {tech:?} for modes {mode:?}");

    // Every mode of basic mapping support rides on the same utility,
    // so the gate does not branch on mode today.
    match tech {
        DmTech::Map => {}
    }

    let version = dm.version()?;
    if version.library < *DMSETUP_MIN_VERSION {
        return Err(DmError::ToolTooOld(
            version.library,
            DMSETUP_MIN_VERSION.clone(),
        ));
    }

    Ok(version.driver.is_some())
}
