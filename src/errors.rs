// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*! Definition of the error class for all devicemapper operations !*/

use std::fmt;

use semver::Version;

/// Error for devicemapper control operations.
///
/// Every failure reported by the control utility is classified into
/// exactly one of these kinds; a query for a mapping that legitimately
/// does not exist is a normal `false`/absent result, never an error.
#[derive(Clone, Debug)]
pub enum DmError {
    /// The control utility could not be located on the search path.
    /// Contains the name of the missing utility.
    ToolMissing(String),

    /// The control utility was found but its version is below the
    /// minimum required for the requested technology. Contains the
    /// reported and the required versions.
    ToolTooOld(Version, Version),

    /// This is a generic error that can be returned when a method
    /// receives an invalid argument. Ideally, the argument should be
    /// invalid in itself, i.e., it should not be made invalid by some
    /// part of the program state or the environment.
    InvalidArgument(String),

    /// A mapping with the requested name already exists in the
    /// kernel's device table. Contains the conflicting name.
    NameConflict(String),

    /// No active mapping with the requested name exists. Contains the
    /// name that failed to resolve.
    MapNotFound(String),

    /// The node identifier does not correspond to any active mapping.
    /// Contains the offending node identifier.
    NodeNotFound(String),

    /// The mapping is currently held open by another consumer and
    /// cannot be removed. Contains the mapping name.
    DeviceBusy(String),

    /// Any other failure reported by the control utility, wrapping the
    /// utility's own diagnostic text.
    ToolFailure(String),
}

impl fmt::Display for DmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DmError::ToolMissing(util) => {
                write!(f, "The '{util}' utility is not available")
            }
            DmError::ToolTooOld(found, required) => write!(
                f,
                "Too low version of dmsetup: {found}. At least {required} required"
            ),
            DmError::InvalidArgument(err) => write!(f, "invalid argument: {err}"),
            DmError::NameConflict(name) => {
                write!(f, "a mapping named '{name}' already exists")
            }
            DmError::MapNotFound(name) => {
                write!(f, "no mapping named '{name}' exists")
            }
            DmError::NodeNotFound(node) => {
                write!(f, "node '{node}' does not belong to any mapping")
            }
            DmError::DeviceBusy(name) => {
                write!(f, "mapping '{name}' is in use and cannot be removed")
            }
            DmError::ToolFailure(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DmError {}
