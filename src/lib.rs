// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Control of the running kernel's devicemapper through the dmsetup
//! utility.
//!
//! # Overview
//!
//! Linux's devicemapper allows the creation of block devices whose
//! storage is mapped to other block devices, either by changing the
//! location of data blocks or by performing some operation on the data
//! itself. Higher-level subsystems such as LVM2 and cryptsetup build
//! their devices on top of it. This crate covers the control-plane
//! slice of that machinery:
//!
//! * Creating a linear mapping over a backing block device and
//!   removing a mapping by name
//! * Checking whether a named mapping exists, with explicit policy for
//!   suspended and not-yet-activated maps
//! * Resolving a map name to its kernel device node and back
//! * Reporting which subsystem (LVM, dm-crypt) owns a given mapping
//! * Probing whether the dmsetup utility is present and recent enough
//!
//! # Usage
//!
//! All operations go through a [`DM`] context, which locates the
//! dmsetup utility on the search path when constructed. The kernel's
//! device table is the sole source of truth: every call re-queries it,
//! and nothing is cached between calls. External tools (lvm,
//! cryptsetup, another dmsetup) may mutate the same namespace at any
//! time; a query that races a removal reports the mapping as absent,
//! not an internal error.

/// macros for generating validated map name and uuid types
#[macro_use]
mod id_macros;
/// macros for generating the sector-count newtype
#[macro_use]
mod range_macros;

/// low level interaction with the control utility
mod core;
/// the error enum for all operations
mod errors;
/// existence queries with suspended/incomplete-map policy
mod existence;
/// creation and removal of mappings
mod mapping;
/// availability and version probing of the control utility
mod probe;
/// map name to device node translation and its inverse
mod resolve;
/// return result container
mod result;
/// subsystem ownership classification
mod subsystem;
/// basic types (Sectors)
mod units;

#[cfg(test)]
mod testing;

pub use crate::{
    core::{
        devnode_to_devno, Device, DmExec, DmName, DmNameBuf, DmUuid, DmUuidBuf, DmVersion,
        MapInfo, MapState, PathExec, TargetLine, ToolOutput, DM,
    },
    errors::DmError,
    existence::{map_exists, ExistsFlags},
    mapping::{create_linear, remove},
    probe::{is_tech_avail, DmTech, TechMode},
    resolve::{name_from_node, node_from_name},
    result::DmResult,
    subsystem::{subsystem_from_name, Subsystem},
    units::{Sectors, SECTOR_SIZE},
};
