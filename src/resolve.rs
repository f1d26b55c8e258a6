// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    core::{DmName, DmNameBuf, DM},
    errors::DmError,
    result::DmResult,
};

/// Resolve a map name to its kernel node name, e.g. "dm-0".
///
/// Fails with `MapNotFound` if no active mapping has that name. A pure
/// query against live kernel state; no side effects.
pub fn node_from_name(dm: &DM, name: &DmName) -> DmResult<String> {
    Ok(dm.info(name)?.device().dm_node())
}

/// Resolve a kernel node name back to the name of the mapping it
/// belongs to.
///
/// Fails with `NodeNotFound` if the node identifier does not
/// correspond to any active mapping; a malformed identifier is the
/// same non-correspondence. For any active mapping the two resolvers
/// are inverse to each other.
pub fn name_from_node(dm: &DM, node: &str) -> DmResult<DmNameBuf> {
    let minor = node
        .strip_prefix("dm-")
        .and_then(|minor| minor.parse::<u32>().ok())
        .ok_or_else(|| DmError::NodeNotFound(node.to_string()))?;

    dm.list_devices()?
        .into_iter()
        .find(|(_, device)| device.minor == minor)
        .map(|(name, _)| name)
        .ok_or_else(|| DmError::NodeNotFound(node.to_string()))
}
