// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::Deref;

use crate::units::Sectors;

/// Maximum length of a DM name, including the trailing NUL, from the
/// kernel's dm-ioctl interface.
pub const DM_NAME_LEN: usize = 128;

/// Maximum length of a DM uuid, including the trailing NUL, from the
/// kernel's dm-ioctl interface.
pub const DM_UUID_LEN: usize = 129;

// A devicemapper name. Really just a string, but checked against the
// restrictions the kernel and the control utility place on map names.
str_id!(DmName, DmNameBuf, DM_NAME_LEN);

// A devicemapper uuid. A devicemapper uuid has a devicemapper-specific
// format; subsystems prefix it with their own tag, e.g. "LVM-" or
// "CRYPT-".
str_id!(DmUuid, DmUuidBuf, DM_UUID_LEN);

/// This 4-tuple consists of starting offset (sectors), length
/// (sectors), target type (string, e.g. "linear"), and
/// params (string). See target documentation for the format of each
/// target type's params field.
pub type TargetLine = (Sectors, Sectors, String, String);
