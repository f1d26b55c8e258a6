// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// disk sector size in bytes
pub const SECTOR_SIZE: usize = 512;

range_u64!(
    /// A type to store counts and offsets expressed in 512-byte sectors.
    Sectors,
    "sectors"
);

impl Sectors {
    /// The number of bytes in these sectors.
    pub fn bytes(self) -> u128 {
        u128::from(self.0) * SECTOR_SIZE as u128
    }
}
