// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Once;

use log::warn;

use crate::{
    core::{DmNameBuf, DmUuidBuf, DM},
    errors::DmError,
    mapping,
    result::DmResult,
};

/// String concatenated with the test supplied name, so that leftover
/// test mappings are easy to identify and remove.
static DM_TEST_ID: &str = "_dmcontrol_test_delme";

static LOGGER: Once = Once::new();

/// Initialize the logger once for any number of tests.
pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::builder().is_test(true).init();
    });
}

/// Generate the test name given the test supplied name.
pub fn test_name(name: &str) -> DmResult<DmNameBuf> {
    DmNameBuf::new(format!("{name}{DM_TEST_ID}"))
}

/// Generate the test uuid given the test supplied name.
pub fn test_uuid(name: &str) -> DmResult<DmUuidBuf> {
    DmUuidBuf::new(format!("{name}{DM_TEST_ID}"))
}

/// Attempt to remove every mapping whose name contains `DM_TEST_ID`.
///
/// A mapping that is already gone is a satisfied removal. A busy
/// mapping gets a few tries, then is reported and skipped; a test that
/// leaked an open consumer should fail on its own assertions, not hang
/// the cleanup.
pub fn clean_up(dm: &DM) -> DmResult<()> {
    for (name, _) in dm.list_devices()? {
        if !name.as_str().contains(DM_TEST_ID) {
            continue;
        }
        let attempt = retry::retry(retry::delay::Fixed::from_millis(100).take(3), || {
            match mapping::remove(dm, &name) {
                Err(DmError::DeviceBusy(busy)) => Err(DmError::DeviceBusy(busy)),
                other => Ok(other),
            }
        });
        match attempt {
            Ok(Ok(())) | Ok(Err(DmError::MapNotFound(_))) => {}
            Ok(Err(err)) => return Err(err),
            Err(_) => warn!("unable to remove busy test mapping {}", &*name),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        existence::{map_exists, ExistsFlags},
        testing::{FakeDmsetup, FakeMap},
    };

    #[test]
    /// Cleanup removes leftover test mappings, leaves foreign mappings
    /// alone, and skips over busy ones rather than failing.
    fn test_clean_up() {
        init_logger();
        let fake = FakeDmsetup::new();
        let dm = DM::with_exec(Box::new(fake.clone())).unwrap();

        let leftover = test_name("leftover").unwrap();
        let busy = test_name("busy").unwrap();
        fake.insert_map(leftover.as_str(), FakeMap::default());
        fake.insert_map(busy.as_str(), FakeMap::default());
        fake.insert_map("not-ours", FakeMap::default());
        fake.hold_open(busy.as_str());

        clean_up(&dm).unwrap();

        assert!(!map_exists(&dm, &leftover, ExistsFlags::empty()).unwrap());
        assert!(map_exists(&dm, &busy, ExistsFlags::empty()).unwrap());
        let not_ours = crate::core::DmName::new("not-ours").unwrap();
        assert!(map_exists(&dm, not_ours, ExistsFlags::empty()).unwrap());
    }
}
