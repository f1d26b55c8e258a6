// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Modules that support testing.

mod fake;
mod test_lib;

pub use self::{
    fake::{FakeDmsetup, FakeMap},
    test_lib::{clean_up, init_logger, test_name, test_uuid},
};
