// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    core::{
        device::Device,
        types::{DmUuid, DmUuidBuf},
    },
    errors::DmError,
    result::DmResult,
};

/// The live state of a mapping as the kernel reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// The mapping services I/O.
    Active,
    /// I/O to the mapping is held rather than serviced; the mapping
    /// remains present in the device table.
    Suspended,
}

/// Contains information about one mapping, parsed from the control
/// utility's per-device info report.
#[derive(Clone, Debug)]
pub struct MapInfo {
    state: MapState,
    live_table: bool,
    open_count: i64,
    target_count: u64,
    dev: Device,
    uuid: Option<DmUuidBuf>,
}

impl MapInfo {
    /// Parse the `Field: value` lines of an info report.
    ///
    /// The report is only ever produced for a device the kernel knows,
    /// so a report missing mandatory fields indicates an utility
    /// incompatibility and is surfaced as a failure rather than
    /// guessed at.
    pub fn parse(report: &str) -> DmResult<MapInfo> {
        let mut state = None;
        let mut live_table = false;
        let mut open_count = None;
        let mut target_count = 0;
        let mut dev = None;
        let mut uuid = None;

        for line in report.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "State" => {
                    state = Some(if value.starts_with("SUSPENDED") {
                        MapState::Suspended
                    } else {
                        MapState::Active
                    });
                }
                "Tables present" => {
                    live_table = value.contains("LIVE");
                }
                "Open count" => {
                    open_count = value.parse::<i64>().ok();
                }
                "Number of targets" => {
                    target_count = value.parse::<u64>().unwrap_or(0);
                }
                "Major, minor" => {
                    let mut fields = value.splitn(2, ',');
                    let major = fields.next().map(str::trim);
                    let minor = fields.next().map(str::trim);
                    if let (Some(major), Some(minor)) = (major, minor) {
                        if let (Ok(major), Ok(minor)) = (major.parse(), minor.parse()) {
                            dev = Some(Device { major, minor });
                        }
                    }
                }
                "UUID" => {
                    if !value.is_empty() {
                        uuid = Some(DmUuidBuf::new(value.to_string())?);
                    }
                }
                _ => {}
            }
        }

        match (state, open_count, dev) {
            (Some(state), Some(open_count), Some(dev)) => Ok(MapInfo {
                state,
                live_table,
                open_count,
                target_count,
                dev,
                uuid,
            }),
            _ => Err(DmError::ToolFailure(format!(
                "could not parse device info report: \"{}\"",
                report.trim()
            ))),
        }
    }

    /// The mapping's live state.
    pub fn state(&self) -> MapState {
        self.state
    }

    /// Whether a live table is loaded. A freshly created mapping that
    /// has not had its table activated yet reports false here.
    pub fn live_table(&self) -> bool {
        self.live_table
    }

    /// The number of times the device is currently open.
    pub fn open_count(&self) -> i64 {
        self.open_count
    }

    /// The number of targets in the live table.
    pub fn target_count(&self) -> u64 {
        self.target_count
    }

    /// The device's major and minor device numbers, as a Device.
    pub fn device(&self) -> Device {
        self.dev
    }

    /// The device's devicemapper uuid.
    pub fn uuid(&self) -> Option<&DmUuid> {
        self.uuid.as_ref().map(|uuid| uuid.as_ref())
    }
}
