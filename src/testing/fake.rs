// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    core::{DmExec, ToolOutput},
    result::DmResult,
};

/// The device major the fake hands out, the usual one for dm devices.
const FAKE_DM_MAJOR: u32 = 253;

/// One scripted mapping held by the fake utility.
#[derive(Debug, Clone, Default)]
pub struct FakeMap {
    /// The devicemapper uuid, as an owning subsystem would stamp it.
    pub uuid: Option<String>,
    /// Table lines, exactly as the utility would print them.
    pub table: Vec<String>,
    /// Whether the map is suspended.
    pub suspended: bool,
    /// Number of open consumers; nonzero makes removal report busy.
    pub open_count: i64,
}

#[derive(Debug)]
struct MapEntry {
    map: FakeMap,
    minor: u32,
}

#[derive(Debug)]
struct State {
    maps: BTreeMap<String, MapEntry>,
    blockdevs: Vec<PathBuf>,
    next_minor: u32,
    library: String,
    driver: Option<String>,
    missing: bool,
    create_error: Option<String>,
}

/// A scripted stand-in for the dmsetup utility.
///
/// A clonable handle over shared state, so a test can keep mutating
/// the "kernel table" (suspending a map, opening a consumer) after the
/// DM context has taken its own handle, the way external tooling
/// mutates the real table underneath a live context.
#[derive(Debug, Clone)]
pub struct FakeDmsetup {
    state: Arc<Mutex<State>>,
}

impl Default for FakeDmsetup {
    fn default() -> FakeDmsetup {
        FakeDmsetup::new()
    }
}

impl FakeDmsetup {
    pub fn new() -> FakeDmsetup {
        FakeDmsetup {
            state: Arc::new(Mutex::new(State {
                maps: BTreeMap::new(),
                blockdevs: Vec::new(),
                next_minor: 0,
                library: "1.02.187".to_string(),
                driver: Some("4.48.0".to_string()),
                missing: false,
                create_error: None,
            })),
        }
    }

    /// Simulate the utility being absent from the search path.
    pub fn missing(self) -> FakeDmsetup {
        self.state.lock().unwrap().missing = true;
        self
    }

    /// Report `version` as the utility's library version.
    pub fn library_version(self, version: &str) -> FakeDmsetup {
        self.state.lock().unwrap().library = version.to_string();
        self
    }

    /// Report no kernel driver, as when dm_mod is not loaded.
    pub fn without_driver(self) -> FakeDmsetup {
        self.state.lock().unwrap().driver = None;
        self
    }

    /// Register a path that stats as a block device.
    pub fn with_blockdev(self, path: &str) -> FakeDmsetup {
        self.state
            .lock()
            .unwrap()
            .blockdevs
            .push(PathBuf::from(path));
        self
    }

    /// Place a mapping in the table directly, as external tooling
    /// would.
    pub fn insert_map(&self, name: &str, map: FakeMap) {
        let mut state = self.state.lock().unwrap();
        let minor = state.next_minor;
        state.next_minor += 1;
        state.maps.insert(name.to_string(), MapEntry { map, minor });
    }

    /// Suspend a mapping, as `dmsetup suspend` would.
    pub fn suspend(&self, name: &str) {
        if let Some(entry) = self.state.lock().unwrap().maps.get_mut(name) {
            entry.map.suspended = true;
        }
    }

    /// Mark a mapping as held open by a consumer.
    pub fn hold_open(&self, name: &str) {
        if let Some(entry) = self.state.lock().unwrap().maps.get_mut(name) {
            entry.map.open_count = 1;
        }
    }

    /// Make the next create invocation fail with `diagnostic`.
    pub fn fail_next_create(&self, diagnostic: &str) {
        self.state.lock().unwrap().create_error = Some(diagnostic.to_string());
    }
}

impl DmExec for FakeDmsetup {
    fn locate(&self, _util: &str) -> Option<PathBuf> {
        if self.state.lock().unwrap().missing {
            None
        } else {
            Some(PathBuf::from("/sbin/dmsetup"))
        }
    }

    fn run(&self, _tool: &Path, args: &[&str]) -> io::Result<ToolOutput> {
        let mut state = self.state.lock().unwrap();
        Ok(match args {
            ["--version"] => version_report(&state),
            ["info", "-c", ..] => listing_report(&state),
            ["info", name] => info_report(&state, name),
            ["table", name] => table_report(&state, name),
            ["create", name, rest @ ..] => do_create(&mut state, name, rest),
            ["remove", name] => do_remove(&mut state, name),
            _ => failed(format!("Unrecognized command {args:?}")),
        })
    }

    fn blkdev_devno(&self, path: &Path) -> DmResult<Option<u64>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .blockdevs
            .iter()
            .position(|dev| dev == path)
            .map(|idx| (8u64 << 8) + idx as u64))
    }
}

fn ok(stdout: String) -> ToolOutput {
    ToolOutput {
        success: true,
        stdout,
        stderr: String::new(),
    }
}

fn failed(stderr: String) -> ToolOutput {
    ToolOutput {
        success: false,
        stdout: String::new(),
        stderr,
    }
}

fn not_found(op: &str, name: &str) -> ToolOutput {
    failed(format!(
        "device-mapper: {op} ioctl on {name}  failed: No such device or address\nCommand failed.\n"
    ))
}

fn version_report(state: &State) -> ToolOutput {
    let mut out = format!("Library version:   {} (2024-03-01)\n", state.library);
    if let Some(driver) = &state.driver {
        out.push_str(&format!("Driver version:    {driver}\n"));
    }
    ok(out)
}

fn listing_report(state: &State) -> ToolOutput {
    if state.maps.is_empty() {
        return ok("No devices found\n".to_string());
    }
    ok(state
        .maps
        .iter()
        .map(|(name, entry)| format!("{name}:{FAKE_DM_MAJOR}:{}\n", entry.minor))
        .collect())
}

fn info_report(state: &State, name: &str) -> ToolOutput {
    match state.maps.get(name) {
        None => not_found("status", name),
        Some(entry) => {
            let mut out = format!(
                "Name:              {name}\n\
                 State:             {}\n\
                 Read Ahead:        256\n\
                 Tables present:    {}\n\
                 Open count:        {}\n\
                 Event number:      0\n\
                 Major, minor:      {FAKE_DM_MAJOR}, {}\n\
                 Number of targets: {}\n",
                if entry.map.suspended {
                    "SUSPENDED"
                } else {
                    "ACTIVE"
                },
                if entry.map.table.is_empty() {
                    "None"
                } else {
                    "LIVE"
                },
                entry.map.open_count,
                entry.minor,
                entry.map.table.len(),
            );
            if let Some(uuid) = &entry.map.uuid {
                out.push_str(&format!("UUID: {uuid}\n"));
            }
            ok(out)
        }
    }
}

fn table_report(state: &State, name: &str) -> ToolOutput {
    match state.maps.get(name) {
        None => not_found("table", name),
        Some(entry) => ok(entry
            .map
            .table
            .iter()
            .map(|line| format!("{line}\n"))
            .collect()),
    }
}

fn do_create(state: &mut State, name: &str, rest: &[&str]) -> ToolOutput {
    if let Some(diagnostic) = state.create_error.take() {
        return failed(format!("{diagnostic}\nCommand failed.\n"));
    }
    if state.maps.contains_key(name) {
        return failed(format!(
            "device-mapper: create ioctl on {name}  failed: Device or resource busy\nCommand failed.\n"
        ));
    }

    let mut uuid = None;
    let mut table = Vec::new();
    let mut rest = rest.iter();
    while let Some(arg) = rest.next() {
        match *arg {
            "--uuid" => uuid = rest.next().map(|value| value.to_string()),
            "--table" => {
                table = rest
                    .next()
                    .map(|value| value.lines().map(str::to_string).collect())
                    .unwrap_or_default()
            }
            _ => {}
        }
    }

    let minor = state.next_minor;
    state.next_minor += 1;
    state.maps.insert(
        name.to_string(),
        MapEntry {
            map: FakeMap {
                uuid,
                table,
                suspended: false,
                open_count: 0,
            },
            minor,
        },
    );
    ok(String::new())
}

fn do_remove(state: &mut State, name: &str) -> ToolOutput {
    match state.maps.get(name) {
        None => not_found("remove", name),
        Some(entry) if entry.map.open_count > 0 => failed(format!(
            "device-mapper: remove ioctl on {name}  failed: Device or resource busy\nCommand failed.\n"
        )),
        Some(_) => {
            state.maps.remove(name);
            ok(String::new())
        }
    }
}
