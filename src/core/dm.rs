// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use log::debug;
use semver::Version;

use crate::{
    core::{
        device::Device,
        deviceinfo::MapInfo,
        exec::{DmExec, PathExec, ToolOutput},
        types::{DmName, DmNameBuf, DmUuid, TargetLine},
    },
    errors::DmError,
    result::DmResult,
    units::Sectors,
};

/// Name of the control utility, located on the search path.
const DMSETUP: &str = "dmsetup";

/// Version information reported by the control utility.
#[derive(Debug, Clone)]
pub struct DmVersion {
    /// The utility's userspace library version.
    pub library: Version,
    /// The kernel driver version, if the kernel devicemapper answered
    /// the query. None means the driver is not loaded.
    pub driver: Option<Version>,
}

/// Context needed for communicating with devicemapper.
///
/// Holds the located control utility; holds no kernel state. Every
/// method is one fresh invocation against the live device table.
pub struct DM {
    exec: Box<dyn DmExec>,
    tool: PathBuf,
}

impl std::fmt::Debug for DM {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DM").field("tool", &self.tool).finish()
    }
}

impl DM {
    /// Create a new context for communicating with DM. Fails with
    /// `ToolMissing` when the control utility cannot be located on the
    /// search path.
    pub fn new() -> DmResult<DM> {
        DM::with_exec(Box::new(PathExec))
    }

    /// Create a context over an arbitrary `DmExec` implementation.
    /// This is how the crate's logic is exercised without a real
    /// kernel devicemapper.
    pub fn with_exec(exec: Box<dyn DmExec>) -> DmResult<DM> {
        let tool = exec
            .locate(DMSETUP)
            .ok_or_else(|| DmError::ToolMissing(DMSETUP.into()))?;
        Ok(DM { exec, tool })
    }

    // The backing-device check routed through the exec seam.
    pub(crate) fn blkdev_devno(&self, path: &std::path::Path) -> DmResult<Option<u64>> {
        self.exec.blkdev_devno(path)
    }

    // Run one utility invocation to completion and capture its output.
    // A spawn failure is a ToolFailure: the utility was located, so
    // failing to execute it is not the same as it being absent.
    fn invoke(&self, args: &[&str]) -> DmResult<ToolOutput> {
        debug!("running {} {:?}", self.tool.display(), args);
        self.exec.run(&self.tool, args).map_err(|err| {
            DmError::ToolFailure(format!("failed to run {}: {}", self.tool.display(), err))
        })
    }

    /// Devicemapper version information: the utility's library version
    /// and, when the kernel driver is loaded, the driver version.
    ///
    /// Parsed regardless of exit status: the utility reports its
    /// library version even when the driver query fails, and the
    /// missing driver line is meaningful to the capability probe.
    pub fn version(&self) -> DmResult<DmVersion> {
        let output = self.invoke(&["--version"])?;

        let mut library = None;
        let mut driver = None;
        for line in output.stdout.lines() {
            if let Some(value) = line.strip_prefix("Library version:") {
                library = parse_tool_version(value);
            } else if let Some(value) = line.strip_prefix("Driver version:") {
                driver = parse_tool_version(value);
            }
        }

        match library {
            Some(library) => Ok(DmVersion { library, driver }),
            None => Err(DmError::ToolFailure(format!(
                "could not parse dmsetup version report: \"{}\"",
                output.stdout.trim()
            ))),
        }
    }

    /// Returns a list of tuples containing DM device names and a
    /// Device, which holds their major and minor device numbers.
    pub fn list_devices(&self) -> DmResult<Vec<(DmNameBuf, Device)>> {
        let output = self.invoke(&[
            "info",
            "-c",
            "--noheadings",
            "--separator",
            ":",
            "-o",
            "name,major,minor",
        ])?;

        // The utility reports an empty table as a sentinel line rather
        // than empty output.
        if output.stdout.trim() == "No devices found" {
            return Ok(vec![]);
        }
        if !output.success {
            return Err(DmError::ToolFailure(format!(
                "dmsetup device listing failed: {}",
                diagnostic(&output)
            )));
        }

        let mut devs = Vec::new();
        for line in output.stdout.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // Fields are colon-separated with the name first; split
            // from the right, a map name may itself contain colons.
            let mut fields = line.rsplitn(3, ':');
            let (minor, major, name) = match (fields.next(), fields.next(), fields.next()) {
                (Some(minor), Some(major), Some(name)) => (minor, major, name),
                _ => {
                    return Err(DmError::ToolFailure(format!(
                        "could not parse device listing line: \"{line}\""
                    )))
                }
            };
            let device = format!("{}:{}", major.trim(), minor.trim()).parse::<Device>()?;
            devs.push((DmNameBuf::new(name.to_string())?, device));
        }

        Ok(devs)
    }

    /// Get the live info report for a mapping. Fails with `MapNotFound`
    /// if the kernel has no mapping under this name.
    pub fn info(&self, name: &DmName) -> DmResult<MapInfo> {
        let output = self.invoke(&["info", name.as_str()])?;
        if !output.success {
            return Err(classify_failure("info", name, &output));
        }
        MapInfo::parse(&output.stdout)
    }

    /// Return the live table of a mapping as a Vec of (sector_start,
    /// sector_length, type, params). A mapping with no loaded table
    /// yields an empty Vec.
    pub fn table(&self, name: &DmName) -> DmResult<Vec<TargetLine>> {
        let output = self.invoke(&["table", name.as_str()])?;
        if !output.success {
            return Err(classify_failure("table", name, &output));
        }

        let mut targets = Vec::new();
        for line in output.stdout.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(4, ' ');
            let parsed = match (fields.next(), fields.next(), fields.next()) {
                (Some(start), Some(length), Some(target_type)) => start
                    .parse::<u64>()
                    .and_then(|start| length.parse::<u64>().map(|length| (start, length)))
                    .map(|(start, length)| {
                        (
                            Sectors(start),
                            Sectors(length),
                            target_type.to_string(),
                            fields.next().unwrap_or("").to_string(),
                        )
                    })
                    .ok(),
                _ => None,
            };
            match parsed {
                Some(target) => targets.push(target),
                None => {
                    return Err(DmError::ToolFailure(format!(
                        "could not parse table line: \"{line}\""
                    )))
                }
            }
        }

        Ok(targets)
    }

    /// Create a mapping, load the given table, and activate it under
    /// `name`. Setting a uuid is optional; subsystems use it to stamp
    /// their ownership on a map.
    pub fn create_device(
        &self,
        name: &DmName,
        uuid: Option<&DmUuid>,
        table: &[TargetLine],
    ) -> DmResult<()> {
        let table_arg = table
            .iter()
            .map(|(start, length, target_type, params)| {
                format!("{} {} {} {}", start.0, length.0, target_type, params)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut args = vec!["create", name.as_str()];
        if let Some(uuid) = uuid {
            args.push("--uuid");
            args.push(uuid.as_str());
        }
        args.push("--table");
        args.push(&table_arg);

        let output = self.invoke(&args)?;
        if !output.success {
            return Err(classify_failure("create", name, &output));
        }
        Ok(())
    }

    /// Deactivate and delete the mapping named `name`.
    pub fn remove_device(&self, name: &DmName) -> DmResult<()> {
        let output = self.invoke(&["remove", name.as_str()])?;
        if !output.success {
            return Err(classify_failure("remove", name, &output));
        }
        Ok(())
    }
}

// The interesting part of a failed invocation's output. The utility
// diagnoses on stderr; fall back to stdout for oddly behaved versions.
fn diagnostic(output: &ToolOutput) -> String {
    let err = output.stderr.trim();
    if err.is_empty() {
        output.stdout.trim().to_string()
    } else {
        err.to_string()
    }
}

// Map a failed invocation onto the error taxonomy. "busy" means
// different things per operation: a busy create is a name collision, a
// busy remove is a mapping held open by some consumer.
fn classify_failure(op: &str, name: &DmName, output: &ToolOutput) -> DmError {
    let diag = diagnostic(output);
    let lower = diag.to_lowercase();

    if ["no such device", "not found", "does not exist"]
        .iter()
        .any(|pat| lower.contains(pat))
    {
        // A create never fails to find the map being created; what the
        // kernel could not find is the backing device in its table.
        return match op {
            "create" => DmError::InvalidArgument(format!(
                "backing device for {name} could not be opened: {diag}"
            )),
            _ => DmError::MapNotFound(name.to_string()),
        };
    }
    if lower.contains("busy") {
        return match op {
            "create" => DmError::NameConflict(name.to_string()),
            "remove" => DmError::DeviceBusy(name.to_string()),
            _ => DmError::ToolFailure(format!("dmsetup {op} on {name} failed: {diag}")),
        };
    }
    DmError::ToolFailure(format!("dmsetup {op} on {name} failed: {diag}"))
}

// Extract a version from text like "   1.02.187 (2023-11-21)".
// Components are plain decimal; a leading zero as in "02" carries no
// meaning. Missing minor or patch components default to zero.
fn parse_tool_version(value: &str) -> Option<Version> {
    let token = value.split_whitespace().next()?;
    let mut fields = token.split('.').map(|f| f.parse::<u64>().ok());
    let major = fields.next()??;
    let minor = fields.next().flatten().unwrap_or(0);
    let patch = fields.next().flatten().unwrap_or(0);
    Some(Version::new(major, minor, patch))
}
