// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    io,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{core::device::devnode_to_devno, result::DmResult};

/// Captured result of one control utility invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Whether the utility exited successfully.
    pub success: bool,
    /// Everything the utility wrote to stdout.
    pub stdout: String,
    /// Everything the utility wrote to stderr.
    pub stderr: String,
}

/// A trait capturing how the control utility is reached: located on a
/// search path, then executed with its output captured. The rest of the
/// crate goes through this seam only, so the whole control surface can
/// be exercised against a scripted stand-in.
pub trait DmExec {
    /// Locate the named utility on the search path.
    fn locate(&self, util: &str) -> Option<PathBuf>;

    /// Run the utility at `tool` with `args`, blocking until it exits,
    /// and capture its output. Err means the process could not be run
    /// at all, not that the utility reported a failure.
    fn run(&self, tool: &Path, args: &[&str]) -> io::Result<ToolOutput>;

    /// Stat `path` and return its device number if it is a block
    /// device, None if it is missing or of some other kind. Part of
    /// the seam so that mapping creation can be exercised without a
    /// real block device to back it.
    fn blkdev_devno(&self, path: &Path) -> DmResult<Option<u64>> {
        devnode_to_devno(path)
    }
}

/// The production implementation: PATH lookup and synchronous process
/// execution.
#[derive(Debug, Default, Clone)]
pub struct PathExec;

impl DmExec for PathExec {
    fn locate(&self, util: &str) -> Option<PathBuf> {
        which::which(util).ok()
    }

    fn run(&self, tool: &Path, args: &[&str]) -> io::Result<ToolOutput> {
        let output = Command::new(tool).args(args).output()?;
        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
