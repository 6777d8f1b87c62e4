//! Spawn - Building and launching the process behind a new pane

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::pty::PtyError;

use super::layout::{CellId, SplitOptions};
use super::pane::PaneId;
use super::session::SessionId;
use super::window::WindowId;

/// Environment overlay (name -> value)
pub type Environ = BTreeMap<String, String>;

/// Add a `NAME=value` entry; entries without `=` or with an empty name are ignored
pub fn environ_put(env: &mut Environ, entry: &str) {
    if let Some((name, value)) = entry.split_once('=') {
        if !name.is_empty() {
            env.insert(name.to_string(), value.to_string());
        }
    }
}

/// Structural options for a split, each independent of the others
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitFlags {
    /// New pane goes left of / above the target
    pub before: bool,
    /// New pane spans the full window width or height
    pub full_size: bool,
    /// Do not run a command in the new pane
    pub start_empty: bool,
    /// Do not make the new pane active
    pub detached: bool,
    /// Zoom the window's active pane once the split is done
    pub zoom: bool,
}

impl SplitFlags {
    pub fn layout_options(&self) -> SplitOptions {
        SplitOptions {
            before: self.before,
            full_size: self.full_size,
        }
    }
}

/// Everything needed to attach a pane to a freshly split cell
#[derive(Clone, Debug)]
pub struct SpawnRequest {
    pub session: SessionId,
    pub window: WindowId,
    /// Pane that was split
    pub target: PaneId,
    /// Empty cell the new pane goes into
    pub cell: CellId,
    /// Command vector; empty means the default shell
    pub command: Vec<String>,
    pub environment: Environ,
    pub cwd: Option<PathBuf>,
    pub flags: SplitFlags,
}

#[derive(Error, Debug)]
pub enum SpawnError {
    #[error(transparent)]
    Pty(#[from] PtyError),

    #[error("window @{0} not found")]
    WindowGone(WindowId),

    #[error("cell {0} is not an empty leaf")]
    CellInUse(CellId),
}

/// What the launcher needs to start a process
#[derive(Clone, Debug)]
pub struct LaunchSpec {
    pub command: Vec<String>,
    /// Shell used for an empty or single-string command
    pub shell: String,
    pub environment: Environ,
    pub cwd: Option<PathBuf>,
    pub cols: u16,
    pub rows: u16,
}

/// A running child attached to a pane
pub trait ProcessHandle {
    fn pid(&self) -> Option<u32>;

    /// Tell the child its terminal changed size
    fn resize(&mut self, cols: u16, rows: u16);
}

/// Process launcher used by the server when a pane needs a command
pub trait Spawner {
    fn launch(&mut self, spec: &LaunchSpec) -> Result<Box<dyn ProcessHandle>, SpawnError>;
}

/// Launcher that starts nothing (dry runs)
#[derive(Debug, Default)]
pub struct NullSpawner;

struct NullProcess;

impl ProcessHandle for NullProcess {
    fn pid(&self) -> Option<u32> {
        None
    }

    fn resize(&mut self, _cols: u16, _rows: u16) {}
}

impl Spawner for NullSpawner {
    fn launch(&mut self, spec: &LaunchSpec) -> Result<Box<dyn ProcessHandle>, SpawnError> {
        tracing::debug!("dry run: not launching {:?}", spec.command);
        Ok(Box::new(NullProcess))
    }
}

/// Launcher that always fails, for exercising rollback
#[cfg(test)]
pub struct FailingSpawner(pub String);

#[cfg(test)]
impl Spawner for FailingSpawner {
    fn launch(&mut self, _spec: &LaunchSpec) -> Result<Box<dyn ProcessHandle>, SpawnError> {
        Err(SpawnError::Pty(PtyError::Open(self.0.clone())))
    }
}
