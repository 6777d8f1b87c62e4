//! Pseudo-terminal launcher
//!
//! Opens a pty pair with `portable-pty`, sized to the pane's cell, and runs the
//! pane's command on the slave side. The master end stays with the pane; once
//! the pane is dropped the master closes and the child sees a hangup.

use std::path::Path;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize, PtySystem};
use thiserror::Error;
use tracing::{debug, warn};

use crate::wm::spawn::{LaunchSpec, ProcessHandle, SpawnError, Spawner};

#[derive(Error, Debug)]
pub enum PtyError {
    #[error("failed to open pty: {0}")]
    Open(String),

    #[error("failed to spawn {command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("working directory {0} does not exist")]
    MissingDirectory(String),
}

pub type Result<T> = std::result::Result<T, PtyError>;

/// Build the command line for a pane
///
/// An empty command runs the shell, a single string goes through `shell -c`,
/// and anything longer is executed directly.
pub fn build_command(spec: &LaunchSpec) -> CommandBuilder {
    let mut cmd = match spec.command.as_slice() {
        [] => CommandBuilder::new(&spec.shell),
        [line] => {
            let mut cmd = CommandBuilder::new(&spec.shell);
            cmd.arg("-c");
            cmd.arg(line);
            cmd
        }
        [program, args @ ..] => {
            let mut cmd = CommandBuilder::new(program);
            for arg in args {
                cmd.arg(arg);
            }
            cmd
        }
    };
    for (name, value) in &spec.environment {
        cmd.env(name, value);
    }
    if let Some(ref cwd) = spec.cwd {
        cmd.cwd(cwd);
    }
    cmd
}

/// A child running on a pty
pub struct PtyProcess {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
}

impl ProcessHandle for PtyProcess {
    fn pid(&self) -> Option<u32> {
        self.child.process_id()
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        let size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        if let Err(e) = self.master.resize(size) {
            warn!("failed to resize pty of pid {:?}: {}", self.pid(), e);
        }
    }
}

/// Launches pane commands on native pseudo terminals
pub struct PtySpawner {
    system: Box<dyn PtySystem + Send>,
}

impl PtySpawner {
    pub fn new() -> Self {
        Self {
            system: native_pty_system(),
        }
    }

    fn open(&self, spec: &LaunchSpec) -> Result<PtyProcess> {
        if let Some(ref cwd) = spec.cwd {
            if !Path::new(cwd).is_dir() {
                return Err(PtyError::MissingDirectory(cwd.display().to_string()));
            }
        }

        let size = PtySize {
            rows: spec.rows,
            cols: spec.cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        let pair = self
            .system
            .openpty(size)
            .map_err(|e| PtyError::Open(e.to_string()))?;

        let child = pair
            .slave
            .spawn_command(build_command(spec))
            .map_err(|e| PtyError::Spawn {
                command: describe(spec),
                reason: e.to_string(),
            })?;
        // The child owns the slave side now
        drop(pair.slave);

        debug!(
            "spawned {} (pid {:?}) on {}x{} pty",
            describe(spec),
            child.process_id(),
            spec.cols,
            spec.rows
        );
        Ok(PtyProcess {
            master: pair.master,
            child,
        })
    }
}

impl Default for PtySpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner for PtySpawner {
    fn launch(&mut self, spec: &LaunchSpec) -> std::result::Result<Box<dyn ProcessHandle>, SpawnError> {
        let process = self.open(spec)?;
        Ok(Box::new(process))
    }
}

fn describe(spec: &LaunchSpec) -> String {
    if spec.command.is_empty() {
        spec.shell.clone()
    } else {
        spec.command.join(" ")
    }
}
