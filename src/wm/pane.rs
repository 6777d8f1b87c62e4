//! Pane - A single terminal pane within a window

use std::path::PathBuf;

use super::layout::{CellId, Rect};
use super::spawn::ProcessHandle;
use super::window::WindowId;

/// Unique identifier for a pane
pub type PaneId = u64;

/// What a pane is currently doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaneState {
    /// A process is attached
    Running,
    /// No process; the pane holds whatever is written to it
    Empty,
    /// Empty and waiting for the client's first input
    AwaitingInput,
}

/// A single pane, optionally attached to a child process
pub struct Pane {
    /// Unique identifier
    pub id: PaneId,
    /// Owning window
    pub window: WindowId,
    /// Layout cell the pane occupies
    pub cell: CellId,
    /// Position (column, row) in the window
    pub x: u32,
    pub y: u32,
    /// Size (width, height)
    pub width: u32,
    pub height: u32,
    /// Child process, absent for empty panes
    pub process: Option<Box<dyn ProcessHandle>>,
    pub state: PaneState,
    /// Working directory the pane was started in
    pub cwd: Option<PathBuf>,
    /// Title (optional override)
    pub title: Option<String>,
    /// Data written into an empty pane
    pub contents: Vec<u8>,
}

impl Pane {
    /// Create a new pane occupying `rect`
    pub fn new(id: PaneId, window: WindowId, cell: CellId, rect: Rect) -> Self {
        Self {
            id,
            window,
            cell,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            process: None,
            state: PaneState::Empty,
            cwd: None,
            title: None,
            contents: Vec::new(),
        }
    }

    /// Attach a running process
    pub fn attach(&mut self, process: Box<dyn ProcessHandle>) {
        self.process = Some(process);
        self.state = PaneState::Running;
    }

    pub fn is_empty(&self) -> bool {
        self.process.is_none()
    }

    /// Apply layout geometry, resizing the process' terminal when it changed
    pub fn apply_geometry(&mut self, rect: Rect) {
        let resized = rect.width != self.width || rect.height != self.height;
        self.move_to(rect.x, rect.y);
        self.width = rect.width;
        self.height = rect.height;
        if resized {
            if let Some(process) = self.process.as_mut() {
                process.resize(clamp_u16(rect.width), clamp_u16(rect.height));
            }
        }
    }

    /// Move the pane
    pub fn move_to(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    /// Get display title
    pub fn display_title(&self) -> String {
        if let Some(ref title) = self.title {
            title.clone()
        } else {
            format!("Pane {}", self.id)
        }
    }
}

pub(crate) fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
