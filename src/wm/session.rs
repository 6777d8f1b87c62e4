//! Session - A named collection of windows

use std::collections::HashMap;

use super::window::{Window, WindowId};

/// Unique identifier for a session
pub type SessionId = u64;

/// A session holding windows in index order
pub struct Session {
    pub id: SessionId,
    pub name: String,
    /// All windows
    windows: HashMap<WindowId, Window>,
    /// Window order (index = position + base index)
    window_order: Vec<WindowId>,
    /// Currently active window
    pub active_window: WindowId,
    /// Index of the first window
    pub base_index: u32,
    /// Set when the status line should be refreshed
    pub status_dirty: bool,
}

impl Session {
    /// Create a session around its first window
    pub fn new(id: SessionId, name: String, window: Window, base_index: u32) -> Self {
        let window_id = window.id;
        let mut windows = HashMap::new();
        windows.insert(window_id, window);
        Self {
            id,
            name,
            windows,
            window_order: vec![window_id],
            active_window: window_id,
            base_index,
            status_dirty: false,
        }
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    /// Windows in index order
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.window_order.iter().filter_map(|id| self.windows.get(id))
    }

    pub fn windows_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.values_mut()
    }

    /// Index of a window as shown to the user
    pub fn window_index(&self, id: WindowId) -> Option<u32> {
        self.window_order
            .iter()
            .position(|&w| w == id)
            .and_then(|pos| u32::try_from(pos).ok())
            .map(|pos| pos + self.base_index)
    }

    /// Window at a user-visible index
    pub fn window_at(&self, index: u32) -> Option<WindowId> {
        let pos = index.checked_sub(self.base_index)?;
        self.window_order.get(pos as usize).copied()
    }
}
