//! Window - A container for panes with a layout

use std::collections::HashMap;

use tracing::trace;

use super::layout::{LayoutTree, Rect};
use super::pane::{Pane, PaneId};

/// Unique identifier for a window
pub type WindowId = u64;

/// Reason for reflow (logged at trace level)
#[derive(Debug, Clone, Copy)]
pub enum ReflowReason {
    Split,
    Close,
    ZoomToggle,
}

/// A window containing one or more panes
pub struct Window {
    /// Unique identifier
    pub id: WindowId,
    /// Window name
    pub name: String,
    /// Layout tree
    pub layout: LayoutTree,
    /// All panes in this window
    pub panes: HashMap<PaneId, Pane>,
    /// Pane order (for numbering)
    pub pane_order: Vec<PaneId>,
    /// Currently active pane
    pub active_pane: PaneId,
    /// Previously active pane
    pub last_pane: Option<PaneId>,
    /// Window dimensions
    pub width: u32,
    pub height: u32,
    /// Zoomed pane (if any)
    zoomed_pane: Option<PaneId>,
    /// Set when clients should redraw this window
    pub needs_redraw: bool,
}

impl Window {
    /// Create a new window around a single pane
    pub fn new(id: WindowId, name: String, pane_id: PaneId, width: u32, height: u32) -> Self {
        let layout = LayoutTree::new(pane_id, width, height);
        let cell = layout.root();
        let pane = Pane::new(pane_id, id, cell, Rect::new(0, 0, width, height));

        let mut panes = HashMap::new();
        panes.insert(pane_id, pane);

        Self {
            id,
            name,
            layout,
            panes,
            pane_order: vec![pane_id],
            active_pane: pane_id,
            last_pane: None,
            width,
            height,
            zoomed_pane: None,
            needs_redraw: false,
        }
    }

    pub fn pane(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    /// Position of a pane in the pane order
    pub fn pane_index(&self, id: PaneId) -> Option<usize> {
        self.pane_order.iter().position(|&p| p == id)
    }

    /// Insert a pane next to `neighbour` in the pane order
    pub fn add_pane(&mut self, pane: Pane, neighbour: PaneId, before: bool) {
        let id = pane.id;
        let at = match self.pane_index(neighbour) {
            Some(idx) if before => idx,
            Some(idx) => idx + 1,
            None => self.pane_order.len(),
        };
        self.pane_order.insert(at, id);
        self.panes.insert(id, pane);
    }

    /// Remove a pane and detach it from its layout cell
    ///
    /// The cell itself stays in the tree; closing it is up to the caller.
    pub fn remove_pane(&mut self, id: PaneId) -> Option<Pane> {
        let pane = self.panes.remove(&id)?;
        self.pane_order.retain(|&p| p != id);
        self.layout.unassign(pane.cell);

        if self.zoomed_pane == Some(id) {
            self.zoomed_pane = None;
        }
        if self.last_pane == Some(id) {
            self.last_pane = None;
        }
        if self.active_pane == id {
            let next = self
                .last_pane
                .take()
                .or_else(|| self.pane_order.first().copied());
            if let Some(next) = next {
                self.active_pane = next;
            }
        }
        Some(pane)
    }

    /// Make a pane the active one
    pub fn set_active(&mut self, id: PaneId) -> bool {
        if !self.panes.contains_key(&id) {
            return false;
        }
        if self.active_pane != id {
            self.last_pane = Some(self.active_pane);
            self.active_pane = id;
        }
        true
    }

    /// Lift any zoom so the layout is visible again, returning the pane that
    /// was zoomed
    pub fn push_zoom(&mut self) -> Option<PaneId> {
        let previous = self.zoomed_pane.take();
        if previous.is_some() {
            self.reflow(ReflowReason::ZoomToggle);
        }
        previous
    }

    /// Zoom a pane to fill the window; the zoomed pane becomes active
    pub fn zoom(&mut self, id: PaneId) -> bool {
        if self.panes.len() <= 1 || !self.panes.contains_key(&id) {
            return false; // Nothing to zoom
        }
        self.set_active(id);
        self.zoomed_pane = Some(id);
        self.reflow(ReflowReason::ZoomToggle);
        true
    }

    /// Get zoomed pane ID
    pub fn zoomed_pane_id(&self) -> Option<PaneId> {
        self.zoomed_pane
    }

    /// Reflow: apply layout geometry to all panes
    /// This is the ONLY place that should modify pane geometry
    pub fn reflow(&mut self, reason: ReflowReason) {
        trace!("reflow window @{}: {:?}", self.id, reason);
        self.layout.reflow();

        if let Some(zoomed_id) = self.zoomed_pane {
            let full = Rect::new(0, 0, self.width, self.height);
            if let Some(pane) = self.panes.get_mut(&zoomed_id) {
                pane.apply_geometry(full);
            }
        }
        for (pane_id, rect) in self.layout.positions() {
            if Some(pane_id) == self.zoomed_pane {
                continue;
            }
            if let Some(pane) = self.panes.get_mut(&pane_id) {
                pane.apply_geometry(rect);
            }
        }
    }
}
