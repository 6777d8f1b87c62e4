//! Layout - Manages pane arrangement within a window
//!
//! The layout is a binary tree of cells kept in an arena. Cells are addressed
//! by stable indices; the tree holds the root index and every cell records its
//! parent, so navigation works in both directions without shared ownership.
//!
//! Geometry is derived top-down from the window size. A split node stores the
//! absolute size of its first child along the split axis, so removing a cell
//! and promoting its sibling restores exactly the geometry the tree had before
//! the split.

use std::fmt;

use thiserror::Error;

use super::pane::PaneId;

/// Index of a cell in the layout arena
pub type CellId = usize;

/// Smallest width or height a cell may shrink to
pub const PANE_MINIMUM: u32 = 1;

/// Direction of split
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SplitDirection {
    Horizontal, // Split left/right (vertical line)
    #[default]
    Vertical, // Split top/bottom (horizontal line)
}

impl SplitDirection {
    /// Extent of a rectangle along this direction
    pub fn extent(self, rect: &Rect) -> u32 {
        match self {
            SplitDirection::Horizontal => rect.width,
            SplitDirection::Vertical => rect.height,
        }
    }
}

/// Structural options for a split
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitOptions {
    /// Place the new cell before (left of / above) the split cell
    pub before: bool,
    /// Split the whole window instead of the target cell
    pub full_size: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("no space for new pane")]
    NoSpace,

    #[error("cell {0} is not a leaf")]
    NotLeaf(CellId),

    #[error("cell {0} does not exist")]
    UnknownCell(CellId),

    #[error("can't find pane %{0}")]
    UnknownPane(PaneId),
}

/// Position and size of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Clone, Debug)]
enum CellKind {
    Leaf(Option<PaneId>),
    Split {
        direction: SplitDirection,
        /// Size of `first` along `direction`
        first_size: u32,
        first: CellId,
        second: CellId,
    },
}

#[derive(Clone, Debug)]
struct LayoutCell {
    parent: Option<CellId>,
    kind: CellKind,
    rect: Rect,
}

/// Layout tree for one window
#[derive(Clone, Debug)]
pub struct LayoutTree {
    cells: Vec<Option<LayoutCell>>,
    free: Vec<CellId>,
    root: CellId,
    width: u32,
    height: u32,
}

impl LayoutTree {
    /// Create a layout with a single leaf holding `pane`
    pub fn new(pane: PaneId, width: u32, height: u32) -> Self {
        let root = LayoutCell {
            parent: None,
            kind: CellKind::Leaf(Some(pane)),
            rect: Rect::new(0, 0, width, height),
        };
        Self {
            cells: vec![Some(root)],
            free: Vec::new(),
            root: 0,
            width,
            height,
        }
    }

    pub fn root(&self) -> CellId {
        self.root
    }

    /// Number of live cells (leaves and splits)
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Leaf cells in tree order (left/top first)
    pub fn leaves(&self) -> Vec<CellId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: CellId, out: &mut Vec<CellId>) {
        let Some(cell) = self.cell(id) else { return };
        match cell.kind {
            CellKind::Leaf(_) => out.push(id),
            CellKind::Split { first, second, .. } => {
                self.collect_leaves(first, out);
                self.collect_leaves(second, out);
            }
        }
    }

    /// Pane assigned to a leaf cell
    pub fn pane_at(&self, id: CellId) -> Option<PaneId> {
        match self.cell(id)?.kind {
            CellKind::Leaf(pane) => pane,
            CellKind::Split { .. } => None,
        }
    }

    /// Find the leaf holding `pane`
    pub fn cell_of(&self, pane: PaneId) -> Option<CellId> {
        self.leaves()
            .into_iter()
            .find(|&id| self.pane_at(id) == Some(pane))
    }

    pub fn is_leaf(&self, id: CellId) -> bool {
        matches!(self.cell(id).map(|c| &c.kind), Some(CellKind::Leaf(_)))
    }

    pub fn parent(&self, id: CellId) -> Option<CellId> {
        self.cell(id)?.parent
    }

    pub fn geometry(&self, id: CellId) -> Option<Rect> {
        self.cell(id).map(|c| c.rect)
    }

    /// Geometry of every assigned leaf
    pub fn positions(&self) -> Vec<(PaneId, Rect)> {
        self.leaves()
            .into_iter()
            .filter_map(|id| {
                let cell = self.cell(id)?;
                match cell.kind {
                    CellKind::Leaf(Some(pane)) => Some((pane, cell.rect)),
                    _ => None,
                }
            })
            .collect()
    }

    /// Attach a pane to an empty leaf
    pub fn assign(&mut self, id: CellId, pane: PaneId) -> Result<(), LayoutError> {
        let cell = self.cell_mut(id).ok_or(LayoutError::UnknownCell(id))?;
        match &mut cell.kind {
            CellKind::Leaf(slot) => {
                *slot = Some(pane);
                Ok(())
            }
            CellKind::Split { .. } => Err(LayoutError::NotLeaf(id)),
        }
    }

    /// Detach whatever pane a leaf holds
    pub fn unassign(&mut self, id: CellId) -> Option<PaneId> {
        match &mut self.cell_mut(id)?.kind {
            CellKind::Leaf(slot) => slot.take(),
            CellKind::Split { .. } => None,
        }
    }

    /// Smallest extent the subtree at `id` can take along `direction`
    pub fn min_extent(&self, id: CellId, direction: SplitDirection) -> u32 {
        let Some(cell) = self.cell(id) else {
            return PANE_MINIMUM;
        };
        match cell.kind {
            CellKind::Leaf(_) => PANE_MINIMUM,
            CellKind::Split { direction: d, first, second, .. } => {
                let a = self.min_extent(first, direction);
                let b = self.min_extent(second, direction);
                if d == direction {
                    a + 1 + b
                } else {
                    a.max(b)
                }
            }
        }
    }

    /// Split a leaf (or, with `full_size`, the whole window) and return the
    /// new empty leaf.
    ///
    /// `size` is the size of the new cell along `direction`. `None` splits in
    /// half. An explicit size below the minimum is raised to it; a size that
    /// would squeeze the existing cell below its minimum fails with
    /// `NoSpace` and leaves the tree untouched.
    pub fn split(
        &mut self,
        target: CellId,
        direction: SplitDirection,
        size: Option<u32>,
        options: SplitOptions,
    ) -> Result<CellId, LayoutError> {
        if !self.is_leaf(target) {
            return match self.cell(target) {
                Some(_) => Err(LayoutError::NotLeaf(target)),
                None => Err(LayoutError::UnknownCell(target)),
            };
        }

        let node = if options.full_size { self.root } else { target };
        let rect = self.geometry(node).ok_or(LayoutError::UnknownCell(node))?;
        let extent = direction.extent(&rect);
        let old_minimum = self.min_extent(node, direction);

        if extent < PANE_MINIMUM + 1 + old_minimum {
            return Err(LayoutError::NoSpace);
        }
        let largest_new = extent - 1 - old_minimum;

        let new_size = match size {
            None => (((extent + 1) / 2).saturating_sub(1)).clamp(PANE_MINIMUM, largest_new),
            Some(n) => {
                let n = n.max(PANE_MINIMUM);
                if n > largest_new {
                    return Err(LayoutError::NoSpace);
                }
                n
            }
        };
        let old_size = extent - 1 - new_size;

        let parent = self.cell(node).and_then(|c| c.parent);
        let leaf = self.alloc(LayoutCell {
            parent: None,
            kind: CellKind::Leaf(None),
            rect: Rect::default(),
        });
        let (first, second, first_size) = if options.before {
            (leaf, node, new_size)
        } else {
            (node, leaf, old_size)
        };
        let split = self.alloc(LayoutCell {
            parent,
            kind: CellKind::Split {
                direction,
                first_size,
                first,
                second,
            },
            rect,
        });

        self.replace_child(parent, node, split);
        self.set_parent(node, Some(split));
        self.set_parent(leaf, Some(split));
        self.reflow();
        Ok(leaf)
    }

    /// Remove a leaf, giving its space back to its sibling
    pub fn close(&mut self, id: CellId) -> Result<(), LayoutError> {
        if !self.is_leaf(id) {
            return match self.cell(id) {
                Some(_) => Err(LayoutError::NotLeaf(id)),
                None => Err(LayoutError::UnknownCell(id)),
            };
        }
        // The last cell of a window is never closed here
        let Some(split) = self.parent(id) else {
            return Err(LayoutError::NotLeaf(id));
        };
        let sibling = match self.cell(split).map(|c| &c.kind) {
            Some(CellKind::Split { first, second, .. }) => {
                if *first == id {
                    *second
                } else {
                    *first
                }
            }
            _ => return Err(LayoutError::UnknownCell(split)),
        };

        let grandparent = self.parent(split);
        self.replace_child(grandparent, split, sibling);
        self.set_parent(sibling, grandparent);
        self.release(id);
        self.release(split);
        self.reflow();
        Ok(())
    }

    /// Recompute every cell's geometry from the root
    pub fn reflow(&mut self) {
        let rect = Rect::new(0, 0, self.width, self.height);
        self.place(self.root, rect);
    }

    fn place(&mut self, id: CellId, rect: Rect) {
        let kind = match self.cell_mut(id) {
            Some(cell) => {
                cell.rect = rect;
                cell.kind.clone()
            }
            None => return,
        };
        let CellKind::Split {
            direction,
            first_size,
            first,
            second,
        } = kind
        else {
            return;
        };

        let extent = direction.extent(&rect);
        let room = extent.saturating_sub(1 + self.min_extent(second, direction));
        let a = first_size.min(room);
        let b = extent.saturating_sub(a + 1);
        let (first_rect, second_rect) = match direction {
            SplitDirection::Horizontal => (
                Rect::new(rect.x, rect.y, a, rect.height),
                Rect::new(rect.x + a + 1, rect.y, b, rect.height),
            ),
            SplitDirection::Vertical => (
                Rect::new(rect.x, rect.y, rect.width, a),
                Rect::new(rect.x, rect.y + a + 1, rect.width, b),
            ),
        };
        self.place(first, first_rect);
        self.place(second, second_rect);
    }

    fn cell(&self, id: CellId) -> Option<&LayoutCell> {
        self.cells.get(id).and_then(|c| c.as_ref())
    }

    fn cell_mut(&mut self, id: CellId) -> Option<&mut LayoutCell> {
        self.cells.get_mut(id).and_then(|c| c.as_mut())
    }

    fn alloc(&mut self, cell: LayoutCell) -> CellId {
        match self.free.pop() {
            Some(id) => {
                self.cells[id] = Some(cell);
                id
            }
            None => {
                self.cells.push(Some(cell));
                self.cells.len() - 1
            }
        }
    }

    fn release(&mut self, id: CellId) {
        if let Some(slot) = self.cells.get_mut(id) {
            if slot.take().is_some() {
                self.free.push(id);
            }
        }
    }

    fn set_parent(&mut self, id: CellId, parent: Option<CellId>) {
        if let Some(cell) = self.cell_mut(id) {
            cell.parent = parent;
        }
    }

    /// Point `parent` (or the root, when there is no parent) at `to` instead of `from`
    fn replace_child(&mut self, parent: Option<CellId>, from: CellId, to: CellId) {
        let Some(parent) = parent else {
            self.root = to;
            return;
        };
        if let Some(LayoutCell {
            kind: CellKind::Split { first, second, .. },
            ..
        }) = self.cell_mut(parent)
        {
            if *first == from {
                *first = to;
            } else if *second == from {
                *second = to;
            }
        }
    }

    fn dump_cell(&self, id: CellId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(cell) = self.cell(id) else {
            return Ok(());
        };
        let r = cell.rect;
        write!(f, "{}x{},{},{}", r.width, r.height, r.x, r.y)?;
        match cell.kind {
            CellKind::Leaf(Some(pane)) => write!(f, ",{}", pane),
            CellKind::Leaf(None) => write!(f, ",-"),
            CellKind::Split {
                direction,
                first,
                second,
                ..
            } => {
                let (open, close) = match direction {
                    SplitDirection::Horizontal => ('{', '}'),
                    SplitDirection::Vertical => ('[', ']'),
                };
                write!(f, "{}", open)?;
                self.dump_cell(first, f)?;
                write!(f, ",")?;
                self.dump_cell(second, f)?;
                write!(f, "{}", close)
            }
        }
    }
}

/// tmux-like layout description: `WxH,X,Y,pane` with `{}` for left/right and
/// `[]` for top/bottom splits.
impl fmt::Display for LayoutTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump_cell(self.root, f)
    }
}
