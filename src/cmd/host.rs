//! The server as seen by a splitting command
//!
//! Each trait is one collaborator of the split: the layout tree, the process
//! launcher, window state and addressing. [`SplitHost`] bundles them so the
//! orchestrator takes a single `&mut` borrow.

use thiserror::Error;

use crate::wm::{CellId, LayoutError, PaneId, SessionId, SplitDirection, SplitOptions, WindowId};
use crate::wm::spawn::{SpawnError, SpawnRequest};

use super::find::FindState;
use super::format::FormatContext;

/// A layout cell in a particular window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRef {
    pub window: WindowId,
    pub cell: CellId,
}

/// The client a command was issued from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientRef {
    pub name: String,
    /// Session the client is attached to, if any
    pub session: Option<SessionId>,
    pub exited: bool,
}

impl ClientRef {
    /// A client that only feeds input (not attached to any session)
    pub fn detached(name: &str) -> Self {
        Self {
            name: name.to_string(),
            session: None,
            exited: false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("pane is not empty")]
    NotEmpty,

    #[error("no client")]
    NoClient,

    #[error("client already attached")]
    ClientAttached,

    #[error("can't find pane %{0}")]
    UnknownPane(PaneId),

    #[error("pane %{0} is not waiting for input")]
    NotWaiting(PaneId),
}

pub trait LayoutGateway {
    /// Width and height of a pane, used as the reference for percentages
    fn pane_size(&self, pane: PaneId) -> Option<(u32, u32)>;

    /// Split the cell holding `pane`, returning the new empty cell
    ///
    /// `None` splits in half; `Some(n)` fails with `NoSpace` rather than
    /// shrinking the request.
    fn split(
        &mut self,
        pane: PaneId,
        direction: SplitDirection,
        size: Option<u32>,
        options: SplitOptions,
    ) -> Result<CellRef, LayoutError>;

    /// Give a cell's space back to its sibling
    fn close(&mut self, cell: CellRef);
}

pub trait SpawnGateway {
    /// Attach a new pane to the request's cell
    fn spawn(&mut self, request: &SpawnRequest) -> Result<PaneId, SpawnError>;

    /// Put an empty pane into "waiting for the client's input"
    fn start_input(&mut self, pane: PaneId, client: Option<&ClientRef>) -> Result<(), InputError>;

    /// Drop server-side references to a pane (input waits and the like)
    fn detach_pane(&mut self, pane: PaneId);

    /// Remove a pane from its window
    fn remove_pane(&mut self, pane: PaneId);
}

pub trait WindowControl {
    /// Unzoom a window, returning the pane that was zoomed
    fn push_zoom(&mut self, window: WindowId) -> Option<PaneId>;

    /// Zoom the window's active pane again if `zoom` is set
    fn pop_zoom(&mut self, window: WindowId, zoom: bool);

    /// Make `pane` the window's active pane
    fn select_pane(&mut self, window: WindowId, pane: PaneId);

    fn redraw_window(&mut self, window: WindowId);

    fn status_session(&mut self, session: SessionId);
}

pub trait Addressing {
    fn find_pane(&self, pane: PaneId) -> Option<FindState>;

    fn format_context(&self, state: &FindState) -> FormatContext;
}

/// Everything a split needs from the server
pub trait SplitHost: LayoutGateway + SpawnGateway + WindowControl + Addressing {}

impl<T: LayoutGateway + SpawnGateway + WindowControl + Addressing + ?Sized> SplitHost for T {}
