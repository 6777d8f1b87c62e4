//! Window Manager - sessions, windows, panes and their layout.
//!
//! - **server**: `Server`, owner of every session and the split collaborators
//! - **session**: Named collection of windows
//! - **window**: Panes sharing one layout tree
//! - **pane**: A layout leaf, optionally running a process
//! - **layout**: Binary tree of cells (split, close, geometry)
//! - **spawn**: Launch requests and the process launcher seam
//!
//! # Module Hierarchy
//!
//! ```text
//! wm/
//! ├── mod.rs      - Module exports
//! ├── server.rs   - Server (top-level owner)
//! ├── session.rs  - Session (container for windows)
//! ├── window.rs   - Window (container for panes)
//! ├── pane.rs     - Pane (cell + optional process)
//! ├── layout.rs   - Layout tree
//! └── spawn.rs    - Spawner trait, requests, flags
//! ```

pub mod layout;
pub mod pane;
pub mod server;
pub mod session;
pub mod spawn;
pub mod window;

pub use layout::{CellId, LayoutError, SplitDirection, SplitOptions};
pub use pane::PaneId;
pub use server::Server;
pub use session::{Session, SessionId};
pub use spawn::NullSpawner;
pub use window::{Window, WindowId};
