//! Core process plumbing.
//!
//! - **pty**: Pseudo terminals via `portable-pty`, the launcher used for real panes

pub mod pty;
