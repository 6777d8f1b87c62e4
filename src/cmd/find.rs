//! Target resolution
//!
//! Accepted forms: an empty target (the current pane), `%N` for a pane id, and
//! `[session][:[window]][.[pane]]` where the session is a name or `$N` and the
//! window and pane are indexes.

use thiserror::Error;

use crate::wm::{PaneId, Server, Session, SessionId, Window, WindowId};

/// A resolved session, window and pane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FindState {
    pub session: SessionId,
    pub window: WindowId,
    pub pane: PaneId,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindError {
    #[error("can't find session: {0}")]
    Session(String),

    #[error("can't find window: {0}")]
    Window(String),

    #[error("can't find pane: {0}")]
    Pane(String),
}

/// Resolve `target` relative to `current`
pub fn find_target(server: &Server, target: &str, current: &FindState) -> Result<FindState, FindError> {
    if target.is_empty() {
        return Ok(*current);
    }
    if let Some(id) = target.strip_prefix('%') {
        let pane = id
            .parse::<PaneId>()
            .map_err(|_| FindError::Pane(target.to_string()))?;
        let (session, window) = server
            .locate_pane(pane)
            .ok_or_else(|| FindError::Pane(target.to_string()))?;
        return Ok(FindState { session, window, pane });
    }

    let (session_part, window_part, pane_part) = split_target(target);

    let session = find_session(server, session_part, current)?;
    let window = find_window(session, window_part, current)?;
    let pane = find_pane(server, window, pane_part, current)?;
    Ok(FindState {
        session: session.id,
        window: window.id,
        pane,
    })
}

/// Split into (session, window, pane) parts
fn split_target(target: &str) -> (&str, Option<&str>, Option<&str>) {
    match target.split_once(':') {
        Some((session, rest)) => match rest.split_once('.') {
            Some((window, pane)) => (session, Some(window), Some(pane)),
            None => (session, Some(rest), None),
        },
        None => match target.split_once('.') {
            Some((session, pane)) => (session, None, Some(pane)),
            None => (target, None, None),
        },
    }
}

fn find_session<'s>(server: &'s Server, name: &str, current: &FindState) -> Result<&'s Session, FindError> {
    let found = if name.is_empty() {
        server.session(current.session)
    } else if let Some(id) = name.strip_prefix('$').and_then(|n| n.parse().ok()) {
        server.session(id)
    } else {
        server.session_by_name(name)
    };
    found.ok_or_else(|| FindError::Session(name.to_string()))
}

fn find_window<'s>(
    session: &'s Session,
    index: Option<&str>,
    current: &FindState,
) -> Result<&'s Window, FindError> {
    let id = match index.filter(|i| !i.is_empty()) {
        None if session.id == current.session => current.window,
        None => session.active_window,
        Some(index) => index
            .parse()
            .ok()
            .and_then(|i| session.window_at(i))
            .ok_or_else(|| FindError::Window(index.to_string()))?,
    };
    session
        .window(id)
        .ok_or_else(|| FindError::Window(id.to_string()))
}

fn find_pane(
    server: &Server,
    window: &Window,
    index: Option<&str>,
    current: &FindState,
) -> Result<PaneId, FindError> {
    match index.filter(|i| !i.is_empty()) {
        None if window.id == current.window && window.pane(current.pane).is_some() => Ok(current.pane),
        None => Ok(window.active_pane),
        Some(index) => index
            .parse::<u32>()
            .ok()
            .and_then(|i| i.checked_sub(server.pane_base_index))
            .and_then(|pos| window.pane_order.get(pos as usize).copied())
            .ok_or_else(|| FindError::Pane(index.to_string())),
    }
}
